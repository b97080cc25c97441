//! Orbit Sandbox – a 2D rigid-body simulation core.
//!
//! A [`World`] owns circle and convex-polygon bodies and advances them with a fixed
//! pipeline: uniform-grid broad phase, optional Barnes–Hut mutual gravity, semi-implicit
//! Euler integration, and SAT narrow phase with impulse-based resolution. Rendering and
//! input live outside this crate; callers read body state back after each step.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod scenes;
pub mod utils;
pub mod world;

pub use glam::Vec2;

pub use collision::{
    broadphase::SpatialGrid, contact::CollisionManifold, narrowphase::NarrowPhase,
};
pub use config::WorldConfig;
pub use core::{
    rigidbody::{Body, BodyBuilder, BodyDesc},
    shape::Shape,
    types::Aabb,
};
pub use dynamics::{
    gravity::{MutualGravity, QuadTree},
    integrator::Integrator,
    solver::ImpulseSolver,
};
pub use error::{PhysicsError, Result};
pub use scenes::{SceneBounds, SceneGenerator};
pub use utils::math::Vec2Ext;
pub use world::{StepCallback, World};
