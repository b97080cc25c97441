//! Collision detection modules: uniform-grid broad phase, exact narrow phase, manifolds.

pub mod broadphase;
pub mod contact;
pub mod narrowphase;

pub use broadphase::{CellKey, SpatialGrid};
pub use contact::CollisionManifold;
pub use narrowphase::{CircleCircle, NarrowPhase, SATAlgorithm};
