//! Core types describing simulated bodies, their shapes, and shared geometry.

pub mod rigidbody;
pub mod shape;
pub mod types;

pub use rigidbody::{Body, BodyBuilder, BodyDesc};
pub use shape::Shape;
pub use types::Aabb;
