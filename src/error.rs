//! Error types for the sandbox core.
//!
//! Only construction and caller-contract violations are errors. Numeric edge cases
//! inside a step fall back to canonical values instead.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("circle radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("mass must be non-negative and finite, got {0}")]
    InvalidMass(f32),

    #[error("restitution must lie in [0, 1], got {0}")]
    InvalidRestitution(f32),

    #[error("body index {index} out of range for world with {len} bodies")]
    BodyIndexOutOfRange { index: usize, len: usize },

    #[error("invalid world configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
