//! Simulation dynamics: integration, mutual gravity, and contact resolution.

pub mod gravity;
pub mod integrator;
pub mod solver;

pub use gravity::{pairwise_force, MutualGravity, QuadNode, QuadTree};
pub use integrator::Integrator;
pub use solver::{pair_mut, ImpulseSolver};
