use serde::{Deserialize, Serialize};

use crate::{
    collision::contact::CollisionManifold,
    config::{DEFAULT_CORRECTION_PERCENT, DEFAULT_PENETRATION_SLOP, DEFAULT_RESTING_THRESHOLD},
    core::rigidbody::Body,
    error::{PhysicsError, Result},
};

/// Positional correction plus a single normal impulse per contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpulseSolver {
    /// Fraction of the penetration (beyond `slop`) removed each time a contact is resolved.
    pub percent: f32,
    pub slop: f32,
    /// Normal velocities above this (negative) value bounce with zero restitution.
    pub resting_threshold: f32,
}

impl Default for ImpulseSolver {
    fn default() -> Self {
        Self {
            percent: DEFAULT_CORRECTION_PERCENT,
            slop: DEFAULT_PENETRATION_SLOP,
            resting_threshold: DEFAULT_RESTING_THRESHOLD,
        }
    }
}

impl ImpulseSolver {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.percent) {
            return Err(PhysicsError::InvalidConfig(format!(
                "correction percent must lie in [0, 1], got {}",
                self.percent
            )));
        }
        if !(self.slop.is_finite() && self.slop >= 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "slop must be non-negative, got {}",
                self.slop
            )));
        }
        if !(self.resting_threshold.is_finite() && self.resting_threshold <= 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "resting threshold must be non-positive, got {}",
                self.resting_threshold
            )));
        }
        Ok(())
    }

    /// Separates `a` and `b` along the manifold normal and applies the collision impulse.
    ///
    /// Returns `true` when an impulse was applied. Static bodies are never moved.
    pub fn resolve(&self, a: &mut Body, b: &mut Body, manifold: &CollisionManifold) -> bool {
        let inv_a = a.solver_inv_mass();
        let inv_b = b.solver_inv_mass();
        let total_inv_mass = inv_a + inv_b;
        if total_inv_mass == 0.0 {
            return false;
        }

        let normal = manifold.normal;

        let correction_mag =
            (manifold.penetration - self.slop).max(0.0) / total_inv_mass * self.percent;
        let correction = normal * correction_mag;
        a.position -= correction * inv_a;
        b.position += correction * inv_b;

        let relative_velocity = b.linear_velocity - a.linear_velocity;
        let vel_along_normal = relative_velocity.dot(normal);
        if vel_along_normal > 0.0 {
            return false;
        }

        let restitution = if vel_along_normal > self.resting_threshold {
            0.0
        } else {
            a.restitution.min(b.restitution)
        };

        let j = -(1.0 + restitution) * vel_along_normal / total_inv_mass;
        let impulse = normal * j;
        a.linear_velocity -= impulse * inv_a;
        b.linear_velocity += impulse * inv_b;
        true
    }
}

/// Two distinct mutable bodies out of one slice.
pub fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> Option<(&mut Body, &mut Body)> {
    if i == j || i >= bodies.len() || j >= bodies.len() {
        return None;
    }
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        Some((&mut head[i], &mut tail[0]))
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        Some((&mut tail[0], &mut head[j]))
    }
}
