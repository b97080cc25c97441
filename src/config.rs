//! Global configuration constants and the serializable world configuration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    core::types::Aabb,
    dynamics::{gravity::MutualGravity, solver::ImpulseSolver},
    error::{PhysicsError, Result},
};

/// Default uniform gravity (screen space, Y-down). Scenes opt in to gravity explicitly.
pub const DEFAULT_GRAVITY: [f32; 2] = [0.0, 0.0];

/// Default per-step velocity retention factor.
pub const DEFAULT_DAMPING: f32 = 1.0;

/// Default cell size for the broad-phase uniform grid.
pub const DEFAULT_BROADPHASE_CELL_SIZE: f32 = 100.0;

/// Speed ceiling applied after integration.
pub const MAX_SPEED: f32 = 5000.0;

/// Penetration tolerated before positional correction kicks in.
pub const DEFAULT_PENETRATION_SLOP: f32 = 0.01;

/// Fraction of the remaining penetration removed per contact.
pub const DEFAULT_CORRECTION_PERCENT: f32 = 0.95;

/// Normal velocities above this value are treated as resting contact (no bounce).
pub const DEFAULT_RESTING_THRESHOLD: f32 = -1.0;

/// Barnes–Hut opening angle.
pub const DEFAULT_THETA: f32 = 0.5;

/// Gravitational constant used by the mutual-gravity solver.
pub const DEFAULT_GRAVITATIONAL_CONSTANT: f32 = 1.0;

/// Added to squared distances so near-coincident bodies do not produce infinite forces.
pub const DEFAULT_SOFTENING: f32 = 100.0;

/// Weight of the newest sample in the smoothed max-acceleration diagnostic.
pub const DEFAULT_ACCELERATION_SMOOTHING: f32 = 0.1;

/// Full configuration for a [`crate::World`].
///
/// Every field has a default, so partial JSON/TOML documents deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: Vec2,
    pub damping: f32,
    pub cell_size: f32,
    pub collisions_enabled: bool,
    pub mutual_gravity_enabled: bool,
    pub movable_mutual_gravity_enabled: bool,
    pub mutual_gravity: MutualGravity,
    pub solver: ImpulseSolver,
    /// Region covered by the gravity quadtree. `None` fits the root around the bodies.
    pub bounds: Option<Aabb>,
    pub acceleration_smoothing: f32,
    /// Emits a warning when a single step takes longer than this many milliseconds.
    pub frame_budget_ms: Option<f32>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::from_array(DEFAULT_GRAVITY),
            damping: DEFAULT_DAMPING,
            cell_size: DEFAULT_BROADPHASE_CELL_SIZE,
            collisions_enabled: true,
            mutual_gravity_enabled: false,
            movable_mutual_gravity_enabled: false,
            mutual_gravity: MutualGravity::default(),
            solver: ImpulseSolver::default(),
            bounds: None,
            acceleration_smoothing: DEFAULT_ACCELERATION_SMOOTHING,
            frame_budget_ms: None,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "damping must lie in (0, 1], got {}",
                self.damping
            )));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig("gravity must be finite".into()));
        }
        if !(0.0..=1.0).contains(&self.acceleration_smoothing) {
            return Err(PhysicsError::InvalidConfig(format!(
                "acceleration_smoothing must lie in [0, 1], got {}",
                self.acceleration_smoothing
            )));
        }
        if let Some(bounds) = &self.bounds {
            if !bounds.is_valid() {
                return Err(PhysicsError::InvalidConfig(
                    "bounds must have min <= max".into(),
                ));
            }
        }
        self.mutual_gravity.validate()?;
        self.solver.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_damping_and_cell_size() {
        let config = WorldConfig {
            damping: 0.0,
            ..WorldConfig::default()
        };
        assert!(matches!(config.validate(), Err(PhysicsError::InvalidConfig(_))));

        let config = WorldConfig {
            cell_size: -1.0,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: WorldConfig =
            serde_json::from_str(r#"{ "gravity": [0.0, 400.0], "collisions_enabled": false }"#)
                .expect("partial config should deserialize");

        assert_eq!(config.gravity, Vec2::new(0.0, 400.0));
        assert!(!config.collisions_enabled);
        assert_eq!(config.cell_size, DEFAULT_BROADPHASE_CELL_SIZE);
        assert_eq!(config.mutual_gravity.theta, DEFAULT_THETA);
    }
}
