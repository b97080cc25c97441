use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Contact data produced by the narrow phase for one overlapping pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionManifold {
    /// Unit normal pointing from the first body toward the second.
    pub normal: Vec2,
    pub penetration: f32,
    pub contact_point: Vec2,
}

impl CollisionManifold {
    pub fn new(normal: Vec2, penetration: f32, contact_point: Vec2) -> Self {
        Self {
            normal,
            penetration: penetration.max(0.0),
            contact_point,
        }
    }
}
