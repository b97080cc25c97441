use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::types::Aabb;
use crate::error::{PhysicsError, Result};

/// Default box used when a body is described without a shape.
pub const DEFAULT_BOX_SIZE: [f32; 2] = [50.0, 40.0];

/// Enumeration of supported body geometries, in body-local space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Circle {
        radius: f32,
    },
    /// Convex polygon; vertices are ordered and centered on the body position.
    Polygon {
        vertices: Vec<Vec2>,
    },
}

impl Default for Shape {
    fn default() -> Self {
        let half = Vec2::from_array(DEFAULT_BOX_SIZE) * 0.5;
        Shape::Polygon {
            vertices: box_vertices(half),
        }
    }
}

fn box_vertices(half: Vec2) -> Vec<Vec2> {
    vec![
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
}

impl Shape {
    pub fn circle(radius: f32) -> Result<Self> {
        let shape = Shape::Circle { radius };
        shape.validate()?;
        Ok(shape)
    }

    pub fn polygon(vertices: Vec<Vec2>) -> Result<Self> {
        let shape = Shape::Polygon { vertices };
        shape.validate()?;
        Ok(shape)
    }

    pub fn rectangle(width: f32, height: f32) -> Result<Self> {
        Self::polygon(box_vertices(Vec2::new(width, height) * 0.5))
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`, counter-clockwise.
    pub fn regular_polygon(sides: usize, radius: f32) -> Result<Self> {
        let vertices = (0..sides)
            .map(|k| Vec2::from_angle(TAU * k as f32 / sides as f32) * radius)
            .collect();
        Self::polygon(vertices)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Shape::Circle { radius } => {
                if radius.is_finite() && *radius > 0.0 {
                    Ok(())
                } else {
                    Err(PhysicsError::InvalidRadius(*radius))
                }
            }
            Shape::Polygon { vertices } => {
                if vertices.len() < 3 {
                    Err(PhysicsError::TooFewVertices(vertices.len()))
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn is_circle(&self) -> bool {
        matches!(self, Shape::Circle { .. })
    }

    /// Bounds of the unrotated shape around the local origin.
    pub fn local_bounds(&self) -> Aabb {
        match self {
            Shape::Circle { radius } => Aabb::from_center_half_extents(Vec2::ZERO, Vec2::splat(*radius)),
            Shape::Polygon { vertices } => Aabb::from_points(vertices),
        }
    }

    pub fn bounding_radius(&self) -> f32 {
        match self {
            Shape::Circle { radius } => *radius,
            Shape::Polygon { vertices } => vertices.iter().map(|v| v.length()).fold(0.0, f32::max),
        }
    }

    /// Approximate moment of inertia: `0.5·m·r²` for circles, the bounding box for polygons.
    pub fn inertia(&self, mass: f32) -> f32 {
        match self {
            Shape::Circle { radius } => 0.5 * mass * radius * radius,
            Shape::Polygon { .. } => {
                let size = self.local_bounds().size();
                mass * (size.x * size.x + size.y * size.y) / 12.0
            }
        }
    }
}
