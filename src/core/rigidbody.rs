use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{shape::Shape, types::Aabb};
use crate::{
    config::MAX_SPEED,
    error::{PhysicsError, Result},
    utils::math::rotate,
};

/// Construction options for a [`Body`].
///
/// Missing fields fall back to a movable 50×40 box of unit mass at the origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyDesc {
    pub position: Vec2,
    pub shape: Shape,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    pub orientation: f32,
    pub mass: f32,
    pub restitution: f32,
    /// Rendering hint only; the simulation never reads it.
    pub color: Option<String>,
    pub movable: bool,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            shape: Shape::default(),
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            orientation: 0.0,
            mass: 1.0,
            restitution: 0.5,
            color: None,
            movable: true,
        }
    }
}

/// A simulated rigid body: shape, mass properties, and kinematic state.
#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vec2,
    pub linear_velocity: Vec2,
    pub angular_velocity: f32,
    /// Radians. Drifts with `angular_velocity`; collisions never change it.
    pub orientation: f32,
    /// Force accumulated for the next integration.
    pub force: Vec2,
    /// Acceleration applied by the most recent integration.
    pub acceleration: Vec2,
    pub restitution: f32,
    pub movable: bool,
    pub color: Option<String>,
    shape: Shape,
    mass: f32,
    inv_mass: f32,
    inertia: f32,
    inv_inertia: f32,
}

impl Body {
    pub fn new(desc: BodyDesc) -> Result<Self> {
        desc.shape.validate()?;
        validate_mass(desc.mass)?;
        validate_restitution(desc.restitution)?;

        let mut body = Self {
            position: desc.position,
            linear_velocity: desc.linear_velocity,
            angular_velocity: desc.angular_velocity,
            orientation: desc.orientation,
            force: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            restitution: desc.restitution,
            movable: desc.movable,
            color: desc.color,
            shape: desc.shape,
            mass: desc.mass,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
        };
        body.recompute_mass_properties();
        Ok(body)
    }

    pub fn builder() -> BodyBuilder {
        BodyBuilder::new()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn set_shape(&mut self, shape: Shape) -> Result<()> {
        shape.validate()?;
        self.shape = shape;
        self.recompute_mass_properties();
        Ok(())
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Zero exactly when the mass is zero.
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    pub fn inv_inertia(&self) -> f32 {
        self.inv_inertia
    }

    pub fn set_mass(&mut self, mass: f32) -> Result<()> {
        validate_mass(mass)?;
        self.mass = mass;
        self.recompute_mass_properties();
        Ok(())
    }

    /// Static bodies never integrate and never receive impulses.
    pub fn is_static(&self) -> bool {
        !self.movable || self.inv_mass == 0.0
    }

    /// Inverse mass as seen by the contact solver: zero for static bodies.
    pub fn solver_inv_mass(&self) -> f32 {
        if self.is_static() {
            0.0
        } else {
            self.inv_mass
        }
    }

    pub fn apply_force(&mut self, force: Vec2) {
        if self.is_static() {
            return;
        }
        self.force += force;
    }

    /// Semi-implicit Euler step followed by damping and the speed ceiling.
    pub fn integrate(&mut self, dt: f32, damping: f32) {
        if self.is_static() {
            self.force = Vec2::ZERO;
            self.acceleration = Vec2::ZERO;
            return;
        }

        let acceleration = self.force * self.inv_mass;
        self.linear_velocity += acceleration * dt;
        self.orientation += self.angular_velocity * dt;
        self.position += self.linear_velocity * dt;

        self.linear_velocity *= damping;
        self.angular_velocity *= damping;

        self.force = Vec2::ZERO;
        self.acceleration = acceleration;
        self.linear_velocity = self.linear_velocity.clamp_length_max(MAX_SPEED);
    }

    /// Polygon vertices rotated by `orientation` and moved to `position`.
    ///
    /// Recomputed on every call. Returns `None` for circles.
    pub fn world_vertices(&self) -> Option<Vec<Vec2>> {
        match &self.shape {
            Shape::Circle { .. } => None,
            Shape::Polygon { vertices } => Some(
                vertices
                    .iter()
                    .map(|v| rotate(*v, self.orientation) + self.position)
                    .collect(),
            ),
        }
    }

    pub fn aabb(&self) -> Aabb {
        match &self.shape {
            Shape::Circle { radius } => {
                Aabb::from_center_half_extents(self.position, Vec2::splat(*radius))
            }
            Shape::Polygon { vertices } => {
                let mut bounds = Aabb::empty();
                for v in vertices {
                    bounds.extend(rotate(*v, self.orientation) + self.position);
                }
                bounds
            }
        }
    }

    fn recompute_mass_properties(&mut self) {
        self.inv_mass = if self.mass == 0.0 { 0.0 } else { 1.0 / self.mass };
        self.inertia = self.shape.inertia(self.mass);
        self.inv_inertia = if self.inertia.abs() < f32::EPSILON {
            0.0
        } else {
            1.0 / self.inertia
        };
    }
}

fn validate_mass(mass: f32) -> Result<()> {
    if mass.is_finite() && mass >= 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidMass(mass))
    }
}

fn validate_restitution(restitution: f32) -> Result<()> {
    if (0.0..=1.0).contains(&restitution) {
        Ok(())
    } else {
        Err(PhysicsError::InvalidRestitution(restitution))
    }
}

/// Fluent construction of a [`Body`]; validation happens in [`BodyBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct BodyBuilder {
    desc: BodyDesc,
}

impl BodyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: Vec2) -> Self {
        self.desc.position = position;
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.desc.shape = shape;
        self
    }

    pub fn circle(mut self, radius: f32) -> Self {
        self.desc.shape = Shape::Circle { radius };
        self
    }

    pub fn polygon(mut self, vertices: Vec<Vec2>) -> Self {
        self.desc.shape = Shape::Polygon { vertices };
        self
    }

    pub fn linear_velocity(mut self, velocity: Vec2) -> Self {
        self.desc.linear_velocity = velocity;
        self
    }

    pub fn angular_velocity(mut self, angular_velocity: f32) -> Self {
        self.desc.angular_velocity = angular_velocity;
        self
    }

    pub fn orientation(mut self, orientation: f32) -> Self {
        self.desc.orientation = orientation;
        self
    }

    pub fn mass(mut self, mass: f32) -> Self {
        self.desc.mass = mass;
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.desc.restitution = restitution;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.desc.color = Some(color.into());
        self
    }

    pub fn movable(mut self, movable: bool) -> Self {
        self.desc.movable = movable;
        self
    }

    pub fn build(self) -> Result<Body> {
        Body::new(self.desc)
    }
}
