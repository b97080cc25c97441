//! Additional math helpers layered on top of `glam`.

use glam::Vec2;

/// Chainable in-place arithmetic and the few scalar helpers `glam::Vec2` lacks.
///
/// The mutating methods modify the receiver and hand it back so calls can be chained:
///
/// ```
/// use glam::Vec2;
/// use orbit_sandbox::Vec2Ext;
///
/// let mut v = Vec2::new(3.0, 4.0);
/// v.scale_mut(2.0).normalize_mut();
/// assert!((v.magnitude() - 1.0).abs() < 1e-6);
/// ```
pub trait Vec2Ext {
    fn add_mut(&mut self, other: Vec2) -> &mut Self;
    fn sub_mut(&mut self, other: Vec2) -> &mut Self;
    fn scale_mut(&mut self, s: f32) -> &mut Self;
    /// Component-wise product.
    fn multiply_mut(&mut self, other: Vec2) -> &mut Self;
    /// Leaves a zero vector untouched.
    fn normalize_mut(&mut self) -> &mut Self;
    /// Scalar 2D cross product (`x1 * y2 - y1 * x2`).
    fn cross(self, other: Vec2) -> f32;
    fn magnitude(self) -> f32;
}

impl Vec2Ext for Vec2 {
    fn add_mut(&mut self, other: Vec2) -> &mut Self {
        *self += other;
        self
    }

    fn sub_mut(&mut self, other: Vec2) -> &mut Self {
        *self -= other;
        self
    }

    fn scale_mut(&mut self, s: f32) -> &mut Self {
        *self *= s;
        self
    }

    fn multiply_mut(&mut self, other: Vec2) -> &mut Self {
        *self *= other;
        self
    }

    fn normalize_mut(&mut self) -> &mut Self {
        let mag = self.length();
        if mag > 0.0 {
            *self /= mag;
        }
        self
    }

    fn cross(self, other: Vec2) -> f32 {
        self.perp_dot(other)
    }

    fn magnitude(self) -> f32 {
        self.length()
    }
}

/// Rotates `v` counter-clockwise by `angle` radians.
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Velocity for a circular orbit of `position` around a mass at `center`.
///
/// The result is perpendicular to the radius; coincident points yield zero.
pub fn orbit_velocity(center: Vec2, position: Vec2, central_mass: f32, g: f32) -> Vec2 {
    let radius = position - center;
    let distance = radius.length();
    if distance <= f32::EPSILON {
        return Vec2::ZERO;
    }
    let speed = (g * central_mass / distance).sqrt();
    radius.perp() / distance * speed
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
