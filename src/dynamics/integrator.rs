use glam::Vec2;

use crate::core::rigidbody::Body;

/// Applies uniform gravity and advances every body by one explicit step.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    pub damping: f32,
}

impl Integrator {
    pub fn new(damping: f32) -> Self {
        Self { damping }
    }

    /// Integrates all bodies in order and returns the largest acceleration magnitude seen.
    ///
    /// Uniform gravity enters as `gravity * mass` on top of whatever force has already
    /// accumulated, so it combines with mutual gravity.
    pub fn step(&self, bodies: &mut [Body], gravity: Vec2, dt: f32) -> f32 {
        let mut max_acceleration = 0.0_f32;

        for body in bodies.iter_mut() {
            if !body.is_static() {
                let weight = gravity * body.mass();
                body.apply_force(weight);
            }
            body.integrate(dt, self.damping);
            max_acceleration = max_acceleration.max(body.acceleration.length());
        }

        max_acceleration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gravity_is_mass_independent_acceleration() {
        let mut bodies = vec![
            Body::builder().circle(1.0).mass(1.0).build().unwrap(),
            Body::builder().circle(1.0).mass(50.0).build().unwrap(),
        ];
        let max = Integrator::new(1.0).step(&mut bodies, Vec2::new(0.0, 10.0), 0.1);

        assert_relative_eq!(bodies[0].linear_velocity.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(bodies[1].linear_velocity.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(max, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn gravity_combines_with_accumulated_force() {
        let mut bodies = vec![Body::builder().circle(1.0).mass(2.0).build().unwrap()];
        bodies[0].apply_force(Vec2::new(4.0, 0.0));
        Integrator::new(1.0).step(&mut bodies, Vec2::new(0.0, 10.0), 1.0);

        assert_relative_eq!(bodies[0].acceleration.x, 2.0);
        assert_relative_eq!(bodies[0].acceleration.y, 10.0);
    }

    #[test]
    fn static_bodies_stay_put_under_gravity() {
        let mut bodies = vec![Body::builder().mass(0.0).build().unwrap()];
        Integrator::new(0.9).step(&mut bodies, Vec2::new(0.0, 400.0), 1.0);
        assert_eq!(bodies[0].position, Vec2::ZERO);
    }
}
