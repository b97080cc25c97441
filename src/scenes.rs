//! Seeded scene presets built on the public [`World`] and [`Body`] API.
//!
//! Every preset appends bodies to the world it is given and flips the world flags it
//! relies on. The same seed and bounds always produce the same scene.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::prelude::*;

use crate::{
    core::{rigidbody::Body, shape::Shape},
    error::Result,
    utils::math::orbit_velocity,
    world::World,
};

/// Thickness of the walls added by [`SceneGenerator::add_boundaries`].
pub const WALL_THICKNESS: f32 = 120.0;

const WALL_COLOR: &str = "hsl(217 56% 34.2%)";
const SUN_MASS: f32 = 70_000.0;
const SUN_RADIUS: f32 = 25.0;
const PLANET_MASS: f32 = 0.01;

/// Visible area a scene is laid out in, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub width: f32,
    pub height: f32,
}

impl SceneBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}

impl Default for SceneBounds {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Scene builder with seeded randomness.
pub struct SceneGenerator {
    bounds: SceneBounds,
    rng: StdRng,
}

impl SceneGenerator {
    pub fn new(bounds: SceneBounds, seed: u64) -> Self {
        Self {
            bounds,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn bounds(&self) -> SceneBounds {
        self.bounds
    }

    /// Random point at least one wall thickness away from every edge.
    fn interior_point(&mut self) -> Vec2 {
        let x = self.span(WALL_THICKNESS, self.bounds.width - WALL_THICKNESS);
        let y = self.span(WALL_THICKNESS, self.bounds.height - WALL_THICKNESS);
        Vec2::new(x, y)
    }

    fn span(&mut self, low: f32, high: f32) -> f32 {
        self.rng.gen_range(low..=high.max(low))
    }

    fn random_velocity(&mut self, speed: f32) -> Vec2 {
        Vec2::new(self.span(-speed, speed), self.span(-speed, speed))
    }

    fn random_color(&mut self, hue_min: u32, hue_max: u32) -> String {
        let hue = self.rng.gen_range(hue_min..=hue_max);
        let saturation = self.rng.gen_range(50..=70);
        let lightness = self.rng.gen_range(55..=75);
        format!("hsl({hue}, {saturation}%, {lightness}%)")
    }

    /// Four static walls just outside the visible area. Returns their indices.
    pub fn add_boundaries(&mut self, world: &mut World, restitution: f32) -> Result<Vec<usize>> {
        let SceneBounds { width, height } = self.bounds;
        let inset = WALL_THICKNESS * 0.35;
        let walls = [
            (Vec2::new(width * 0.5, -inset), width * 2.0, WALL_THICKNESS),
            (Vec2::new(width * 0.5, height + inset), width * 2.0, WALL_THICKNESS),
            (Vec2::new(-inset, height * 0.5), WALL_THICKNESS, height * 2.0),
            (Vec2::new(width + inset, height * 0.5), WALL_THICKNESS, height * 2.0),
        ];

        let mut indices = Vec::with_capacity(walls.len());
        for (position, w, h) in walls {
            let wall = Body::builder()
                .shape(Shape::rectangle(w, h)?)
                .position(position)
                .mass(0.0)
                .restitution(restitution)
                .movable(false)
                .color(WALL_COLOR)
                .build()?;
            indices.push(world.add(wall));
        }
        Ok(indices)
    }

    /// Bouncing circles under downward gravity.
    pub fn gravity_sandbox(&mut self, world: &mut World, count: usize) -> Result<()> {
        world.collisions_enabled = true;
        world.mutual_gravity_enabled = false;
        world.gravity.y = 400.0;
        self.add_boundaries(world, 0.9)?;

        for _ in 0..count {
            let body = Body::builder()
                .circle(20.0)
                .position(self.interior_point())
                .mass(100.0)
                .restitution(0.95)
                .color(self.random_color(0, 60))
                .build()?;
            world.add(body);
        }
        Ok(())
    }

    /// Drifting circles in a closed box without any gravity.
    pub fn zero_gravity(&mut self, world: &mut World, count: usize) -> Result<()> {
        world.collisions_enabled = true;
        world.mutual_gravity_enabled = false;
        self.add_boundaries(world, 1.0)?;

        for _ in 0..count {
            let position = self.interior_point();
            let velocity = self.random_velocity(75.0);
            let radius = self.span(15.0, 20.0);
            let body = Body::builder()
                .circle(radius)
                .position(position)
                .linear_velocity(velocity)
                .mass(10.0)
                .color(self.random_color(240, 360))
                .build()?;
            world.add(body);
        }
        Ok(())
    }

    /// Hexagons pulling on each other and colliding.
    pub fn attraction(&mut self, world: &mut World, count: usize) -> Result<()> {
        world.collisions_enabled = true;
        world.mutual_gravity_enabled = true;
        world.movable_mutual_gravity_enabled = true;
        self.add_boundaries(world, 1.0)?;

        let hexagon = Shape::regular_polygon(6, 25.0)?;
        for _ in 0..count {
            let body = Body::builder()
                .shape(hexagon.clone())
                .position(self.interior_point())
                .mass(150.0)
                .restitution(0.9)
                .color("velocity")
                .build()?;
            world.add(body);
        }
        Ok(())
    }

    fn add_sun(&self, world: &mut World) -> Result<usize> {
        let sun = Body::builder()
            .circle(SUN_RADIUS)
            .position(self.bounds.center())
            .mass(SUN_MASS)
            .movable(false)
            .color("blue")
            .build()?;
        Ok(world.add(sun))
    }

    fn add_planet(&self, world: &mut World, position: Vec2, radius: f32) -> Result<usize> {
        let velocity = orbit_velocity(
            self.bounds.center(),
            position,
            SUN_MASS,
            world.mutual_gravity.gravitational_constant,
        );
        let planet = Body::builder()
            .circle(radius)
            .position(position)
            .linear_velocity(velocity)
            .mass(PLANET_MASS)
            .color("rainbow")
            .build()?;
        Ok(world.add(planet))
    }

    /// Static sun with `symmetry` planets on each of 60 concentric rings.
    pub fn spirals(&mut self, world: &mut World, symmetry: usize) -> Result<()> {
        world.collisions_enabled = false;
        world.mutual_gravity_enabled = true;
        world.movable_mutual_gravity_enabled = false;
        self.add_sun(world)?;

        let center = self.bounds.center();
        let mut orbit_radius = 100.0;
        for ring in 0..60 {
            let radius = ring_body_radius(ring);
            orbit_radius += radius * 4.0;
            for k in 0..symmetry {
                let angle = TAU * k as f32 / symmetry as f32;
                self.add_planet(world, center + Vec2::from_angle(angle) * orbit_radius, radius)?;
            }
        }
        Ok(())
    }

    /// Static sun with rings whose planet count grows with circumference.
    pub fn polka(&mut self, world: &mut World, density: f32) -> Result<()> {
        world.collisions_enabled = false;
        world.mutual_gravity_enabled = true;
        world.movable_mutual_gravity_enabled = false;
        self.add_sun(world)?;

        let center = self.bounds.center();
        let mut orbit_radius = 100.0;
        for ring in 0..30 {
            let radius = ring_body_radius(ring);
            orbit_radius += radius * 4.0 + 10.0;
            let count = (TAU * orbit_radius * density).floor().max(0.0) as usize;
            for k in 0..count {
                let angle = TAU * k as f32 / count as f32;
                self.add_planet(world, center + Vec2::from_angle(angle) * orbit_radius, radius)?;
            }
        }
        Ok(())
    }

    /// Spinning pentagons and hexagons in a closed box.
    pub fn stacks(&mut self, world: &mut World, count: usize) -> Result<()> {
        world.collisions_enabled = true;
        self.add_boundaries(world, 1.0)?;

        for _ in 0..count {
            let position = self.interior_point();
            let velocity = self.random_velocity(75.0);
            let sides = self.rng.gen_range(5..=6);
            let body = Body::builder()
                .shape(Shape::regular_polygon(sides, 25.0)?)
                .position(position)
                .linear_velocity(velocity)
                .angular_velocity(PI * 0.5)
                .mass(100.0)
                .restitution(1.0)
                .color(self.random_color(120, 180))
                .build()?;
            world.add(body);
        }
        Ok(())
    }
}

/// Planet radius on ring `ring`; inner rings carry larger planets.
fn ring_body_radius(ring: usize) -> f32 {
    15.0 / ((ring + 4) as f32).log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_four_static_walls() {
        let mut world = World::default();
        let mut scenes = SceneGenerator::new(SceneBounds::default(), 1);
        let walls = scenes.add_boundaries(&mut world, 1.0).unwrap();

        assert_eq!(walls, vec![0, 1, 2, 3]);
        assert!(world.bodies().iter().all(Body::is_static));
    }

    #[test]
    fn ring_radius_shrinks_outward() {
        assert!((ring_body_radius(0) - 7.5).abs() < 1e-6);
        assert!(ring_body_radius(10) < ring_body_radius(9));
    }

    #[test]
    fn tiny_bounds_do_not_panic() {
        let mut world = World::default();
        let mut scenes = SceneGenerator::new(SceneBounds::new(50.0, 50.0), 3);
        scenes.zero_gravity(&mut world, 5).unwrap();
        assert_eq!(world.len(), 9);
    }
}
