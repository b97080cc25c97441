use approx::assert_relative_eq;
use orbit_sandbox::{dynamics::gravity::pairwise_force, *};
use rand::prelude::*;

fn scattered_points(count: usize, seed: u64) -> Vec<(Vec2, f32)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let position = Vec2::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0));
            (position, rng.gen_range(1.0..50.0))
        })
        .collect()
}

/// Total tree-force error relative to the total exact force magnitude.
fn relative_error(points: &[(Vec2, f32)], theta: f32) -> f32 {
    let params = MutualGravity {
        theta,
        ..MutualGravity::default()
    };
    let positions: Vec<Vec2> = points.iter().map(|(p, _)| *p).collect();
    let mut tree = QuadTree::from_bounds(&Aabb::from_points(&positions));
    for (index, &(position, mass)) in points.iter().enumerate() {
        assert!(tree.insert(index, position, mass));
    }

    let mut error = 0.0;
    let mut magnitude = 0.0;
    for (index, &(position, mass)) in points.iter().enumerate() {
        let others: Vec<(Vec2, f32)> = points
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != index)
            .map(|(_, point)| *point)
            .collect();
        let exact = pairwise_force(&others, position, mass, &params);
        let approx = tree.compute_force(index, position, mass, &params);
        error += (approx - exact).length();
        magnitude += exact.length();
    }
    error / magnitude
}

#[test]
fn zero_theta_matches_pairwise_summation() {
    let points = scattered_points(200, 11);
    assert!(relative_error(&points, 0.0) < 1e-3);
}

#[test]
fn default_theta_stays_close_to_exact() {
    let points = scattered_points(200, 12);
    assert!(relative_error(&points, 0.5) < 0.05);
}

#[test]
fn larger_theta_trades_accuracy() {
    let points = scattered_points(300, 13);
    let exact = relative_error(&points, 0.0);
    let coarse = relative_error(&points, 1.5);
    assert!(coarse > exact, "coarse {coarse} vs exact {exact}");
}

#[test]
fn static_attractor_pulls_movable_body() {
    let mut world = World::default();
    world.collisions_enabled = false;
    world.mutual_gravity_enabled = true;
    world.add(
        Body::builder()
            .circle(10.0)
            .mass(1000.0)
            .movable(false)
            .build()
            .unwrap(),
    );
    world.add(
        Body::builder()
            .circle(1.0)
            .position(Vec2::new(100.0, 0.0))
            .build()
            .unwrap(),
    );

    world.step(1.0 / 60.0);

    let sun = &world.bodies()[0];
    let planet = &world.bodies()[1];
    assert_eq!(sun.position, Vec2::ZERO);
    assert!(planet.linear_velocity.x < 0.0);
    assert_relative_eq!(planet.linear_velocity.y, 0.0, epsilon = 1e-6);
    assert_eq!(world.last_profile().gravity_sources, 1);
    // G * M / (d^2 + softening), projected with the softened distance.
    let softened = 10_100.0_f32;
    let expected = 1000.0 / softened * 100.0 / softened.sqrt();
    assert_relative_eq!(planet.acceleration.length(), expected, epsilon = 1e-4);
}

#[test]
fn movable_bodies_only_attract_when_enabled() {
    let pair = || {
        [
            Body::builder().circle(1.0).mass(500.0).build().unwrap(),
            Body::builder()
                .circle(1.0)
                .mass(500.0)
                .position(Vec2::new(50.0, 0.0))
                .build()
                .unwrap(),
        ]
    };

    let mut world = World::default();
    world.collisions_enabled = false;
    world.mutual_gravity_enabled = true;
    world.extend(pair());
    world.step(1.0 / 60.0);
    assert_eq!(world.bodies()[0].linear_velocity, Vec2::ZERO);
    assert_eq!(world.last_profile().gravity_sources, 0);

    let mut world = World::default();
    world.collisions_enabled = false;
    world.mutual_gravity_enabled = true;
    world.movable_mutual_gravity_enabled = true;
    world.extend(pair());
    world.step(1.0 / 60.0);
    let a = &world.bodies()[0];
    let b = &world.bodies()[1];
    assert!(a.linear_velocity.x > 0.0);
    assert!(b.linear_velocity.x < 0.0);
    assert_relative_eq!(a.linear_velocity.x, -b.linear_velocity.x, epsilon = 1e-5);
}

#[test]
fn coincident_sources_do_not_overflow_the_tree() {
    let mut tree = QuadTree::new(Vec2::ZERO, 100.0);
    for index in 0..64 {
        assert!(tree.insert(index, Vec2::splat(3.0), 1.0));
    }
    assert_eq!(tree.len(), 64);
    assert_relative_eq!(tree.root().mass, 64.0);

    let params = MutualGravity::default();
    let force = tree.compute_force(usize::MAX, Vec2::new(-50.0, 3.0), 1.0, &params);
    assert!(force.x > 0.0 && force.is_finite());
}

#[test]
fn explicit_bounds_exclude_far_sources() {
    let config = WorldConfig {
        collisions_enabled: false,
        mutual_gravity_enabled: true,
        bounds: Some(Aabb::new(Vec2::splat(-100.0), Vec2::splat(100.0))),
        ..WorldConfig::default()
    };
    let mut world = World::new(config).unwrap();
    let far_sun = Body::builder()
        .circle(5.0)
        .mass(1.0e6)
        .movable(false)
        .position(Vec2::new(5000.0, 0.0))
        .build()
        .unwrap();
    world.add(far_sun);
    world.add(Body::builder().circle(1.0).build().unwrap());

    world.step(1.0 / 60.0);

    assert_eq!(world.last_profile().gravity_sources, 0);
    assert_eq!(world.bodies()[1].linear_velocity, Vec2::ZERO);
}
