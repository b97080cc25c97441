use approx::assert_relative_eq;
use orbit_sandbox::*;

const DT: f32 = 1.0 / 60.0;

fn ball(position: Vec2, velocity: Vec2, radius: f32, restitution: f32) -> Body {
    Body::builder()
        .circle(radius)
        .position(position)
        .linear_velocity(velocity)
        .restitution(restitution)
        .build()
        .expect("valid ball")
}

fn floor(center: Vec2, width: f32, height: f32) -> Body {
    Body::builder()
        .shape(Shape::rectangle(width, height).expect("valid floor"))
        .position(center)
        .mass(0.0)
        .movable(false)
        .build()
        .expect("valid floor body")
}

#[test]
fn head_on_elastic_circles_swap_velocities() {
    let mut world = World::default();
    world.add(ball(Vec2::ZERO, Vec2::new(10.0, 0.0), 10.0, 1.0));
    world.add(ball(Vec2::new(19.0, 0.0), Vec2::new(-10.0, 0.0), 10.0, 1.0));

    world.step(DT);

    assert_relative_eq!(world.bodies()[0].linear_velocity.x, -10.0, epsilon = 1e-3);
    assert_relative_eq!(world.bodies()[1].linear_velocity.x, 10.0, epsilon = 1e-3);
    assert_eq!(world.last_profile().contacts_resolved, 1);
}

#[test]
fn overlapping_pair_in_shared_cells_is_resolved_once() {
    let mut world = World::new(WorldConfig {
        cell_size: 10.0,
        ..WorldConfig::default()
    })
    .unwrap();
    // Both circles straddle the same four cells around (10, 10).
    world.add(ball(Vec2::new(9.0, 10.0), Vec2::ZERO, 2.0, 0.5));
    world.add(ball(Vec2::new(11.0, 10.0), Vec2::ZERO, 2.0, 0.5));

    world.step(DT);

    assert_eq!(world.last_profile().pairs_tested, 1);
    assert_eq!(world.last_profile().contacts_resolved, 1);
}

#[test]
fn disabled_collisions_let_bodies_pass_through() {
    let mut world = World::default();
    world.collisions_enabled = false;
    world.add(ball(Vec2::ZERO, Vec2::ZERO, 10.0, 1.0));
    world.add(ball(Vec2::new(5.0, 0.0), Vec2::ZERO, 10.0, 1.0));

    world.step(DT);

    assert_eq!(world.bodies()[0].position, Vec2::ZERO);
    assert_eq!(world.bodies()[1].position, Vec2::new(5.0, 0.0));
    assert_eq!(world.last_profile().pairs_tested, 0);
}

#[test]
fn ball_settles_on_static_floor() {
    let mut world = World::default();
    world.gravity = Vec2::new(0.0, 400.0);
    let floor_index = world.add(floor(Vec2::new(0.0, 100.0), 400.0, 40.0));
    let ball_index = world.add(ball(Vec2::ZERO, Vec2::ZERO, 10.0, 0.5));

    for _ in 0..300 {
        world.step(DT);
    }

    let floor = &world.bodies()[floor_index];
    assert_eq!(floor.position, Vec2::new(0.0, 100.0));
    assert_eq!(floor.linear_velocity, Vec2::ZERO);

    let ball = &world.bodies()[ball_index];
    // Floor top is at y = 80; the ball rests with its center one radius above it.
    assert!(ball.position.y > 65.0 && ball.position.y < 72.0, "ball at {:?}", ball.position);
    assert!(ball.linear_velocity.y.abs() < 10.0, "ball still moving {:?}", ball.linear_velocity);
}

#[test]
fn static_pairs_are_skipped() {
    let mut world = World::default();
    world.add(floor(Vec2::ZERO, 100.0, 20.0));
    world.add(floor(Vec2::new(10.0, 0.0), 100.0, 20.0));

    world.step(DT);

    assert_eq!(world.last_profile().pairs_tested, 0);
    assert_eq!(world.bodies()[1].position, Vec2::new(10.0, 0.0));
}

#[test]
fn box_against_box_separates() {
    let mut world = World::default();
    let a = Body::builder()
        .shape(Shape::rectangle(20.0, 20.0).unwrap())
        .linear_velocity(Vec2::new(30.0, 0.0))
        .restitution(0.0)
        .build()
        .unwrap();
    let b = Body::builder()
        .shape(Shape::rectangle(20.0, 20.0).unwrap())
        .position(Vec2::new(19.0, 0.0))
        .restitution(0.0)
        .build()
        .unwrap();
    world.add(a);
    world.add(b);

    world.step(DT);

    let [a, b] = [&world.bodies()[0], &world.bodies()[1]];
    let closing = (b.linear_velocity - a.linear_velocity).x;
    assert!(closing >= -1e-4, "boxes still approaching at {closing}");
    assert!(b.position.x - a.position.x > 19.0);
}
