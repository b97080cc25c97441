use orbit_sandbox::*;

fn main() -> Result<()> {
    let mut world = World::default();
    let mut scenes = SceneGenerator::new(SceneBounds::new(1280.0, 720.0), 7);
    scenes.spirals(&mut world, 12)?;

    let dt = 1.0 / 60.0;
    for frame in 0..600 {
        world.step(dt);
        if frame % 120 == 0 {
            let profile = world.last_profile();
            println!(
                "frame {frame}: {} bodies, {} gravity sources, max accel {:.1}, step {:?}",
                profile.body_count,
                profile.gravity_sources,
                world.max_acceleration(),
                profile.total_step_time
            );
        }
    }

    let center = scenes.bounds().center();
    let mean_radius = world.bodies()[1..]
        .iter()
        .map(|body| body.position.distance(center))
        .sum::<f32>()
        / (world.len() - 1) as f32;
    println!("mean orbit radius after 10 s: {mean_radius:.1}");
    Ok(())
}
