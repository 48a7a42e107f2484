//! Hover-drone demo: a drone flying over diamond-square terrain, run headless
//! at a fixed timestep with a scripted pilot.

mod autopilot;
mod config;
mod drone;
mod scene;

use std::path::PathBuf;

use anyhow::Result;
use engine_core::{HeightQuery, MeshVertex, Time};
use input::{DroneBindings, InputState};
use renderer::VertexLayout;

use autopilot::Autopilot;
use config::DemoConfig;
use scene::Scene;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DemoConfig::load(config_path.as_deref());

    let mut scene = Scene::from_config(&config)?;
    log::info!(
        "Scene ready: {} obstacles, textured={}, mix map={}, drone box {:?}",
        scene.obstacles().len(),
        scene.textures().is_some(),
        scene.material().uses_mix_texture(),
        scene.drone().local_aabb().size()
    );
    for item in scene.draw_list() {
        log::info!(
            "Terrain mesh ready: {} vertices, {} triangles, {} bytes per vertex",
            item.mesh.vertex_count(),
            item.mesh.triangle_count(),
            MeshVertex::layout().array_stride
        );
    }

    let mut time = Time::new();
    time.set_timestep_seconds(config.run.timestep);
    let mut input = InputState::new();
    input.set_cursor_locked(true);
    let mut pilot = Autopilot::new(config.run.autopilot_seed, DroneBindings::default());

    let frames_per_report = time.frames_per_second();
    log::info!(
        "Running {} frames at {:.1} Hz",
        config.run.frames,
        1.0 / time.timestep_seconds()
    );

    for _ in 0..config.run.frames {
        time.advance_fixed();
        let dt = time.delta_seconds();

        pilot.drive(&mut input, dt);
        input.begin_frame();
        scene.frame(&input, dt);

        if time.frame_count() % frames_per_report == 0 {
            report(&scene, &time);
        }
    }

    log::info!("Done after {:.2}s simulated", time.elapsed_seconds());
    Ok(())
}

fn report(scene: &Scene, time: &Time) {
    let drone = scene.drone();
    let position = drone.position();
    let (pitch, roll) = drone.tilt();
    let clearance = scene
        .terrain()
        .distance_to_surface(drone.world_aabb().center_bottom());
    log::info!(
        "t={:.1}s pos=({:.2}, {:.2}, {:.2}) yaw={:.2} pitch={:.2} roll={:.2} clearance={:.2}{}",
        time.elapsed_seconds(),
        position.x,
        position.y,
        position.z,
        drone.yaw(),
        pitch,
        roll,
        clearance,
        if drone.is_boosting() { " boost" } else { "" }
    );
}
