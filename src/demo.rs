use std::time::Instant;

use anyhow::Context as _;
use rayhost::{
    CameraController, Material, Simulation,
    scene::{Color, MaterialKind, PACKED_HITABLE_SIZE},
    simulation::demo_world,
};

/// Headless exercise of the library: builds the demo scene (optionally
/// loading an OBJ given as the first argument), runs a few synthetic input
/// events, and reports what the window/GL host would upload.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut rng = rand::rng();
    let mut world = demo_world(&mut rng);

    if let Some(path) = std::env::args().nth(1) {
        // make room for the mesh by rebuilding a smaller scene around it
        world = rayhost::World::new();
        world
            .append(rayhost::Hitable::plane(
                [0.0, -1.0, 0.0].into(),
                [0.0, 1.0, 0.0].into(),
            ))
            .expect("an empty world has room for a plane");
        let template = Material {
            kind: MaterialKind::Reflective,
            fuzz: 0.0,
            ref_idx: 1.5,
            color: Color::new(0.5, 0.5, 0.5, 1.0),
            tex_id: None,
        };
        let loaded = rayhost::load_mesh(&path, &mut world, 1, &template)
            .with_context(|| format!("loading mesh from {path}"))?;
        log::info!("{path}: {loaded} triangles");
    }

    let camera = CameraController::builder()
        .viewport_width(1000)
        .viewport_height(500)
        .build();
    let mut simulation = Simulation::new(world, camera);

    // what the host would do once per frame
    if let Some(bytes) = simulation.scene_upload() {
        log::info!(
            "scene buffer: {} bytes ({} records of {} bytes)",
            bytes.len(),
            bytes.len() / PACKED_HITABLE_SIZE,
            PACKED_HITABLE_SIZE
        );
    }

    // a synthetic mouse-look event followed by a couple of ticks holding W
    simulation.pointer_moved(520, 260);
    simulation.key_down(rayhost::Key::W);
    let t0 = Instant::now();
    simulation.update(t0);
    simulation.update(t0 + std::time::Duration::from_millis(100));

    let inputs = simulation.frame_inputs();
    log::info!("eye: {:?}", inputs.eye);
    log::info!("view rotation (column-major): {:?}", inputs.view_rot);
    log::info!("height ratio: {}", inputs.height_ratio);

    Ok(())
}
