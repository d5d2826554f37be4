use std::time::Instant;

use rand::Rng;

use crate::camera::{CameraController, FrameInputs, MovementFlags};
use crate::math::Vector;
use crate::scene::{Color, Hitable, Material, MaterialKind, WORLD_CAPACITY, World};

/// Keys the host loop forwards to the simulation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    W,
    A,
    S,
    D,
    Escape,
}

/// The context object owned by the host's event loop: world, camera and the
/// key state, with the event handlers the host wires its callbacks to.
/// Handlers are synchronous and run to completion; nothing here blocks.
pub struct Simulation {
    world: World,
    camera: CameraController,
    flags: MovementFlags,
    quit_requested: bool,
}

impl Simulation {
    pub fn new(world: World, camera: CameraController) -> Simulation {
        Simulation {
            world,
            camera,
            flags: MovementFlags::default(),
            quit_requested: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraController {
        &mut self.camera
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::W => self.flags.forward = true,
            Key::S => self.flags.backward = true,
            Key::A => self.flags.left = true,
            Key::D => self.flags.right = true,
            Key::Escape => self.quit_requested = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::W => self.flags.forward = false,
            Key::S => self.flags.backward = false,
            Key::A => self.flags.left = false,
            Key::D => self.flags.right = false,
            Key::Escape => {}
        }
    }

    /// Forwards a pointer event to the camera; the host must warp the
    /// pointer to the returned position when one is given.
    pub fn pointer_moved(&mut self, x: i32, y: i32) -> Option<(i32, i32)> {
        self.camera.pointer_moved(x, y)
    }

    /// Runs the frame-rate-gated tick with the held keys. Returns whether
    /// the frame advanced and the host should redisplay.
    pub fn update(&mut self, now: Instant) -> bool {
        self.camera.tick(now, self.flags)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn frame_inputs(&self) -> FrameInputs {
        self.camera.frame_inputs()
    }

    /// The scene bytes to upload, or `None` when the buffer on the GPU is
    /// already current.
    pub fn scene_upload(&mut self) -> Option<&[u8]> {
        if self.world.is_dirty() {
            Some(self.world.packed_bytes())
        } else {
            None
        }
    }
}

/// The procedural startup scene: a ground plane, one large polished mirror
/// sphere, and random small spheres filling every remaining slot.
pub fn demo_world(rng: &mut impl Rng) -> World {
    let mut world = World::new();

    world
        .append(Hitable::plane(
            Vector::from([0.0, -1.0, 0.0]),
            Vector::from([0.0, 1.0, 0.0]),
        ))
        .unwrap_or_else(|_| unreachable!("the demo scene fits the world"));

    let mirror = Hitable::sphere(Vector::from([6.0, 4.0, -2.0]), 5.0).with_material(Material {
        kind: MaterialKind::Reflective,
        fuzz: 0.0,
        ref_idx: 0.0,
        color: Color::new(1.0, 216.0 / 255.0, 228.0 / 255.0, 1.0),
        tex_id: None,
    });
    world
        .append(mirror)
        .unwrap_or_else(|_| unreachable!("the demo scene fits the world"));

    for i in 2..WORLD_CAPACITY {
        let y = (rng.random_range(0..100) - 50) as f32 / 40.0;
        let center = Vector::from([
            rng.random_range(0..100) as f32 / 100.0 + (i as f32 - 50.0) / 3.0,
            y,
            (rng.random_range(0..100) - 50) as f32 / 2.5,
        ]);
        let kind = MaterialKind::from_tag(rng.random_range(1..=3))
            .unwrap_or_else(|| unreachable!("tags 1..=3 are material kinds"));
        let sphere = Hitable::sphere(center, y + 1.0).with_material(Material {
            kind,
            fuzz: 0.0,
            ref_idx: 1.5,
            color: Color::new(
                rng.random_range(0..100) as f32 / 100.0,
                rng.random_range(0..100) as f32 / 100.0,
                rng.random_range(0..100) as f32 / 100.0,
                1.0,
            ),
            tex_id: None,
        });
        world
            .append(sphere)
            .unwrap_or_else(|_| unreachable!("the demo scene fits the world"));
    }

    world
}
