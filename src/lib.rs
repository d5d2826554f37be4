pub mod camera;
pub mod math;
pub mod mesh;
pub mod scene;
pub mod simulation;

pub use camera::{CameraController, FrameInputs, MovementFlags};
pub use mesh::{MeshError, load_mesh, load_mesh_str};
pub use scene::{Hitable, Material, WORLD_CAPACITY, World};
pub use simulation::{Key, Simulation, demo_world};
