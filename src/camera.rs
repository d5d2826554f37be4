use std::time::Instant;

use assert2::assert;
use bon::bon;

use crate::math::{Matrix, Quaternion, Vector};

pub const DEFAULT_SENSITIVITY: f32 = 0.002;
pub const DEFAULT_MOVE_SPEED: f32 = 3.0;
pub const DEFAULT_TARGET_FPS: f32 = 24.0;
pub const DEFAULT_FOV_DEGREES: f32 = 90.0;

/// Which movement keys are currently held.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MovementFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// The per-frame scalar inputs the host pushes to the shader.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameInputs {
    pub resolution: [f32; 2],
    pub resolution_inv: [f32; 2],
    /// Pixel-to-angle ratio derived from the vertical half-FOV.
    pub height_ratio: f32,
    pub eye: [f32; 3],
    /// Orientation basis, column-major.
    pub view_rot: [f32; 9],
}

/// First-person camera state: an eye position and a 3x3 orientation basis
/// whose columns are the right, up and backward axes in world space.
///
/// Pointer deltas turn into incremental quaternion rotations of the basis
/// columns; held movement keys translate the eye along the horizontal
/// projections of the basis axes, gated to the target frame rate.
#[derive(Clone, Debug)]
pub struct CameraController {
    eye: Vector<f32>,
    orientation: Matrix<f32>,
    viewport: (u32, u32),
    fov_degrees: f32,
    sensitivity: f32,
    move_speed: f32,
    target_fps: f32,
    last_tick: Option<Instant>,
    just_warped: bool,
}

#[bon]
impl CameraController {
    #[builder]
    pub fn new(
        viewport_width: u32,
        viewport_height: u32,
        #[builder(default = Vector::from([0.0, 0.0, 5.0]))] eye: Vector<f32>,
        #[builder(default = Matrix::identity(3))] orientation: Matrix<f32>,
        #[builder(default = DEFAULT_FOV_DEGREES)] fov_degrees: f32,
        #[builder(default = DEFAULT_SENSITIVITY)] sensitivity: f32,
        #[builder(default = DEFAULT_MOVE_SPEED)] move_speed: f32,
        #[builder(default = DEFAULT_TARGET_FPS)] target_fps: f32,
    ) -> Self {
        assert!(viewport_width > 0);
        assert!(viewport_height > 0);
        assert!(eye.dim() == 3);
        assert!(orientation.rows() == 3 && orientation.cols() == 3);
        assert!(target_fps > 0.0);

        CameraController {
            eye,
            orientation,
            viewport: (viewport_width, viewport_height),
            fov_degrees,
            sensitivity,
            move_speed,
            target_fps,
            last_tick: None,
            just_warped: false,
        }
    }
}

impl CameraController {
    pub fn eye(&self) -> &Vector<f32> {
        &self.eye
    }

    pub fn orientation(&self) -> &Matrix<f32> {
        &self.orientation
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        assert!(width > 0);
        assert!(height > 0);
        self.viewport = (width, height);
    }

    /// Handles an absolute pointer position from the host.
    ///
    /// Returns the viewport midpoint the host must warp the pointer to, or
    /// `None` when the event was the echo of our own warp and was discarded
    /// (otherwise the warp would feed back as an opposite look delta).
    pub fn pointer_moved(&mut self, x: i32, y: i32) -> Option<(i32, i32)> {
        if self.just_warped {
            self.just_warped = false;
            return None;
        }

        let center = (self.viewport.0 as i32 / 2, self.viewport.1 as i32 / 2);
        let dx = x - center.0;
        let dy = y - center.1;
        self.apply_pointer_delta(dx as f32, dy as f32);

        self.just_warped = true;
        Some(center)
    }

    /// Applies a look delta: yaw about the world up axis, then pitch about
    /// the freshly yawed right axis.
    pub fn apply_pointer_delta(&mut self, dx: f32, dy: f32) {
        let yaw = dx * -self.sensitivity;
        self.rotate_basis(yaw, Vector::from([0.0, 1.0, 0.0]));

        let pitch = dy * -self.sensitivity;
        let right = self.column(0);
        self.rotate_basis(pitch, right);

        // rotors are unit-length only up to rounding; keep the basis from
        // drifting over thousands of events
        self.renormalize_basis();
    }

    /// Rotates every basis column about `axis` with the sandwich product.
    ///
    /// The rotor uses the full angle, `(cos θ, sin θ·axis)`, not the
    /// half-angle of a standard rotor. The effective rotation is 2θ and the
    /// look sensitivity constant is calibrated against that.
    fn rotate_basis(&mut self, angle: f32, axis: Vector<f32>) {
        let rotor = Quaternion::new(angle.cos(), axis.scale(angle.sin()))
            .unwrap_or_else(|_| unreachable!("rotation axes are 3-dimensional"));
        for c in 0..3 {
            let rotated = rotor
                .rotate(&self.column(c))
                .unwrap_or_else(|_| unreachable!("basis columns are 3-dimensional"));
            self.orientation
                .set_column(c, rotated)
                .unwrap_or_else(|_| unreachable!("the basis is 3x3"));
        }
    }

    fn renormalize_basis(&mut self) {
        for c in 0..3 {
            if let Ok(unit) = self.column(c).unit() {
                self.orientation
                    .set_column(c, unit)
                    .unwrap_or_else(|_| unreachable!("the basis is 3x3"));
            }
        }
    }

    fn column(&self, c: usize) -> Vector<f32> {
        self.orientation
            .column(c)
            .unwrap_or_else(|_| unreachable!("the basis is 3x3"))
            .clone()
    }

    /// Advances the simulation clock. A no-op unless at least `1/target_fps`
    /// seconds have passed since the last accepted tick; returns whether the
    /// frame advanced (and the host should redisplay).
    ///
    /// Movement is confined to the horizontal plane: the forward and right
    /// axes have their vertical component zeroed and are re-normalized. An
    /// axis that projects to zero (looking straight up or down) is skipped.
    /// Forward wins over backward and right over left when both are held.
    pub fn tick(&mut self, now: Instant, flags: MovementFlags) -> bool {
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return false;
        };
        let dt = now.duration_since(last).as_secs_f32();
        if dt <= 1.0 / self.target_fps {
            return false;
        }
        self.last_tick = Some(now);

        if let Some(forward) = horizontal(&-self.column(2)) {
            if flags.forward {
                self.eye += &forward.scale(self.move_speed * dt);
            } else if flags.backward {
                self.eye -= &forward.scale(self.move_speed * dt);
            }
        }
        if let Some(right) = horizontal(&self.column(0)) {
            if flags.right {
                self.eye += &right.scale(self.move_speed * dt);
            } else if flags.left {
                self.eye -= &right.scale(self.move_speed * dt);
            }
        }

        true
    }

    pub fn frame_inputs(&self) -> FrameInputs {
        let (width, height) = self.viewport;
        let (width, height) = (width as f32, height as f32);
        let half_fov = (self.fov_degrees / 2.0).to_radians();

        let mut eye = [0.0; 3];
        for (slot, value) in eye.iter_mut().zip(self.eye.iter()) {
            *slot = value;
        }
        let view_rot = self
            .orientation
            .to_column_major()
            .try_into()
            .unwrap_or_else(|_| unreachable!("the basis is 3x3"));

        FrameInputs {
            resolution: [width, height],
            resolution_inv: [1.0 / width, 1.0 / height],
            height_ratio: half_fov.tan() / height,
            eye,
            view_rot,
        }
    }
}

/// Projects onto the horizontal plane and re-normalizes; `None` when the
/// projection is zero-length.
fn horizontal(v: &Vector<f32>) -> Option<Vector<f32>> {
    let mut flat = v.clone();
    flat.set(1, 0.0).ok()?;
    flat.unit().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use std::time::Duration;

    fn controller() -> CameraController {
        CameraController::builder()
            .viewport_width(1000)
            .viewport_height(500)
            .build()
    }

    fn approx_matrix(a: &Matrix<f32>, b: &Matrix<f32>, tolerance: f32) -> bool {
        (0..3).all(|c| {
            let x = a.column(c).unwrap();
            let y = b.column(c).unwrap();
            x.iter().zip(y.iter()).all(|(p, q)| (p - q).abs() <= tolerance)
        })
    }

    fn approx_vec(a: &Vector<f32>, b: &Vector<f32>, tolerance: f32) -> bool {
        a.iter().zip(b.iter()).all(|(p, q)| (p - q).abs() <= tolerance)
    }

    #[test]
    fn zero_delta_is_identity() {
        let mut camera = controller();
        let before = camera.orientation().clone();
        camera.apply_pointer_delta(0.0, 0.0);
        assert!(approx_matrix(camera.orientation(), &before, 1e-6));
    }

    #[test]
    fn symmetric_yaw_returns_to_start() {
        let mut camera = controller();
        let before = camera.orientation().clone();
        camera.apply_pointer_delta(150.0, 0.0);
        camera.apply_pointer_delta(-150.0, 0.0);
        assert!(approx_matrix(camera.orientation(), &before, 1e-4));
    }

    #[test]
    fn yaw_turns_about_the_world_up_axis() {
        let mut camera = controller();
        camera.apply_pointer_delta(100.0, 0.0);
        // the up column is untouched by pure yaw
        assert!(approx_vec(
            &camera.column(1),
            &Vector::from([0.0, 1.0, 0.0]),
            1e-5
        ));
        // the backward column stays in the horizontal plane and stays unit
        let backward = camera.column(2);
        assert!(backward[1].abs() < 1e-5);
        assert!((backward.magnitude() - 1.0).abs() < 1e-5);
        assert!(backward[2] < 1.0);
    }

    #[test]
    fn warp_echo_is_discarded() {
        let mut camera = controller();
        let warp = camera.pointer_moved(600, 300);
        assert!(warp == Some((500, 250)));
        let after_first = camera.orientation().clone();

        // the echo of the warp must not rotate again
        assert!(camera.pointer_moved(500, 250) == None);
        assert!(approx_matrix(camera.orientation(), &after_first, 0.0));

        // and the next real event is processed
        assert!(camera.pointer_moved(510, 250) == Some((500, 250)));
    }

    #[test]
    fn tick_is_gated_to_the_target_frame_rate() {
        let mut camera = controller();
        let flags = MovementFlags {
            forward: true,
            ..Default::default()
        };
        let t0 = Instant::now();

        // first call only records the timestamp
        assert!(!camera.tick(t0, flags));
        let start = camera.eye().clone();

        // 10 ms later: under 1/24 s, gate holds
        assert!(!camera.tick(t0 + Duration::from_millis(10), flags));
        assert!(camera.eye() == &start);

        // 50 ms later: gate passes and the eye moves
        assert!(camera.tick(t0 + Duration::from_millis(50), flags));
        assert!(camera.eye() != &start);
    }

    #[test]
    fn forward_moves_along_negative_z() {
        let mut camera = controller();
        let flags = MovementFlags {
            forward: true,
            ..Default::default()
        };
        let t0 = Instant::now();
        camera.tick(t0, flags);
        camera.tick(t0 + Duration::from_secs(1), flags);
        // forward is -backward = (0, 0, -1); speed 3 for one second
        assert!(approx_vec(camera.eye(), &Vector::from([0.0, 0.0, 2.0]), 1e-4));
    }

    #[test]
    fn forward_wins_over_backward() {
        let mut camera = controller();
        let flags = MovementFlags {
            forward: true,
            backward: true,
            ..Default::default()
        };
        let t0 = Instant::now();
        camera.tick(t0, flags);
        camera.tick(t0 + Duration::from_secs(1), flags);
        assert!(camera.eye()[2] < 5.0);
    }

    #[test]
    fn movement_is_horizontal_only() {
        // a basis pitched straight down: forward = -backward = (0, -1, 0)
        let orientation = Matrix::new(vec![
            Vector::from([1.0, 0.0, 0.0]),
            Vector::from([0.0, 0.0, -1.0]),
            Vector::from([0.0, 1.0, 0.0]),
        ])
        .unwrap();
        let mut camera = CameraController::builder()
            .viewport_width(1000)
            .viewport_height(500)
            .orientation(orientation)
            .build();
        let t0 = Instant::now();

        // forward projects to zero: no movement at all
        let flags = MovementFlags {
            forward: true,
            ..Default::default()
        };
        camera.tick(t0, flags);
        camera.tick(t0 + Duration::from_secs(1), flags);
        assert!(approx_vec(camera.eye(), &Vector::from([0.0, 0.0, 5.0]), 1e-6));

        // strafing along the right axis still works
        let flags = MovementFlags {
            right: true,
            ..Default::default()
        };
        camera.tick(t0 + Duration::from_secs(2), flags);
        assert!(camera.eye()[0] > 0.0);
        assert!(camera.eye()[1].abs() < 1e-6);
    }

    #[test]
    fn frame_inputs_reflect_the_camera_state() {
        let camera = controller();
        let inputs = camera.frame_inputs();
        assert!(inputs.resolution == [1000.0, 500.0]);
        assert!(inputs.resolution_inv == [1.0 / 1000.0, 1.0 / 500.0]);
        // FOV 90 degrees: tan(45 degrees) == 1
        assert!((inputs.height_ratio - 1.0 / 500.0).abs() < 1e-9);
        assert!(inputs.eye == [0.0, 0.0, 5.0]);
        assert!(
            inputs.view_rot == [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );
    }
}
