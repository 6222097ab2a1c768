use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective camera orbiting a target point, y-up.
///
/// `pitch` is the elevation above the xz-plane and `yaw` the angle around
/// the y axis measured from +z, both in radians.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
    home: (f32, f32, f32, Vector3<f32>),
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Will be auto-calculted in `update()` nevertheless.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad::from(Deg(45.0)),
            znear: 0.1,
            zfar: 10000.0,
            uniform: CameraUniform::default(),
            home: (distance, pitch, yaw, target),
        };
        camera.update();
        camera
    }

    /// Places the camera at `position`, looking at `target`.
    pub fn looking_at(position: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let offset = position - target;
        let distance = offset.magnitude();
        let pitch = if distance > 0.0 {
            (offset.y / distance).clamp(-1.0, 1.0).asin()
        } else {
            0.0
        };
        let yaw = offset.x.atan2(offset.z);
        Self::new(distance, pitch, yaw, target, aspect)
    }

    pub fn with_fovy(mut self, fovy: Deg<f32>) -> Self {
        self.fovy = fovy.into();
        self
    }

    pub fn with_clip_planes(mut self, znear: f32, zfar: f32) -> Self {
        self.znear = znear;
        self.zfar = zfar;
        self
    }

    /// Returns to the pose the camera was created with.
    pub fn reset_to_default(&mut self) {
        let (distance, pitch, yaw, target) = self.home;
        self.distance = distance;
        self.pitch = pitch;
        self.yaw = yaw;
        self.target = target;

        self.update(); // Recalculate eye position
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.0 + f32::EPSILON)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale pan movement by distance for consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;

        let total_movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.eye += total_movement;
        self.target += total_movement;
    }

    /// Updates the camera after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl OrbitCameraBounds {
    /// Pitch limits from a polar-angle range measured down from +y.
    pub fn with_polar_range(mut self, min_polar: f32, max_polar: f32) -> Self {
        self.min_pitch = std::f32::consts::FRAC_PI_2 - max_polar;
        self.max_pitch = std::f32::consts::FRAC_PI_2 - min_polar;
        self
    }
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: None,
            min_pitch: -std::f32::consts::PI / 2.0 + f32::EPSILON,
            max_pitch: std::f32::consts::PI / 2.0 - f32::EPSILON,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_looking_at_reproduces_position() {
        let camera = OrbitCamera::looking_at(Vector3::new(25.0, 15.0, 25.0), Vector3::zero(), 1.0);
        assert!((camera.eye - Vector3::new(25.0, 15.0, 25.0)).magnitude() < 1e-3);
        assert!((camera.distance - 1475.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_polar_range_limits_pitch() {
        let mut camera = OrbitCamera::looking_at(Vector3::new(0.0, 0.0, 25.0), Vector3::zero(), 1.0);
        camera.bounds = camera.bounds.with_polar_range(FRAC_PI_4, 3.0 * FRAC_PI_4);

        camera.add_pitch(2.0);
        assert!((camera.pitch - FRAC_PI_4).abs() < 1e-6);
        camera.add_pitch(-4.0);
        assert!((camera.pitch + FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_distance_bounds() {
        let mut camera = OrbitCamera::looking_at(Vector3::new(0.0, 0.0, 30.0), Vector3::zero(), 1.0);
        camera.bounds.min_distance = Some(30.0);
        camera.bounds.max_distance = Some(50.0);

        camera.set_distance(10.0);
        assert_eq!(camera.distance, 30.0);
        camera.set_distance(80.0);
        assert_eq!(camera.distance, 50.0);
    }

    #[test]
    fn test_reset_returns_home() {
        let mut camera = OrbitCamera::looking_at(Vector3::new(0.0, 5.0, 20.0), Vector3::zero(), 1.0);
        let home = camera.eye;
        camera.add_yaw(1.0);
        camera.add_pitch(0.3);
        camera.reset_to_default();
        assert!((camera.eye - home).magnitude() < 1e-4);
    }
}
