use cgmath::{Deg, Matrix4, Rad, SquareMatrix};
use winit::{
    event::{DeviceEvent, KeyEvent},
    window::Window,
};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};

pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
    /// Whether pointer input reaches the controller
    pub controls_enabled: bool,
    fov_preserver: Option<FovPreserver>,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self {
            camera,
            controller,
            controls_enabled: true,
            fov_preserver: None,
        }
    }

    /// A camera the user cannot move.
    pub fn fixed(camera: OrbitCamera) -> Self {
        Self {
            controls_enabled: false,
            ..Self::new(camera, CameraController::new(0.0, 0.0))
        }
    }

    pub fn process_event(&mut self, event: &DeviceEvent, window: &Window) {
        if self.controls_enabled {
            self.controller
                .process_events(event, window, &mut self.camera);
        }
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if self.controls_enabled {
            self.controller
                .process_keyed_events(event, &mut self.camera);
        }
    }

    /// Advances damped controls and refreshes the camera uniform.
    pub fn update(&mut self) {
        if self.controls_enabled {
            self.controller.update(&mut self.camera);
        }
        self.camera.update_view_proj();
    }

    /// Adapts aspect and vertical field of view to a new surface size.
    ///
    /// The first call records the reference height; later calls keep the
    /// visible world height proportional to the window height.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let fovy = self.camera.fovy;
        let preserver = *self
            .fov_preserver
            .get_or_insert_with(|| FovPreserver::new(fovy, height));

        self.camera.fovy = preserver.fov_for_height(height).into();
        self.camera.resize_projection(width, height);
    }
}

/// Keeps `tan(fov / 2)` proportional to the window height.
#[derive(Debug, Clone, Copy)]
pub struct FovPreserver {
    tan_half_fov: f32,
    reference_height: f32,
}

impl FovPreserver {
    pub fn new(fovy: impl Into<Rad<f32>>, reference_height: u32) -> Self {
        let fovy: Rad<f32> = fovy.into();
        Self {
            tan_half_fov: (fovy.0 / 2.0).tan(),
            reference_height: reference_height.max(1) as f32,
        }
    }

    /// `fov = 360 / pi * atan(tan(fov0 / 2) * h / h0)`, in degrees
    pub fn fov_for_height(&self, height: u32) -> Deg<f32> {
        let ratio = height as f32 / self.reference_height;
        Deg((360.0 / std::f32::consts::PI) * (self.tan_half_fov * ratio).atan())
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    /// Creates a default [CameraUniform].
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    fn manager() -> CameraManager {
        let camera = OrbitCamera::looking_at(Vector3::new(0.0, 0.0, 25.0), Vector3::zero(), 1.0)
            .with_fovy(Deg(45.0));
        CameraManager::fixed(camera)
    }

    #[test]
    fn test_width_change_keeps_vertical_fov() {
        let mut manager = manager();
        manager.resize(800, 600);
        let before = Deg::from(manager.camera.fovy).0;
        manager.resize(1600, 600);
        let after = Deg::from(manager.camera.fovy).0;

        assert!((before - 45.0).abs() < 1e-4);
        assert!((after - before).abs() < 1e-4);
        assert!((manager.camera.aspect - 1600.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_taller_window_widens_fov() {
        let preserver = FovPreserver::new(Deg(45.0), 600);
        let taller = preserver.fov_for_height(1200).0;
        let expected = (360.0 / std::f32::consts::PI) * ((22.5_f32).to_radians().tan() * 2.0).atan();
        assert!((taller - expected).abs() < 1e-4);
        assert!(taller > 45.0);
    }

    #[test]
    fn test_zero_size_is_ignored() {
        let mut manager = manager();
        manager.resize(800, 600);
        manager.resize(0, 0);
        assert!((manager.camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }
}
