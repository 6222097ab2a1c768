use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use super::orbit_camera::OrbitCamera;

/// Mouse orbit controls with optional damping.
///
/// Drag input accumulates into a pending rotation that `update` feeds into
/// the camera. With damping on, each update applies `damping_factor` of
/// what is pending and keeps the rest, so the orbit eases out.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_pan: bool,
    pending_yaw: f32,
    pending_pitch: f32,
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            enable_damping: false,
            damping_factor: 0.05,
            enable_pan: true,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    pub fn with_damping(mut self, damping_factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = damping_factor;
        self
    }

    pub fn without_pan(mut self) -> Self {
        self.enable_pan = false;
        self
    }

    pub fn process_events(
        &mut self,
        event: &DeviceEvent,
        window: &Window,
        camera: &mut OrbitCamera,
    ) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                camera.add_distance(scroll_amount * self.zoom_speed);
                window.request_redraw();
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    if self.is_shift_held && self.enable_pan {
                        camera.pan((
                            -delta.0 as f32 * self.pan_speed,
                            delta.1 as f32 * self.pan_speed,
                        ));
                    } else {
                        self.rotate(-delta.0 as f32, delta.1 as f32);
                    }
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
                state,
                ..
            } => {
                self.is_shift_held = *state == ElementState::Pressed;
            }
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::KeyC),
                state: ElementState::Pressed,
                ..
            } => {
                if self.is_shift_held {
                    log::info!("Resetting camera to its initial pose");
                    self.pending_yaw = 0.0;
                    self.pending_pitch = 0.0;
                    camera.reset_to_default();
                }
            }
            _ => (),
        }
    }

    /// Queues a rotation from a pointer delta in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.pending_yaw += dx * self.rotate_speed;
        self.pending_pitch += dy * self.rotate_speed;
    }

    /// Applies pending rotation to the camera, once per frame.
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        if self.pending_yaw != 0.0 {
            camera.add_yaw(self.pending_yaw * factor);
        }
        if self.pending_pitch != 0.0 {
            camera.add_pitch(self.pending_pitch * factor);
        }

        if self.enable_damping {
            self.pending_yaw *= 1.0 - factor;
            self.pending_pitch *= 1.0 - factor;
        } else {
            self.pending_yaw = 0.0;
            self.pending_pitch = 0.0;
        }
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.enable_pan && self.is_mouse_pressed && self.is_shift_held
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    fn camera() -> OrbitCamera {
        OrbitCamera::looking_at(Vector3::new(0.0, 0.0, 25.0), Vector3::zero(), 1.0)
    }

    #[test]
    fn test_undamped_rotation_applies_at_once() {
        let mut controller = CameraController::new(0.01, 0.1);
        let mut camera = camera();
        controller.rotate(10.0, 0.0);
        controller.update(&mut camera);
        assert!((camera.yaw - 0.1).abs() < 1e-6);

        controller.update(&mut camera);
        assert!((camera.yaw - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_damped_rotation_eases_toward_target() {
        let mut controller = CameraController::new(0.01, 0.1).with_damping(0.05);
        let mut camera = camera();
        controller.rotate(10.0, 0.0);

        controller.update(&mut camera);
        let first = camera.yaw;
        assert!((first - 0.005).abs() < 1e-6);

        for _ in 0..500 {
            controller.update(&mut camera);
        }
        assert!((camera.yaw - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_pan_can_be_disabled() {
        let controller = CameraController::new(0.01, 0.1).without_pan();
        assert!(!controller.is_panning());
        assert!(!controller.enable_pan);
    }
}
