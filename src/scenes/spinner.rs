//! # Spinning Cube
//!
//! A white wireframe box tumbling about all three axes.

use cgmath::{Deg, Matrix4, Rad, SquareMatrix, Vector3};

use crate::{
    gfx::{
        camera::{CameraManager, OrbitCamera},
        geometry::generate_box,
        scene::{lighting::hex_to_srgb, Object, Scene, Shading},
    },
    scenes::Demo,
};

const SIZE: f32 = 5.0;
const BACKGROUND: u32 = 0x050505;
/// Radians per second about each axis
const SPIN_RATE: f32 = 1.0;

pub struct SpinnerDemo {
    orientation: Matrix4<f32>,
    object: Option<usize>,
}

impl SpinnerDemo {
    pub fn new() -> Self {
        Self {
            orientation: Matrix4::identity(),
            object: None,
        }
    }

    pub fn orientation(&self) -> Matrix4<f32> {
        self.orientation
    }

    /// Rotates about X, then Y, then Z, on top of the current orientation
    pub fn spin(&mut self, delta: f32) {
        let angle = Rad(SPIN_RATE * delta);
        self.orientation = Matrix4::from_angle_z(angle)
            * Matrix4::from_angle_y(angle)
            * Matrix4::from_angle_x(angle)
            * self.orientation;
    }
}

impl Default for SpinnerDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for SpinnerDemo {
    fn name(&self) -> &str {
        "Spinning Cube"
    }

    fn camera(&self, aspect: f32) -> CameraManager {
        let camera = OrbitCamera::looking_at(
            Vector3::new(0.0, 0.0, 25.0),
            Vector3::new(0.0, 0.0, 0.0),
            aspect,
        )
        .with_fovy(Deg(45.0))
        .with_clip_planes(0.1, 10000.0);
        CameraManager::fixed(camera)
    }

    fn initialize(&mut self, scene: &mut Scene) {
        scene.background = hex_to_srgb(BACKGROUND);
        let geometry = generate_box(SIZE, SIZE, SIZE);
        let cube = Object::new("cube", &geometry, Shading::Lines).with_color([1.0; 3]);
        self.object = Some(scene.add_object(cube));
    }

    fn update(&mut self, delta: f32, scene: &mut Scene) {
        self.spin(delta);
        if let Some(object) = self.object.and_then(|i| scene.get_object_mut(i)) {
            object.transform = self.orientation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};

    #[test]
    fn test_spin_order() {
        let mut demo = SpinnerDemo::new();
        demo.spin(0.5);

        let angle = Rad(0.5);
        let expected = Matrix4::from_angle_z(angle)
            * Matrix4::from_angle_y(angle)
            * Matrix4::from_angle_x(angle);
        let diff = demo.orientation() - expected;
        for column in [diff.x, diff.y, diff.z, diff.w] {
            assert!(column.magnitude() < 1e-6);
        }
    }

    #[test]
    fn test_zero_delta_keeps_orientation() {
        let mut demo = SpinnerDemo::new();
        demo.spin(0.3);
        let before = demo.orientation();
        demo.spin(0.0);
        assert_eq!(demo.orientation(), before);
    }

    #[test]
    fn test_update_spins_the_object() {
        let mut demo = SpinnerDemo::new();
        let mut scene = Scene::new(demo.camera(1.0));
        demo.initialize(&mut scene);
        demo.update(0.1, &mut scene);

        let cube = scene.object("cube").unwrap();
        assert_eq!(cube.shading, Shading::Lines);
        assert_eq!(cube.mesh.line_index_count(), 60);
        assert_eq!(cube.transform, demo.orientation());
        assert_ne!(cube.transform * Vector4::unit_x(), Vector4::unit_x());
    }
}
