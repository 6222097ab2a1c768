use crate::{
    gfx::{
        camera::camera_utils::CameraManager, rendering::post_process::PostProcessSettings,
    },
    wgpu_utils::binding_builder::BindGroupLayoutWithDesc,
};

use super::{lighting::Lighting, object::Object};

/// Main scene containing objects, lights and camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<Object>,
    pub lighting: Lighting,
    /// Clear colour in sRGB
    pub background: [f32; 3],
    pub post_process: PostProcessSettings,
}

impl Scene {
    /// Creates an empty scene with a black background and no lights
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            lighting: Lighting::default(),
            background: [0.0; 3],
            post_process: PostProcessSettings::default(),
        }
    }

    /// Updates the scene (camera controls and matrices)
    pub fn update(&mut self) {
        self.camera_manager.update();
    }

    /// Adds an object, renaming it if the name is taken, and returns its index
    pub fn add_object(&mut self, mut object: Object) -> usize {
        object.name = self.ensure_unique_name(&object.name);
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn object(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|object| object.name == name)
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut Object> {
        self.objects.iter_mut().find(|object| object.name == name)
    }

    /// Gets immutable reference to an object by index
    pub fn get_object(&self, index: usize) -> Option<&Object> {
        self.objects.get(index)
    }

    /// Gets mutable reference to an object by index
    pub fn get_object_mut(&mut self, index: usize) -> Option<&mut Object> {
        self.objects.get_mut(index)
    }

    /// Creates missing GPU resources and syncs every object's uniforms
    ///
    /// Called by the render engine once per frame before drawing.
    pub fn prepare_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        object_layout: &BindGroupLayoutWithDesc,
    ) {
        for object in &mut self.objects {
            object.prepare_gpu_resources(device, queue, object_layout);
        }
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let visible = self.objects.iter().filter(|object| object.visible);

        SceneStatistics {
            object_count: self.objects.len(),
            visible_count: visible.clone().count(),
            total_triangles: visible
                .clone()
                .map(|object| object.mesh.index_count() / 3)
                .sum(),
            total_vertices: visible
                .map(|object| object.mesh.vertex_count() as u32)
                .sum(),
        }
    }

    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.iter().any(|obj| obj.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub visible_count: usize,
    pub total_triangles: u32,
    pub total_vertices: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::OrbitCamera,
        geometry::generate_box,
        scene::object::Shading,
    };
    use cgmath::{Vector3, Zero};

    fn scene() -> Scene {
        let camera = OrbitCamera::looking_at(Vector3::new(0.0, 0.0, 25.0), Vector3::zero(), 1.0);
        Scene::new(CameraManager::fixed(camera))
    }

    #[test]
    fn test_duplicate_names_are_suffixed() {
        let mut scene = scene();
        let geometry = generate_box(1.0, 1.0, 1.0);
        scene.add_object(Object::new("cell", &geometry, Shading::Cell));
        let second = scene.add_object(Object::new("cell", &geometry, Shading::Cell));

        assert_eq!(scene.objects[second].name, "cell (1)");
        assert!(scene.object("cell (1)").is_some());
    }

    #[test]
    fn test_statistics_count_visible_objects() {
        let mut scene = scene();
        let geometry = generate_box(1.0, 1.0, 1.0);
        scene.add_object(Object::new("a", &geometry, Shading::Cell));
        scene.add_object(Object::new("b", &geometry, Shading::Lines).with_visibility(false));

        let stats = scene.get_statistics();
        assert_eq!(stats.object_count, 2);
        assert_eq!(stats.visible_count, 1);
        assert_eq!(stats.total_triangles, 12);
        assert_eq!(stats.total_vertices, 24);
    }
}
