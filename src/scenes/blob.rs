//! # Blob
//!
//! A noise-displaced icosphere with a cycling colour palette. Displacement
//! and colour run on the GPU in the composed `blob` shader; the CPU side
//! only advances time and forwards GUI changes.

use cgmath::{Deg, Matrix4, Vector3};
use imgui::Ui;

use crate::{
    gfx::{
        camera::{CameraManager, OrbitCamera},
        geometry::generate_icosphere,
        scene::{lighting::hex_to_srgb, Lighting, Object, Scene, Shading},
    },
    scenes::Demo,
    ui::params::{ParamChanged, ParamPanel, ParamValue},
};

const RADIUS: f32 = 5.0;
const DETAIL: u32 = 10;
const BACKGROUND: u32 = 0xF0F0EE;

/// Shader inputs of the blob material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobUniforms {
    pub time: f32,
    /// Displacement scale along the normal
    pub amplitude: f32,
    /// Spatial frequency of the noise
    pub frequency: f32,
    /// How fast the noise field scrolls with time
    pub speed: f32,
}

impl Default for BlobUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            amplitude: 0.8,
            frequency: 0.125,
            speed: 0.5,
        }
    }
}

impl BlobUniforms {
    /// Advances time only; the noise settings stay as the GUI left them
    pub fn update(&mut self, delta: f32) {
        self.time += delta;
    }

    /// Packs into the per-object parameter slot read by the blob shader
    pub fn to_params(self) -> [f32; 4] {
        [self.time, self.amplitude, self.frequency, self.speed]
    }
}

/// Parameters exposed in the blob panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobParam {
    ScaleX,
    ScaleY,
    ScaleZ,
    Wireframe,
    Amplitude,
    Frequency,
    Speed,
    AmbientIntensity,
    PointIntensity,
    PointX,
    PointY,
    PointZ,
    DirectionalIntensity,
    DirectionalX,
    DirectionalY,
    DirectionalZ,
}

pub struct BlobDemo {
    pub uniforms: BlobUniforms,
    scale: [f32; 3],
    panel: ParamPanel<BlobParam>,
    object: Option<usize>,
}

impl BlobDemo {
    pub fn new() -> Self {
        let uniforms = BlobUniforms::default();
        let panel = build_panel(&uniforms, &default_lighting());
        Self {
            uniforms,
            scale: [1.0; 3],
            panel,
            object: None,
        }
    }

    pub fn scale(&self) -> [f32; 3] {
        self.scale
    }

    /// Applies a parameter change to the blob or the lights
    pub fn apply(&mut self, change: ParamChanged<BlobParam>, scene: &mut Scene) {
        let ParamChanged { key, value } = change;

        match (key, value) {
            (BlobParam::Wireframe, ParamValue::Bool(wireframe)) => {
                if let Some(object) = self.object.and_then(|i| scene.get_object_mut(i)) {
                    object.shading = if wireframe {
                        Shading::BlobWireframe
                    } else {
                        Shading::Blob
                    };
                }
            }
            (key, ParamValue::Float(v)) => {
                let lighting = &mut scene.lighting;
                match key {
                    BlobParam::ScaleX => self.scale[0] = v,
                    BlobParam::ScaleY => self.scale[1] = v,
                    BlobParam::ScaleZ => self.scale[2] = v,
                    BlobParam::Amplitude => self.uniforms.amplitude = v,
                    BlobParam::Frequency => self.uniforms.frequency = v,
                    BlobParam::Speed => self.uniforms.speed = v,
                    BlobParam::AmbientIntensity => lighting.ambient.intensity = v,
                    BlobParam::PointIntensity => lighting.point.intensity = v,
                    BlobParam::PointX => lighting.point.position[0] = v,
                    BlobParam::PointY => lighting.point.position[1] = v,
                    BlobParam::PointZ => lighting.point.position[2] = v,
                    BlobParam::DirectionalIntensity => lighting.directional.intensity = v,
                    BlobParam::DirectionalX => lighting.directional.position[0] = v,
                    BlobParam::DirectionalY => lighting.directional.position[1] = v,
                    BlobParam::DirectionalZ => lighting.directional.position[2] = v,
                    BlobParam::Wireframe => {}
                }
            }
            (key, value) => log::warn!("Ignoring {:?} = {:?}", key, value),
        }

        self.sync(scene);
    }

    fn sync(&self, scene: &mut Scene) {
        let Some(object) = self.object.and_then(|i| scene.get_object_mut(i)) else {
            return;
        };
        let [x, y, z] = self.scale;
        object.transform = Matrix4::from_nonuniform_scale(x, y, z);
        object.params = self.uniforms.to_params();
    }
}

impl Default for BlobDemo {
    fn default() -> Self {
        Self::new()
    }
}

fn default_lighting() -> Lighting {
    Lighting::white(0.5, 0.2, [0.0, 5.0, 10.0], 0.5, [0.0, 0.0, 1.0])
}

impl Demo for BlobDemo {
    fn name(&self) -> &str {
        "Blob"
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
        scene.lighting = default_lighting();

        let geometry = generate_icosphere(RADIUS, DETAIL);
        log::info!(
            "Blob icosphere: {} triangles",
            geometry.triangle_count()
        );
        self.object = Some(scene.add_object(Object::new("blob", &geometry, Shading::Blob)));
        self.sync(scene);
    }

    fn update(&mut self, delta: f32, scene: &mut Scene) {
        self.uniforms.update(delta);
        self.sync(scene);
    }

    fn render_ui(&mut self, ui: &Ui, scene: &mut Scene) {
        for change in self.panel.render(ui) {
            self.apply(change, scene);
        }
    }
}

fn build_panel(uniforms: &BlobUniforms, lighting: &Lighting) -> ParamPanel<BlobParam> {
    let mut panel = ParamPanel::new("Controls");

    for (key, label) in [
        (BlobParam::ScaleX, "X"),
        (BlobParam::ScaleY, "Y"),
        (BlobParam::ScaleZ, "Z"),
    ] {
        panel.slider(key, "Geometry/Scale", label, 0.0, 2.0, 0.1, 1.0);
    }
    panel.toggle(BlobParam::Wireframe, "Geometry/Material", "Wireframe", false);
    panel
        .slider(BlobParam::Amplitude, "Geometry/Noise", "Amplitude", 0.0, 1.0, 0.01, uniforms.amplitude)
        .slider(BlobParam::Frequency, "Geometry/Noise", "Frequency", 0.0, 1.0, 0.01, uniforms.frequency)
        .slider(BlobParam::Speed, "Geometry/Noise", "Speed", 0.0, 1.0, 0.01, uniforms.speed);

    panel
        .slider(
            BlobParam::AmbientIntensity,
            "Lighting/Ambient",
            "Intensity",
            0.0,
            1.0,
            0.01,
            lighting.ambient.intensity,
        )
        .slider(
            BlobParam::PointIntensity,
            "Lighting/Point",
            "Intensity",
            0.0,
            1.0,
            0.01,
            lighting.point.intensity,
        );
    let point = lighting.point.position;
    for (key, label, initial) in [
        (BlobParam::PointX, "X", point[0]),
        (BlobParam::PointY, "Y", point[1]),
        (BlobParam::PointZ, "Z", point[2]),
    ] {
        panel.slider(key, "Lighting/Point", label, -1.0, 1.0, 0.1, initial);
    }

    panel.slider(
        BlobParam::DirectionalIntensity,
        "Lighting/Directional",
        "Intensity",
        0.0,
        1.0,
        0.01,
        lighting.directional.intensity,
    );
    let directional = lighting.directional.position;
    for (key, label, initial) in [
        (BlobParam::DirectionalX, "X", directional[0]),
        (BlobParam::DirectionalY, "Y", directional[1]),
        (BlobParam::DirectionalZ, "Z", directional[2]),
    ] {
        panel.slider(key, "Lighting/Directional", label, -1.0, 1.0, 0.1, initial);
    }

    panel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (BlobDemo, Scene) {
        let mut demo = BlobDemo::new();
        let mut scene = Scene::new(demo.camera(1.0));
        demo.initialize(&mut scene);
        (demo, scene)
    }

    #[test]
    fn test_update_advances_only_time() {
        let mut uniforms = BlobUniforms::default();
        uniforms.update(0.25);
        uniforms.update(0.25);
        assert_eq!(
            uniforms,
            BlobUniforms {
                time: 0.5,
                ..BlobUniforms::default()
            }
        );
    }

    #[test]
    fn test_initialize() {
        let (_demo, scene) = setup();
        let blob = scene.object("blob").unwrap();
        assert_eq!(blob.mesh.index_count(), 2420 * 3);
        assert_eq!(blob.params, [0.0, 0.8, 0.125, 0.5]);
        assert_eq!(scene.lighting.point.position, [0.0, 5.0, 10.0]);
        assert!(!scene.camera_manager.controls_enabled);
    }

    #[test]
    fn test_wireframe_toggle_switches_shading() {
        let (mut demo, mut scene) = setup();
        let change = demo.panel.set(BlobParam::Wireframe, ParamValue::Bool(true)).unwrap();
        demo.apply(change, &mut scene);
        assert_eq!(scene.object("blob").unwrap().shading, Shading::BlobWireframe);
    }

    #[test]
    fn test_scale_and_light_changes() {
        let (mut demo, mut scene) = setup();
        for (key, value) in [
            (BlobParam::ScaleY, 1.76),
            (BlobParam::PointX, -3.0),
            (BlobParam::Amplitude, 0.333),
        ] {
            let change = demo.panel.set(key, ParamValue::Float(value)).unwrap();
            demo.apply(change, &mut scene);
        }

        assert!((demo.scale()[1] - 1.8).abs() < 1e-5);
        assert_eq!(scene.lighting.point.position[0], -1.0);
        assert!((demo.uniforms.amplitude - 0.33).abs() < 1e-5);

        let blob = scene.object("blob").unwrap();
        assert!((blob.transform.y.y - 1.8).abs() < 1e-5);
        assert!((blob.params[1] - 0.33).abs() < 1e-5);
    }
}
