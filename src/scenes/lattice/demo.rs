//! The lattice cube as a runnable demo.

use std::f32::consts::PI;

use cgmath::{Deg, Vector3};
use imgui::Ui;
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    gfx::{
        camera::{CameraController, CameraManager, OrbitCamera},
        geometry::{generate_box, generate_segment},
        rendering::post_process::{PostProcessSettings, ToneMapping},
        scene::{Object, Scene, Shading},
    },
    scenes::Demo,
    ui::params::{ParamChanged, ParamPanel, ParamValue},
};

use super::cube::Cube;

const CELL_SIZE: f32 = 2.0;
const AXES_LENGTH: f32 = 20.0;
const CAMERA_POSITION: [f32; 3] = [25.0, 15.0, 25.0];

/// Parameters exposed in the lattice panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatticeParam {
    AutoTransform,
    TurnSpeed,
    TurnFace,
    TurnCube,
    Explode,
    BloomEnabled,
    BloomStrength,
    BloomRadius,
    BloomThreshold,
    ToneMapping,
    Exposure,
    ShowAxes,
}

pub struct LatticeDemo {
    cube: Cube,
    rng: StdRng,
    panel: ParamPanel<LatticeParam>,
    /// Scene index of each cell's object, in cell order
    cell_objects: Vec<usize>,
    axis_objects: Vec<usize>,
}

impl LatticeDemo {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// A demo whose random transformations replay for the same seed
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let cube = Cube::new(Vector3::new(0.0, 0.0, 0.0), CELL_SIZE);
        let panel = build_panel(&cube);
        Self {
            cube,
            rng,
            panel,
            cell_objects: Vec::new(),
            axis_objects: Vec::new(),
        }
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    /// Applies a parameter change to the cube, the scene or the renderer settings
    pub fn apply(&mut self, change: ParamChanged<LatticeParam>, scene: &mut Scene) {
        let ParamChanged { key, value } = change;

        match (key, value) {
            (LatticeParam::AutoTransform, ParamValue::Bool(enabled)) => {
                self.cube.auto_transform = enabled;
            }
            (LatticeParam::TurnSpeed, ParamValue::Float(speed)) => {
                self.cube.settings.speed = speed;
            }
            (LatticeParam::TurnFace, ParamValue::Pressed) => {
                self.cube.request_turn_face(&mut self.rng);
            }
            (LatticeParam::TurnCube, ParamValue::Pressed) => {
                self.cube.request_turn_cube(&mut self.rng);
            }
            (LatticeParam::Explode, ParamValue::Pressed) => {
                self.cube.request_explode();
            }
            (LatticeParam::BloomEnabled, ParamValue::Bool(enabled)) => {
                scene.post_process.bloom.enabled = enabled;
            }
            (LatticeParam::BloomStrength, ParamValue::Float(strength)) => {
                scene.post_process.bloom.strength = strength;
            }
            (LatticeParam::BloomRadius, ParamValue::Float(radius)) => {
                scene.post_process.bloom.radius = radius;
            }
            (LatticeParam::BloomThreshold, ParamValue::Float(threshold)) => {
                scene.post_process.bloom.threshold = threshold;
            }
            (LatticeParam::ToneMapping, ParamValue::Index(index)) => {
                if let Some(tone_mapping) = ToneMapping::from_index(index) {
                    scene.post_process.tone_mapping = tone_mapping;
                }
            }
            (LatticeParam::Exposure, ParamValue::Float(exposure)) => {
                scene.post_process.exposure = exposure;
            }
            (LatticeParam::ShowAxes, ParamValue::Bool(visible)) => {
                for &index in &self.axis_objects {
                    if let Some(axis) = scene.get_object_mut(index) {
                        axis.visible = visible;
                    }
                }
            }
            (key, value) => log::warn!("Ignoring {:?} = {:?}", key, value),
        }
    }

    /// Copies cell transforms and shader uniforms onto their scene objects
    fn sync_cells(&self, scene: &mut Scene) {
        for (cell, &index) in self.cube.cells().iter().zip(&self.cell_objects) {
            if let Some(object) = scene.get_object_mut(index) {
                object.transform = cell.model_matrix();
                object.params = cell.uniforms.to_params();
            }
        }
    }
}

impl Default for LatticeDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for LatticeDemo {
    fn name(&self) -> &str {
        "Lattice Cube"
    }

    fn camera(&self, aspect: f32) -> CameraManager {
        let position = Vector3::from(CAMERA_POSITION);
        let mut camera = OrbitCamera::looking_at(position, Vector3::new(0.0, 0.0, 0.0), aspect)
            .with_fovy(Deg(45.0))
            .with_clip_planes(0.1, 10000.0);

        camera.bounds.min_distance = Some(camera.distance);
        camera.bounds.max_distance = Some(50.0);
        camera.bounds = camera.bounds.with_polar_range(PI * 0.25, PI * 0.75);

        let controller = CameraController::new(0.005, 0.5)
            .with_damping(0.05)
            .without_pan();
        CameraManager::new(camera, controller)
    }

    fn initialize(&mut self, scene: &mut Scene) {
        scene.background = [0.0; 3];
        scene.post_process.tone_mapping = ToneMapping::AcesFilmic;
        scene.post_process.exposure = 1.0;

        let cell_geometry = generate_box(CELL_SIZE, CELL_SIZE, CELL_SIZE);
        self.cell_objects = (0..self.cube.cells().len())
            .map(|i| scene.add_object(Object::new(format!("cell_{i}"), &cell_geometry, Shading::Cell)))
            .collect();

        let axes = [
            ("axis_x", [AXES_LENGTH, 0.0, 0.0], [1.0, 0.0, 0.0]),
            ("axis_y", [0.0, AXES_LENGTH, 0.0], [0.0, 1.0, 0.0]),
            ("axis_z", [0.0, 0.0, AXES_LENGTH], [0.0, 0.0, 1.0]),
        ];
        self.axis_objects = axes
            .into_iter()
            .map(|(name, end, color)| {
                let segment = generate_segment([0.0; 3], end);
                scene.add_object(
                    Object::new(name, &segment, Shading::Lines)
                        .with_color(color)
                        .with_visibility(false),
                )
            })
            .collect();

        self.sync_cells(scene);
        log::info!("Lattice cube ready with {} cells", self.cell_objects.len());
    }

    fn update(&mut self, delta: f32, scene: &mut Scene) {
        self.cube.update(delta, &mut self.rng);
        self.sync_cells(scene);
    }

    fn render_ui(&mut self, ui: &Ui, scene: &mut Scene) {
        for change in self.panel.render(ui) {
            self.apply(change, scene);
        }
    }
}

fn build_panel(cube: &Cube) -> ParamPanel<LatticeParam> {
    let post = PostProcessSettings::default();
    let tone_index = ToneMapping::ALL
        .iter()
        .position(|&t| t == ToneMapping::AcesFilmic)
        .unwrap_or(0);

    let mut panel = ParamPanel::new("Controls");
    panel
        .toggle(
            LatticeParam::AutoTransform,
            "Cube/Transform",
            "Auto Transform",
            cube.auto_transform,
        )
        .slider(
            LatticeParam::TurnSpeed,
            "Cube/Transform",
            "Turn Speed",
            10.0,
            500.0,
            10.0,
            cube.settings.speed,
        )
        .button(LatticeParam::TurnFace, "Cube/Transform", "Turn Face")
        .button(LatticeParam::TurnCube, "Cube/Transform", "Turn Cube")
        .button(LatticeParam::Explode, "Cube/Transform", "Explode")
        .toggle(
            LatticeParam::BloomEnabled,
            "Post Processing/Bloom",
            "Enable/Disable",
            post.bloom.enabled,
        )
        .slider(
            LatticeParam::BloomStrength,
            "Post Processing/Bloom",
            "Strength",
            0.0,
            3.0,
            0.01,
            post.bloom.strength,
        )
        .slider(
            LatticeParam::BloomRadius,
            "Post Processing/Bloom",
            "Radius",
            0.0,
            1.0,
            0.01,
            post.bloom.radius,
        )
        .slider(
            LatticeParam::BloomThreshold,
            "Post Processing/Bloom",
            "Threshold",
            0.05,
            1.0,
            0.01,
            post.bloom.threshold,
        )
        .choice(
            LatticeParam::ToneMapping,
            "Post Processing/Tone Mapping",
            "Type",
            ToneMapping::ALL.iter().map(|t| t.label()).collect(),
            tone_index,
        )
        .slider(
            LatticeParam::Exposure,
            "Post Processing/Tone Mapping",
            "Exposure",
            0.0,
            2.0,
            0.01,
            1.0,
        )
        .toggle(LatticeParam::ShowAxes, "Debug", "Show Axes", false);
    panel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::lattice::{cube::CENTRE_CELL, CubeState};

    fn setup() -> (LatticeDemo, Scene) {
        let mut demo = LatticeDemo::with_seed(7);
        let mut scene = Scene::new(demo.camera(1.5));
        demo.initialize(&mut scene);
        (demo, scene)
    }

    fn press(demo: &mut LatticeDemo, scene: &mut Scene, key: LatticeParam, value: ParamValue) {
        let change = demo.panel.set(key, value).expect("known parameter");
        demo.apply(change, scene);
    }

    #[test]
    fn test_initialize_builds_cells_and_hidden_axes() {
        let (_demo, scene) = setup();
        let stats = scene.get_statistics();
        assert_eq!(stats.object_count, 30);
        assert_eq!(stats.visible_count, 27);

        let centre = scene.object(&format!("cell_{CENTRE_CELL}")).unwrap();
        assert_eq!(centre.params[1], 1.0);
        assert_eq!(scene.object("cell_0").unwrap().params[1], 0.0);
        assert_eq!(scene.post_process.tone_mapping, ToneMapping::AcesFilmic);
    }

    #[test]
    fn test_camera_limits() {
        let demo = LatticeDemo::with_seed(1);
        let manager = demo.camera(1.0);
        let camera = &manager.camera;
        let distance = (25.0f32 * 25.0 + 15.0 * 15.0 + 25.0 * 25.0).sqrt();
        assert!((camera.distance - distance).abs() < 1e-4);
        assert_eq!(camera.bounds.min_distance, Some(camera.distance));
        assert_eq!(camera.bounds.max_distance, Some(50.0));
        assert!(!manager.controller.enable_pan);
        assert!(manager.controller.enable_damping);
    }

    #[test]
    fn test_panel_changes_reach_scene() {
        let (mut demo, mut scene) = setup();

        press(&mut demo, &mut scene, LatticeParam::ShowAxes, ParamValue::Bool(true));
        assert_eq!(scene.get_statistics().visible_count, 30);

        press(&mut demo, &mut scene, LatticeParam::BloomEnabled, ParamValue::Bool(true));
        press(&mut demo, &mut scene, LatticeParam::BloomStrength, ParamValue::Float(5.0));
        assert!(scene.post_process.bloom.enabled);
        assert_eq!(scene.post_process.bloom.strength, 3.0);

        press(&mut demo, &mut scene, LatticeParam::ToneMapping, ParamValue::Index(2));
        assert_eq!(scene.post_process.tone_mapping, ToneMapping::Reinhard);

        press(&mut demo, &mut scene, LatticeParam::TurnSpeed, ParamValue::Float(333.0));
        assert_eq!(demo.cube().settings.speed, 330.0);
    }

    #[test]
    fn test_manual_triggers_only_start_from_idle() {
        let (mut demo, mut scene) = setup();

        press(&mut demo, &mut scene, LatticeParam::Explode, ParamValue::Pressed);
        assert_eq!(demo.cube().state(), CubeState::Exploding);

        press(&mut demo, &mut scene, LatticeParam::TurnFace, ParamValue::Pressed);
        assert_eq!(demo.cube().state(), CubeState::Exploding);
    }

    #[test]
    fn test_update_moves_objects_with_cells() {
        let (mut demo, mut scene) = setup();
        press(&mut demo, &mut scene, LatticeParam::Explode, ParamValue::Pressed);

        let before = scene.object("cell_0").unwrap().transform;
        demo.update(0.1, &mut scene);
        let after = scene.object("cell_0").unwrap().transform;

        assert_ne!(before.w, after.w);
        assert_eq!(after, demo.cube().cells()[0].model_matrix());
        assert!((scene.object("cell_0").unwrap().params[0] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_cells_tile_without_overlap() {
        let (demo, scene) = setup();
        let cell = scene.object("cell_0").unwrap();
        let half = CELL_SIZE / 2.0;

        let world = |corner: [f32; 3]| {
            cell.transform * cgmath::Vector4::new(corner[0], corner[1], corner[2], 1.0)
        };
        let low = world([-half; 3]);
        let high = world([half; 3]);

        // Cell 0 sits at (-2,-2,-2) and spans one cell size per axis
        assert_eq!(demo.cube().cells()[0].position(), Vector3::new(-2.0, -2.0, -2.0));
        for axis in 0..3 {
            assert!((low[axis] + 3.0).abs() < 1e-5);
            assert!((high[axis] + 1.0).abs() < 1e-5);
        }
    }
}
