//! The demo scenes and the trait the application drives them through

pub mod blob;
pub mod lattice;
pub mod spinner;

use imgui::Ui;

use crate::gfx::{camera::CameraManager, scene::Scene};

pub use blob::BlobDemo;
pub use lattice::LatticeDemo;
pub use spinner::SpinnerDemo;

/// A self-contained demo scene
///
/// The application asks the demo for its camera, builds the scene around
/// it, then calls [`Demo::update`] and [`Demo::render_ui`] once per frame.
pub trait Demo {
    /// Window title and log name
    fn name(&self) -> &str;

    /// Builds the camera for a surface with the given aspect ratio
    fn camera(&self, aspect: f32) -> CameraManager;

    /// Called once after the scene is created.
    ///
    /// # Arguments
    /// * `scene` - Scene to add objects to and configure lights and post-processing on
    fn initialize(&mut self, scene: &mut Scene);

    /// Advances the demo by `delta` seconds
    ///
    /// `delta` is zero while the window is unfocused.
    fn update(&mut self, delta: f32, scene: &mut Scene);

    /// Draws the demo's parameter panel and applies any changes
    fn render_ui(&mut self, _ui: &Ui, _scene: &mut Scene) {}
}
