// src/lib.rs
//! Cubist
//!
//! Small interactive 3D demo scenes on wgpu, winit and Dear ImGui: a
//! face-turning lattice cube, a noise-displaced blob and a spinning
//! wireframe cube.

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod gfx;
pub mod performance;
pub mod prelude;
pub mod scenes;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::CubistApp;
pub use config::AppConfig;
pub use error::{AppError, RenderError};

/// Runs `demo` in a window configured from `title` and the environment
pub fn run_demo<D: scenes::Demo + 'static>(title: &str, demo: D) -> Result<(), AppError> {
    let mut app = CubistApp::new(AppConfig::new(title).with_env())?;
    app.attach_demo(demo);
    app.run()
}
