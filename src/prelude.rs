//! # Cubist Prelude
//!
//! Commonly used types for writing a demo.
//!
//! ```no_run
//! use cubist::prelude::*;
//!
//! struct Empty;
//!
//! impl Demo for Empty {
//!     fn name(&self) -> &str { "Empty" }
//!     fn camera(&self, aspect: f32) -> CameraManager {
//!         CameraManager::fixed(OrbitCamera::looking_at(
//!             Vector3::new(0.0, 0.0, 10.0),
//!             Vector3::new(0.0, 0.0, 0.0),
//!             aspect,
//!         ))
//!     }
//!     fn initialize(&mut self, _scene: &mut Scene) {}
//!     fn update(&mut self, _delta: f32, _scene: &mut Scene) {}
//! }
//!
//! fn main() -> Result<(), AppError> {
//!     cubist::run_demo("Empty", Empty)
//! }
//! ```

// Re-export core application types
pub use crate::app::CubistApp;
pub use crate::clock::FrameClock;
pub use crate::config::AppConfig;
pub use crate::error::{AppError, RenderError};
pub use crate::run_demo;

// Re-export graphics and scene types
pub use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
pub use crate::gfx::geometry::{generate_box, generate_icosphere, generate_segment, GeometryData};
pub use crate::gfx::rendering::{BloomSettings, PostProcessSettings, ToneMapping};
pub use crate::gfx::scene::{Lighting, Object, Scene, Shading};

// Re-export demos and their parameter panels
pub use crate::scenes::{BlobDemo, Demo, LatticeDemo, SpinnerDemo};
pub use crate::ui::{ParamChanged, ParamPanel, ParamValue};

// Re-export performance monitoring
pub use crate::performance::{PerformanceMetrics, PerformanceMonitor};

// Re-export common external dependencies
pub use cgmath::{Deg, Matrix4, Vector3};
pub use imgui::Ui;
