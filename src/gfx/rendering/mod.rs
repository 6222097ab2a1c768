// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, shader composition, post-processing and frame
//! rendering.

pub mod pipeline_manager;
pub mod post_process;
pub mod render_engine;
pub mod shader_composer;
pub mod shaders;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineError, PipelineManager};
pub use post_process::{BloomSettings, PostProcessSettings, ToneMapping};
pub use render_engine::RenderEngine;
pub use shader_composer::{InsertionPoint, ShaderComposer, ShaderError, ShaderTemplate};
