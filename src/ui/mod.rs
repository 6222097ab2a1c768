//! # User Interface Module
//!
//! Dear ImGui overlay for the demos: the [`UiManager`] owns the ImGui
//! context and its winit/wgpu glue, and [`params`] provides the folder-based
//! debug panels each demo declares its tunables in.
//!
//! ## Input Handling
//!
//! While ImGui wants the pointer or keyboard, camera controls do not see
//! the input.

pub mod manager;
pub mod params;

// Re-export main types
pub use manager::UiManager;
pub use params::{ParamChanged, ParamKind, ParamPanel, ParamSpec, ParamValue};
