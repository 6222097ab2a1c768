//! # Graphics Module
//!
//! Everything between a [`Scene`] and the pixels on screen.
//!
//! - **Camera** ([`camera`]) - Orbit camera, damped mouse controls and
//!   field-of-view preservation on resize
//! - **Geometry** ([`geometry`]) - Procedural box, icosphere and line segment
//! - **Rendering** ([`rendering`]) - Pipelines, shader composition, bloom and
//!   tone mapping
//! - **Resources** ([`resources`]) - Global uniforms and render targets
//! - **Scene** ([`scene`]) - Objects, lights and the camera of one demo
//!
//! [`Scene`]: scene::Scene

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
