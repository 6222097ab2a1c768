//! # Scene Management Module
//!
//! Objects, lights and the camera that make up one demo scene.
//!
//! ## Key Components
//!
//! - [`Scene`] - Container owning the camera manager, objects, lights and
//!   post-processing settings
//! - [`Object`] - A mesh with its transform, shading kind and uniform inputs
//! - [`Lighting`] - Ambient, point and directional light
//! - [`Vertex3D`] - Vertex layout with position, normal and texture coordinates
//!
//! ## Usage
//!
//! ```no_run
//! use cubist::gfx::geometry::generate_box;
//! use cubist::gfx::scene::{Object, Scene, Shading};
//!
//! fn add_cell(scene: &mut Scene) {
//!     let cell = Object::new("cell", &generate_box(2.0, 2.0, 2.0), Shading::Cell);
//!     scene.add_object(cell);
//! }
//! ```

pub mod lighting;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use lighting::Lighting;
pub use object::{DrawObject, Object, Shading};
pub use scene::Scene;
pub use vertex::Vertex3D;
