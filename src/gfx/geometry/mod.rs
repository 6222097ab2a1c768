//! # Procedural Geometry Generation
//!
//! Generates the meshes the demo scenes draw, so no model files are needed.
//!
//! ## Supported Primitives
//!
//! - **Box**: axis-aligned box with one quad per side, UVs spanning each side
//! - **Icosphere**: subdivided icosahedron with spherical UVs
//!
//! Both follow the same face winding (counter-clockwise seen from outside)
//! and can be turned into a line list with [`GeometryData::wireframe_indices`].
//!
//! ## Usage
//!
//! ```rust
//! use cubist::gfx::geometry::{generate_box, generate_icosphere};
//!
//! let cell = generate_box(1.0, 1.0, 1.0);
//! assert_eq!(cell.triangle_count(), 12);
//!
//! let blob = generate_icosphere(5.0, 10);
//! assert_eq!(blob.triangle_count(), 2420);
//! ```

pub mod primitives;

pub use primitives::*;

use std::collections::HashSet;

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves the attribute streams into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }

    /// Line-list indices covering every triangle edge once
    ///
    /// Edges shared by two triangles through the same vertex indices are
    /// emitted a single time; diagonals of quads are kept.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut lines = Vec::new();

        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    lines.push(a);
                    lines.push(b);
                }
            }
        }

        lines
    }
}
