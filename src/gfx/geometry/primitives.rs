//! # Primitive Shape Generation
//!
//! This module contains functions to generate the 3D primitives used by the
//! demo scenes. All shapes are generated with normals and texture coordinates.

use super::GeometryData;
use cgmath::{InnerSpace, Vector2, Vector3};
use std::f32::consts::PI;

/// Generate an axis-aligned box centered at the origin
///
/// Each side is a single quad with its own four vertices, UVs running from
/// 0 to 1 across the side, and outward normals. Sides are emitted in the
/// order +x, -x, +y, -y, +z, -z.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    // (u axis, v axis, w axis, u dir, v dir, extent u, extent v, signed extent w)
    let sides: [(usize, usize, usize, f32, f32, f32, f32, f32); 6] = [
        (2, 1, 0, -1.0, -1.0, depth, height, width),
        (2, 1, 0, 1.0, -1.0, depth, height, -width),
        (0, 2, 1, 1.0, 1.0, width, depth, height),
        (0, 2, 1, 1.0, -1.0, width, depth, -height),
        (0, 1, 2, 1.0, -1.0, width, height, depth),
        (0, 1, 2, -1.0, -1.0, width, height, -depth),
    ];

    for (u, v, w, udir, vdir, extent_u, extent_v, extent_w) in sides {
        let base = data.vertices.len() as u32;

        for iy in 0..2 {
            let y = iy as f32 * extent_v - extent_v / 2.0;
            for ix in 0..2 {
                let x = ix as f32 * extent_u - extent_u / 2.0;

                let mut position = [0.0; 3];
                position[u] = x * udir;
                position[v] = y * vdir;
                position[w] = extent_w / 2.0;
                data.vertices.push(position);

                let mut normal = [0.0; 3];
                normal[w] = if extent_w > 0.0 { 1.0 } else { -1.0 };
                data.normals.push(normal);

                data.tex_coords.push([ix as f32, 1.0 - iy as f32]);
            }
        }

        let a = base;
        let b = base + 2;
        let c = base + 3;
        let d = base + 1;
        data.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    data
}

/// Generate a subdivided icosahedron projected onto a sphere
///
/// Each of the 20 faces is split into `(detail + 1)^2` triangles, so detail
/// 10 yields 2420 triangles. Triangles do not share vertices, which keeps
/// the UV seam clean; normals point radially outward.
pub fn generate_icosphere(radius: f32, detail: u32) -> GeometryData {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    #[rustfmt::skip]
    let corners = [
        Vector3::new(-1.0, t, 0.0), Vector3::new(1.0, t, 0.0),
        Vector3::new(-1.0, -t, 0.0), Vector3::new(1.0, -t, 0.0),
        Vector3::new(0.0, -1.0, t), Vector3::new(0.0, 1.0, t),
        Vector3::new(0.0, -1.0, -t), Vector3::new(0.0, 1.0, -t),
        Vector3::new(t, 0.0, -1.0), Vector3::new(t, 0.0, 1.0),
        Vector3::new(-t, 0.0, -1.0), Vector3::new(-t, 0.0, 1.0),
    ];

    #[rustfmt::skip]
    let faces: [[usize; 3]; 20] = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    let mut positions = Vec::new();
    for [a, b, c] in faces {
        subdivide_face(corners[a], corners[b], corners[c], detail, &mut positions);
    }

    let positions: Vec<Vector3<f32>> = positions
        .into_iter()
        .map(|p| p.normalize() * radius)
        .collect();

    let mut uvs: Vec<Vector2<f32>> = positions
        .iter()
        .map(|p| {
            Vector2::new(
                azimuth(*p) / (2.0 * PI) + 0.5,
                inclination(*p) / PI + 0.5,
            )
        })
        .collect();

    correct_pole_uvs(&positions, &mut uvs);
    correct_seam(&mut uvs);

    let mut data = GeometryData::new();
    for (p, uv) in positions.iter().zip(uvs.iter()) {
        let n = p.normalize();
        data.vertices.push([p.x, p.y, p.z]);
        data.normals.push([n.x, n.y, n.z]);
        data.tex_coords.push([uv.x, uv.y]);
    }
    data.indices = (0..data.vertices.len() as u32).collect();

    data
}

/// Generate a single line segment from `from` to `to`
///
/// Carries no triangles; pair it with a line index list `[0, 1]`.
pub fn generate_segment(from: [f32; 3], to: [f32; 3]) -> GeometryData {
    let mut data = GeometryData::new();
    data.vertices = vec![from, to];
    data.normals = vec![[0.0, 1.0, 0.0]; 2];
    data.tex_coords = vec![[0.0, 0.0], [1.0, 0.0]];
    data
}

fn subdivide_face(
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
    detail: u32,
    out: &mut Vec<Vector3<f32>>,
) {
    let cols = detail as usize + 1;
    let mut grid: Vec<Vec<Vector3<f32>>> = Vec::with_capacity(cols + 1);

    for i in 0..=cols {
        let f = i as f32 / cols as f32;
        let aj = a + (c - a) * f;
        let bj = b + (c - b) * f;
        let rows = cols - i;

        let row = (0..=rows)
            .map(|j| {
                if rows == 0 {
                    aj
                } else {
                    aj + (bj - aj) * (j as f32 / rows as f32)
                }
            })
            .collect();
        grid.push(row);
    }

    for i in 0..cols {
        for j in 0..(2 * (cols - i) - 1) {
            let k = j / 2;
            if j % 2 == 0 {
                out.push(grid[i][k + 1]);
                out.push(grid[i + 1][k]);
                out.push(grid[i][k]);
            } else {
                out.push(grid[i][k + 1]);
                out.push(grid[i + 1][k + 1]);
                out.push(grid[i + 1][k]);
            }
        }
    }
}

fn azimuth(p: Vector3<f32>) -> f32 {
    p.z.atan2(-p.x)
}

fn inclination(p: Vector3<f32>) -> f32 {
    (-p.y).atan2((p.x * p.x + p.z * p.z).sqrt())
}

/// Vertices sitting on a pole take the azimuth of their triangle's centroid.
fn correct_pole_uvs(positions: &[Vector3<f32>], uvs: &mut [Vector2<f32>]) {
    for (triangle, tri_uvs) in positions.chunks_exact(3).zip(uvs.chunks_exact_mut(3)) {
        let centroid = (triangle[0] + triangle[1] + triangle[2]) / 3.0;
        let u = azimuth(centroid) / (2.0 * PI) + 0.5;

        for (p, uv) in triangle.iter().zip(tri_uvs.iter_mut()) {
            if p.x.abs() < 1e-6 && p.z.abs() < 1e-6 {
                uv.x = u;
            }
        }
    }
}

/// Triangles straddling the u = 0/1 seam get their small u values wrapped.
fn correct_seam(uvs: &mut [Vector2<f32>]) {
    for tri in uvs.chunks_exact_mut(3) {
        let max = tri[0].x.max(tri[1].x).max(tri[2].x);
        let min = tri[0].x.min(tri[1].x).min(tri[2].x);

        if max > 0.9 && min < 0.1 {
            for uv in tri.iter_mut() {
                if uv.x < 0.2 {
                    uv.x += 1.0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(data: &GeometryData, tri: usize) -> Vector3<f32> {
        let p = |i: usize| {
            let v = data.vertices[data.indices[tri * 3 + i] as usize];
            Vector3::new(v[0], v[1], v[2])
        };
        (p(1) - p(0)).cross(p(2) - p(0))
    }

    #[test]
    fn test_box_counts() {
        let data = generate_box(5.0, 5.0, 5.0);
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.triangle_count(), 12);
        assert_eq!(data.wireframe_indices().len(), 60);
    }

    #[test]
    fn test_box_extent_and_outward_winding() {
        let data = generate_box(2.0, 4.0, 6.0);
        for v in &data.vertices {
            assert_eq!(v[0].abs(), 1.0);
            assert_eq!(v[1].abs(), 2.0);
            assert_eq!(v[2].abs(), 3.0);
        }

        for tri in 0..data.triangle_count() {
            let n = face_normal(&data, tri);
            let stored = data.normals[data.indices[tri * 3] as usize];
            let stored = Vector3::new(stored[0], stored[1], stored[2]);
            assert!(n.dot(stored) > 0.0, "triangle {tri} is wound inward");
        }
    }

    #[test]
    fn test_box_uvs_span_each_side() {
        let data = generate_box(1.0, 1.0, 1.0);
        for side in data.tex_coords.chunks_exact(4) {
            assert_eq!(side, &[[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]]);
        }
    }

    #[test]
    fn test_icosphere_counts() {
        let data = generate_icosphere(5.0, 10);
        assert_eq!(data.triangle_count(), 2420);
        assert_eq!(data.vertex_count(), 7260);

        let base = generate_icosphere(1.0, 0);
        assert_eq!(base.triangle_count(), 20);
    }

    #[test]
    fn test_icosphere_lies_on_radius_and_faces_out() {
        let data = generate_icosphere(5.0, 2);
        for v in &data.vertices {
            let r = Vector3::new(v[0], v[1], v[2]).magnitude();
            assert!((r - 5.0).abs() < 1e-4);
        }

        for tri in 0..data.triangle_count() {
            let v = data.vertices[data.indices[tri * 3] as usize];
            let outward = Vector3::new(v[0], v[1], v[2]);
            assert!(face_normal(&data, tri).dot(outward) > 0.0);
        }
    }

    #[test]
    fn test_icosphere_uvs_in_range() {
        let data = generate_icosphere(1.0, 3);
        for uv in &data.tex_coords {
            assert!(uv[0] >= 0.0 && uv[0] <= 1.2, "u = {}", uv[0]);
            assert!(uv[1] >= 0.0 && uv[1] <= 1.0, "v = {}", uv[1]);
        }
    }
}
