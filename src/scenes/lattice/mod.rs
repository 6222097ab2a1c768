//! # Lattice Cube
//!
//! A 3×3×3 lattice of shader-coloured cells that turns single faces, turns
//! as a whole, or explodes outwards and implodes back.
//!
//! - [`face`] - the six faces and their normals
//! - [`cell`] - one lattice element and its snapping rules
//! - [`cube`] - the lattice and its animation state machine
//! - [`demo`] - wiring into a [`Scene`](crate::gfx::scene::Scene) with a GUI

pub mod cell;
pub mod cube;
pub mod demo;
pub mod face;

pub use cell::{Cell, CellUniforms};
pub use cube::{Cube, CubeSettings, CubeState};
pub use demo::{LatticeDemo, LatticeParam};
pub use face::{Axis, Face};
