//! Core data types for ReliefForge.
//!
//! This crate provides the foundational types for turning per-pixel depth
//! estimates into triangle meshes:
//!
//! - [`DepthGrid`] - A dense H×W grid of per-pixel depth values
//! - [`ImageGrid`] - The decoded image paired with a depth grid (dimensions + RGB)
//! - [`Vertex`] - A point in 3D space with optional attributes
//! - [`ReliefMesh`] - A triangle mesh with indexed vertices
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Layer 0 Crate
//!
//! This crate has no service or transport dependencies. It can be used in:
//! - CLI tools
//! - Servers
//! - Web applications (WASM)
//! - Python bindings
//!
//! # Coordinate System
//!
//! Meshes built from depth grids live in a normalized viewer space:
//! - X: image columns, centered on the grid midpoint
//! - Y: height (the normalized depth value)
//! - Z: image rows, negated so the first row is farthest in +Z
//!
//! The face winding produced by grid triangulation is fixed; downstream
//! viewers consume the resulting normal direction as-is.
//!
//! # Example
//!
//! ```
//! use relief_types::{DepthGrid, ReliefMesh, Vertex, Point3};
//!
//! let grid = DepthGrid::from_values(2, 2, vec![0.0, 1.0, 0.5, 0.8]).unwrap();
//! assert_eq!(grid.height(), 2);
//!
//! let mut mesh = ReliefMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.5, 1.0, 0.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::cast_precision_loss)] // Grid dimensions fit f32 vertex space by design

mod bounds;
mod grid;
mod mesh;
mod vertex;

pub use bounds::Aabb;
pub use grid::{DepthGrid, ImageGrid};
pub use mesh::ReliefMesh;
pub use vertex::{Vertex, VertexAttributes, VertexColor};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
