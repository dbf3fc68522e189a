//! Mesh cleanup for raw grid-triangulated meshes.
//!
//! This crate provides the cleanup pass that turns a raw triangulated
//! mesh into one safe for export:
//!
//! - Duplicate face removal (rotation-equal index triplets)
//! - Degenerate face removal (repeated or invalid indices, non-finite or
//!   collinear vertex positions)
//! - Unreferenced vertex removal with order-preserving index compaction
//! - Mesh validation reporting
//!
//! Cleanup never fails; it may produce an empty mesh, which the caller
//! interprets (the pipeline treats it as an error condition).
//!
//! # Example
//!
//! ```
//! use relief_cleanup::{cleanup_mesh, CleanupParams};
//! use relief_types::{ReliefMesh, Vertex};
//!
//! let mut mesh = ReliefMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//! mesh.faces.push([1, 2, 0]); // rotation of the first face
//!
//! let summary = cleanup_mesh(&mut mesh, &CleanupParams::default());
//! assert_eq!(summary.duplicates_removed, 1);
//! assert_eq!(mesh.face_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]

mod cleanup;
mod validate;

pub use cleanup::{
    cleanup_mesh, remove_degenerate_faces, remove_duplicate_faces, remove_unreferenced_vertices,
    CleanupParams, CleanupSummary,
};
pub use validate::{validate_mesh, validate_mesh_with_params, MeshReport};
