//! Binary glTF (GLB) export for relief meshes.
//!
//! This crate serializes a cleaned [`ReliefMesh`](relief_types::ReliefMesh)
//! into a single self-contained GLB container:
//!
//! - glTF 2.0 JSON chunk describing one mesh, one primitive, one scene
//! - Binary chunk embedding positions, optional normals and colors, and
//!   u32 triangle indices
//! - No external file references
//!
//! The artifact is suitable for direct consumption by 3D viewers and
//! engines, served with the `model/gltf-binary` media type.
//!
//! # Example
//!
//! ```
//! use relief_gltf::{encode_glb, GLB_MEDIA_TYPE};
//! use relief_types::{ReliefMesh, Vertex};
//!
//! let mut mesh = ReliefMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! let artifact = encode_glb(&mesh).unwrap();
//! assert_eq!(artifact.media_type(), GLB_MEDIA_TYPE);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod document;
mod error;
mod glb;

pub use error::{EncodeError, EncodeResult};
pub use glb::{encode_glb, GlbArtifact, GLB_MEDIA_TYPE};
