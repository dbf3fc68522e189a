//! Error types for GLB encoding.

use thiserror::Error;

/// Result type for GLB encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors that can occur while encoding a mesh as GLB.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The mesh has no vertices or no faces; there is nothing to encode.
    #[error("cannot encode an empty mesh")]
    EmptyMesh,

    /// The vertex count does not fit the u32 index width.
    #[error("vertex count {count} exceeds the u32 index range")]
    IndexOverflow {
        /// Number of vertices in the mesh.
        count: usize,
    },

    /// A face references a vertex outside the vertex array.
    #[error("face index {index} out of range ({vertex_count} vertices)")]
    FaceIndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// The assembled container exceeds the u32 length field of the GLB
    /// header.
    #[error("GLB size {size} exceeds the u32 container limit")]
    OversizedBuffer {
        /// Total container size in bytes.
        size: u64,
    },

    /// JSON chunk serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
