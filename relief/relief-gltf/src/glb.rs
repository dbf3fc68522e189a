//! GLB (binary glTF 2.0) container encoding.
//!
//! # Container Layout
//!
//! ```text
//! UINT32      – Magic "glTF" (0x46546C67)
//! UINT32      – Version (2)
//! UINT32      – Total container length
//! chunk 0
//!     UINT32  – Chunk length
//!     UINT32  – Chunk type "JSON" (0x4E4F534A)
//!     ...     – JSON document, space-padded to 4 bytes
//! chunk 1
//!     UINT32  – Chunk length
//!     UINT32  – Chunk type "BIN\0" (0x004E4942)
//!     ...     – Binary buffer, zero-padded to 4 bytes
//! ```
//!
//! The binary buffer holds, in order: vertex positions (f32 VEC3), vertex
//! normals (f32 VEC3, when every vertex has one), vertex colors (u8
//! normalized VEC4, when every vertex has one), and triangle indices (u32
//! SCALAR). Colors are VEC4 with alpha 255: vertex-attribute buffer views
//! require 4-byte element strides, which a tightly packed u8 VEC3 cannot
//! satisfy.

use relief_types::ReliefMesh;

use crate::document::{
    Accessor, Asset, Attributes, Buffer, BufferView, Document, Mesh, Node, Primitive, Scene,
};
use crate::error::{EncodeError, EncodeResult};

/// GLB header magic, "glTF" in ASCII.
const GLB_MAGIC: u32 = 0x4654_6C67;

/// Container format version.
const GLB_VERSION: u32 = 2;

/// JSON chunk type, "JSON" in ASCII.
const CHUNK_JSON: u32 = 0x4E4F_534A;

/// Binary chunk type, "BIN" in ASCII with a trailing NUL.
const CHUNK_BIN: u32 = 0x004E_4942;

/// glTF component types.
const COMPONENT_U8: u32 = 5121;
const COMPONENT_U32: u32 = 5125;
const COMPONENT_F32: u32 = 5126;

/// glTF buffer view targets.
const TARGET_ARRAY_BUFFER: u32 = 34962;
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// glTF primitive mode for triangle lists.
const MODE_TRIANGLES: u32 = 4;

/// Media type of the encoded artifact, as declared to transports.
pub const GLB_MEDIA_TYPE: &str = "model/gltf-binary";

/// A self-contained binary 3D-scene artifact.
///
/// The buffer embeds vertex and index data; there are no external file
/// references. Hand the bytes and [`GlbArtifact::media_type`] to whatever
/// transport serves the model.
#[derive(Debug, Clone)]
pub struct GlbArtifact {
    bytes: Vec<u8>,
}

impl GlbArtifact {
    /// The encoded container bytes.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the artifact, returning the container bytes.
    #[inline]
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Container size in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the container is empty (never true for encoded artifacts).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The declared media type, `model/gltf-binary`.
    #[inline]
    #[must_use]
    pub const fn media_type(&self) -> &'static str {
        GLB_MEDIA_TYPE
    }
}

/// Encode a cleaned mesh as a GLB container.
///
/// # Errors
///
/// Returns an error if:
/// - the mesh is empty ([`EncodeError::EmptyMesh`]; the pipeline pre-empts
///   this with its own empty-mesh handling)
/// - the vertex count exceeds the u32 index range
/// - a face references a vertex out of range
/// - the assembled container exceeds the u32 length field
///
/// # Example
///
/// ```
/// use relief_gltf::encode_glb;
/// use relief_types::{ReliefMesh, Vertex};
///
/// let mut mesh = ReliefMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// let artifact = encode_glb(&mesh).unwrap();
/// assert_eq!(&artifact.bytes()[0..4], b"glTF");
/// ```
#[allow(clippy::cast_possible_truncation)]
// Truncation: chunk and total lengths are bounded by the u32 container check
pub fn encode_glb(mesh: &ReliefMesh) -> EncodeResult<GlbArtifact> {
    if mesh.is_empty() {
        return Err(EncodeError::EmptyMesh);
    }

    let vertex_count = mesh.vertices.len();
    if u32::try_from(vertex_count).is_err() {
        return Err(EncodeError::IndexOverflow {
            count: vertex_count,
        });
    }

    for face in &mesh.faces {
        for &index in face {
            if (index as usize) >= vertex_count {
                return Err(EncodeError::FaceIndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }
    }

    let with_normals = mesh.has_normals();
    let with_colors = mesh.has_colors();

    // Assemble the binary buffer: positions, normals, colors, indices.
    // Every section is a multiple of 4 bytes, so offsets stay aligned.
    let position_len = vertex_count * 12;
    let normal_len = if with_normals { vertex_count * 12 } else { 0 };
    let color_len = if with_colors { vertex_count * 4 } else { 0 };
    let index_len = mesh.faces.len() * 12;
    let mut bin = Vec::with_capacity(position_len + normal_len + color_len + index_len);

    for vertex in &mesh.vertices {
        bin.extend_from_slice(&vertex.position.x.to_le_bytes());
        bin.extend_from_slice(&vertex.position.y.to_le_bytes());
        bin.extend_from_slice(&vertex.position.z.to_le_bytes());
    }

    let normal_offset = bin.len();
    if with_normals {
        for vertex in &mesh.vertices {
            let normal = vertex.attributes.normal.unwrap_or_default();
            bin.extend_from_slice(&normal.x.to_le_bytes());
            bin.extend_from_slice(&normal.y.to_le_bytes());
            bin.extend_from_slice(&normal.z.to_le_bytes());
        }
    }

    let color_offset = bin.len();
    if with_colors {
        for vertex in &mesh.vertices {
            let color = vertex.attributes.color.unwrap_or_default();
            bin.extend_from_slice(&[color.r, color.g, color.b, u8::MAX]);
        }
    }

    let index_offset = bin.len();
    for face in &mesh.faces {
        for &index in face {
            bin.extend_from_slice(&index.to_le_bytes());
        }
    }

    let bounds = mesh.bounds();

    let mut buffer_views = vec![BufferView {
        buffer: 0,
        byte_offset: 0,
        byte_length: position_len,
        target: TARGET_ARRAY_BUFFER,
    }];
    let mut accessors = vec![Accessor {
        buffer_view: 0,
        component_type: COMPONENT_F32,
        count: vertex_count,
        accessor_type: "VEC3",
        normalized: false,
        min: Some(bounds.min_array()),
        max: Some(bounds.max_array()),
    }];
    let mut attributes = Attributes {
        position: 0,
        normal: None,
        color0: None,
    };

    if with_normals {
        buffer_views.push(BufferView {
            buffer: 0,
            byte_offset: normal_offset,
            byte_length: normal_len,
            target: TARGET_ARRAY_BUFFER,
        });
        accessors.push(Accessor {
            buffer_view: buffer_views.len() - 1,
            component_type: COMPONENT_F32,
            count: vertex_count,
            accessor_type: "VEC3",
            normalized: false,
            min: None,
            max: None,
        });
        attributes.normal = Some(accessors.len() - 1);
    }

    if with_colors {
        buffer_views.push(BufferView {
            buffer: 0,
            byte_offset: color_offset,
            byte_length: color_len,
            target: TARGET_ARRAY_BUFFER,
        });
        accessors.push(Accessor {
            buffer_view: buffer_views.len() - 1,
            component_type: COMPONENT_U8,
            count: vertex_count,
            accessor_type: "VEC4",
            normalized: true,
            min: None,
            max: None,
        });
        attributes.color0 = Some(accessors.len() - 1);
    }

    buffer_views.push(BufferView {
        buffer: 0,
        byte_offset: index_offset,
        byte_length: index_len,
        target: TARGET_ELEMENT_ARRAY_BUFFER,
    });
    accessors.push(Accessor {
        buffer_view: buffer_views.len() - 1,
        component_type: COMPONENT_U32,
        count: mesh.faces.len() * 3,
        accessor_type: "SCALAR",
        normalized: false,
        min: None,
        max: None,
    });
    let indices_accessor = accessors.len() - 1;

    let document = Document {
        asset: Asset {
            version: "2.0",
            generator: "ReliefForge relief-gltf",
        },
        scene: 0,
        scenes: vec![Scene { nodes: vec![0] }],
        nodes: vec![Node { mesh: 0 }],
        meshes: vec![Mesh {
            primitives: vec![Primitive {
                attributes,
                indices: indices_accessor,
                mode: MODE_TRIANGLES,
            }],
        }],
        accessors,
        buffer_views,
        buffers: vec![Buffer {
            byte_length: bin.len(),
        }],
    };

    let mut json = serde_json::to_vec(&document)?;

    // Chunk payloads are padded to 4-byte boundaries: JSON with spaces,
    // binary with zeros.
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json.len() as u64 + 8 + bin.len() as u64;
    let Ok(total_u32) = u32::try_from(total) else {
        return Err(EncodeError::OversizedBuffer { size: total });
    };

    let mut bytes = Vec::with_capacity(total as usize);
    bytes.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    bytes.extend_from_slice(&GLB_VERSION.to_le_bytes());
    bytes.extend_from_slice(&total_u32.to_le_bytes());
    bytes.extend_from_slice(&(json.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    bytes.extend_from_slice(&json);
    bytes.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    bytes.extend_from_slice(&bin);

    Ok(GlbArtifact { bytes })
}
