//! Core cleanup operations.

use hashbrown::{HashMap, HashSet};
use relief_types::{Point3, ReliefMesh, Vertex};
use tracing::debug;

/// Configuration parameters for mesh cleanup.
///
/// # Example
///
/// ```
/// use relief_cleanup::CleanupParams;
///
/// let params = CleanupParams::default().with_area_epsilon(1e-10);
/// assert_eq!(params.area_epsilon, 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct CleanupParams {
    /// Minimum triangle area; faces below this are degenerate.
    ///
    /// Areas are computed in f64: sliver triangles from near-collinear
    /// f32 vertices cancel badly in single precision.
    /// Default: `1e-12`
    pub area_epsilon: f64,
}

impl Default for CleanupParams {
    fn default() -> Self {
        Self {
            area_epsilon: 1e-12,
        }
    }
}

impl CleanupParams {
    /// Set the minimum triangle area threshold.
    #[must_use]
    pub const fn with_area_epsilon(mut self, epsilon: f64) -> Self {
        self.area_epsilon = epsilon;
        self
    }
}

/// Remove faces whose index triplet matches an already-kept face under
/// rotation.
///
/// Rotations of a triplet describe the same face with the same winding;
/// reflections reverse the winding and are *kept* as distinct faces.
///
/// Returns the number of faces removed.
///
/// # Example
///
/// ```
/// use relief_cleanup::remove_duplicate_faces;
/// use relief_types::{ReliefMesh, Vertex};
///
/// let mut mesh = ReliefMesh::new();
/// for _ in 0..3 {
///     mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// }
/// mesh.faces.push([0, 1, 2]);
/// mesh.faces.push([2, 0, 1]); // same rotation class
/// mesh.faces.push([0, 2, 1]); // reflected: distinct
///
/// assert_eq!(remove_duplicate_faces(&mut mesh), 1);
/// assert_eq!(mesh.face_count(), 2);
/// ```
pub fn remove_duplicate_faces(mesh: &mut ReliefMesh) -> usize {
    let original_count = mesh.faces.len();

    let mut seen: HashSet<[u32; 3]> = HashSet::with_capacity(original_count);
    mesh.faces.retain(|&face| seen.insert(rotate_to_min(face)));

    original_count - mesh.faces.len()
}

/// Rotate a face triplet so the smallest vertex index comes first,
/// preserving cyclic order.
pub(crate) fn rotate_to_min(face: [u32; 3]) -> [u32; 3] {
    let min_idx = if face[0] <= face[1] && face[0] <= face[2] {
        0
    } else if face[1] <= face[2] {
        1
    } else {
        2
    };

    [
        face[min_idx],
        face[(min_idx + 1) % 3],
        face[(min_idx + 2) % 3],
    ]
}

/// Remove degenerate faces.
///
/// A face is degenerate when any of:
///
/// - two or more of its indices are equal
/// - an index is out of range for the vertex array
/// - a referenced vertex position is not finite
/// - its area is below `area_epsilon` (collinear or coincident vertices)
///
/// Returns the number of faces removed.
pub fn remove_degenerate_faces(mesh: &mut ReliefMesh, area_epsilon: f64) -> usize {
    let original_count = mesh.faces.len();

    let vertices = &mesh.vertices;
    mesh.faces
        .retain(|&face| !face_is_degenerate(vertices, face, area_epsilon));

    original_count - mesh.faces.len()
}

/// Degeneracy check shared with validation: repeated indices,
/// out-of-range indices, non-finite positions, or area below epsilon.
pub(crate) fn face_is_degenerate(vertices: &[Vertex], face: [u32; 3], area_epsilon: f64) -> bool {
    let [i0, i1, i2] = face;
    if i0 == i1 || i1 == i2 || i0 == i2 {
        return true;
    }
    let vertex_count = vertices.len();
    if (i0 as usize) >= vertex_count || (i1 as usize) >= vertex_count || (i2 as usize) >= vertex_count
    {
        return true;
    }

    let v0 = &vertices[i0 as usize].position;
    let v1 = &vertices[i1 as usize].position;
    let v2 = &vertices[i2 as usize].position;
    if !(position_is_finite(v0) && position_is_finite(v1) && position_is_finite(v2)) {
        return true;
    }

    triangle_area(
        [f64::from(v0.x), f64::from(v0.y), f64::from(v0.z)],
        [f64::from(v1.x), f64::from(v1.y), f64::from(v1.z)],
        [f64::from(v2.x), f64::from(v2.y), f64::from(v2.z)],
    ) < area_epsilon
}

fn position_is_finite(p: &Point3<f32>) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

/// Triangle area via the cross-product norm, in f64.
fn triangle_area(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> f64 {
    let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
    let cross = [
        e1[1].mul_add(e2[2], -(e1[2] * e2[1])),
        e1[2].mul_add(e2[0], -(e1[0] * e2[2])),
        e1[0].mul_add(e2[1], -(e1[1] * e2[0])),
    ];
    0.5 * cross[2]
        .mul_add(cross[2], cross[0].mul_add(cross[0], cross[1] * cross[1]))
        .sqrt()
}

/// Remove vertices not referenced by any face and compact the vertex
/// array, preserving relative order.
///
/// Face indices are rewritten to the compacted range `[0, new_count)`.
/// Returns the number of vertices removed.
///
/// # Example
///
/// ```
/// use relief_cleanup::remove_unreferenced_vertices;
/// use relief_types::{ReliefMesh, Vertex};
///
/// let mut mesh = ReliefMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(9.0, 9.0, 9.0)); // unreferenced
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 2, 3]);
///
/// assert_eq!(remove_unreferenced_vertices(&mut mesh), 1);
/// assert_eq!(mesh.faces[0], [0, 1, 2]);
/// ```
pub fn remove_unreferenced_vertices(mesh: &mut ReliefMesh) -> usize {
    let original_count = mesh.vertices.len();

    let mut referenced: HashSet<u32> = HashSet::with_capacity(original_count);
    for face in &mesh.faces {
        referenced.insert(face[0]);
        referenced.insert(face[1]);
        referenced.insert(face[2]);
    }

    if referenced.len() == original_count {
        return 0;
    }

    let mut new_vertices = Vec::with_capacity(referenced.len());
    let mut remap: HashMap<u32, u32> = HashMap::with_capacity(referenced.len());

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: vertex indices are u32; meshes beyond 4B vertices are unsupported
    for (old_idx, vertex) in mesh.vertices.iter().enumerate() {
        if referenced.contains(&(old_idx as u32)) {
            remap.insert(old_idx as u32, new_vertices.len() as u32);
            new_vertices.push(vertex.clone());
        }
    }

    for face in &mut mesh.faces {
        face[0] = remap[&face[0]];
        face[1] = remap[&face[1]];
        face[2] = remap[&face[2]];
    }

    let removed = original_count - new_vertices.len();
    mesh.vertices = new_vertices;

    removed
}

/// Run the full cleanup pass on a mesh.
///
/// Applies, in order:
///
/// 1. Duplicate face removal
/// 2. Degenerate face removal
/// 3. Unreferenced vertex removal
///
/// Each operation is idempotent; running cleanup twice yields the same
/// mesh. The result may be empty, which is not an error at this layer.
///
/// # Example
///
/// ```
/// use relief_cleanup::{cleanup_mesh, CleanupParams};
/// use relief_types::{ReliefMesh, Vertex};
///
/// let mut mesh = ReliefMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(10.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 10.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// let summary = cleanup_mesh(&mut mesh, &CleanupParams::default());
/// assert!(!summary.had_changes());
/// ```
#[must_use]
pub fn cleanup_mesh(mesh: &mut ReliefMesh, params: &CleanupParams) -> CleanupSummary {
    let initial_vertices = mesh.vertices.len();
    let initial_faces = mesh.faces.len();

    let duplicates_removed = remove_duplicate_faces(mesh);
    let degenerates_removed = remove_degenerate_faces(mesh, params.area_epsilon);
    let unreferenced_removed = remove_unreferenced_vertices(mesh);

    let summary = CleanupSummary {
        initial_vertices,
        initial_faces,
        final_vertices: mesh.vertices.len(),
        final_faces: mesh.faces.len(),
        duplicates_removed,
        degenerates_removed,
        unreferenced_removed,
    };

    debug!(
        duplicates = duplicates_removed,
        degenerates = degenerates_removed,
        unreferenced = unreferenced_removed,
        "mesh cleanup finished"
    );

    summary
}

/// Result of a cleanup pass.
#[derive(Debug, Clone, Default)]
pub struct CleanupSummary {
    /// Number of vertices before cleanup.
    pub initial_vertices: usize,
    /// Number of faces before cleanup.
    pub initial_faces: usize,
    /// Number of vertices after cleanup.
    pub final_vertices: usize,
    /// Number of faces after cleanup.
    pub final_faces: usize,
    /// Number of duplicate faces removed.
    pub duplicates_removed: usize,
    /// Number of degenerate faces removed.
    pub degenerates_removed: usize,
    /// Number of unreferenced vertices removed.
    pub unreferenced_removed: usize,
}

impl CleanupSummary {
    /// Check if any cleanup was performed.
    #[must_use]
    pub const fn had_changes(&self) -> bool {
        self.duplicates_removed > 0 || self.degenerates_removed > 0 || self.unreferenced_removed > 0
    }
}

impl std::fmt::Display for CleanupSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cleanup: {} verts ({} unreferenced), {} faces ({} duplicate, {} degenerate)",
            self.final_vertices,
            self.unreferenced_removed,
            self.final_faces,
            self.duplicates_removed,
            self.degenerates_removed
        )
    }
}
