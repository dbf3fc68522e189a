//! Mesh validation reporting.

use hashbrown::HashSet;
use relief_types::ReliefMesh;

use crate::cleanup::{face_is_degenerate, rotate_to_min, CleanupParams};

/// Validation report for a mesh.
///
/// Counts the defects the cleanup pass removes; a cleaned mesh reports
/// zero for every defect class.
///
/// # Example
///
/// ```
/// use relief_cleanup::validate_mesh;
/// use relief_types::{ReliefMesh, Vertex};
///
/// let mut mesh = ReliefMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// let report = validate_mesh(&mesh);
/// assert!(report.is_clean());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeshReport {
    /// Total vertices.
    pub vertex_count: usize,
    /// Total faces.
    pub face_count: usize,
    /// Faces with an index outside the vertex array.
    pub out_of_range_faces: usize,
    /// Faces that are rotations of an earlier face.
    pub duplicate_faces: usize,
    /// Faces with repeated indices, non-finite positions, or area below
    /// the epsilon.
    pub degenerate_faces: usize,
    /// Vertices referenced by no face.
    pub unreferenced_vertices: usize,
}

impl MeshReport {
    /// Whether the mesh satisfies every post-cleanup invariant.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.out_of_range_faces == 0
            && self.duplicate_faces == 0
            && self.degenerate_faces == 0
            && self.unreferenced_vertices == 0
    }
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mesh: {} verts ({} unreferenced), {} faces ({} out-of-range, {} duplicate, {} degenerate)",
            self.vertex_count,
            self.unreferenced_vertices,
            self.face_count,
            self.out_of_range_faces,
            self.duplicate_faces,
            self.degenerate_faces
        )
    }
}

/// Validate a mesh with default cleanup parameters.
#[must_use]
pub fn validate_mesh(mesh: &ReliefMesh) -> MeshReport {
    validate_mesh_with_params(mesh, &CleanupParams::default())
}

/// Validate a mesh against the given cleanup parameters.
///
/// The report is diagnostic only; the mesh is not modified.
#[must_use]
pub fn validate_mesh_with_params(mesh: &ReliefMesh, params: &CleanupParams) -> MeshReport {
    let vertex_count = mesh.vertices.len();
    let mut report = MeshReport {
        vertex_count,
        face_count: mesh.faces.len(),
        ..MeshReport::default()
    };

    let mut seen: HashSet<[u32; 3]> = HashSet::with_capacity(mesh.faces.len());
    let mut referenced: HashSet<u32> = HashSet::with_capacity(vertex_count);

    for &face in &mesh.faces {
        let [i0, i1, i2] = face;
        referenced.insert(i0);
        referenced.insert(i1);
        referenced.insert(i2);

        if !seen.insert(rotate_to_min(face)) {
            report.duplicate_faces += 1;
            continue;
        }

        if (i0 as usize) >= vertex_count
            || (i1 as usize) >= vertex_count
            || (i2 as usize) >= vertex_count
        {
            report.out_of_range_faces += 1;
            continue;
        }

        if face_is_degenerate(&mesh.vertices, face, params.area_epsilon) {
            report.degenerate_faces += 1;
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: vertex indices are u32 by mesh convention
    let index_range = 0..vertex_count as u32;
    report.unreferenced_vertices = index_range.filter(|i| !referenced.contains(i)).count();

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::cleanup::{cleanup_mesh, CleanupParams};
    use relief_types::Vertex;

    fn dirty_mesh() -> ReliefMesh {
        let mut mesh = ReliefMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(10.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 10.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(5.0, 5.0, 5.0)); // unreferenced
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([1, 2, 0]); // duplicate
        mesh.faces.push([0, 1, 1]); // degenerate
        mesh.faces.push([0, 1, 9]); // out of range
        mesh
    }

    #[test]
    fn report_counts_defects() {
        let report = validate_mesh(&dirty_mesh());
        assert_eq!(report.duplicate_faces, 1);
        assert_eq!(report.degenerate_faces, 1);
        assert_eq!(report.out_of_range_faces, 1);
        assert_eq!(report.unreferenced_vertices, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn cleaned_mesh_is_clean() {
        let mut mesh = dirty_mesh();
        let _ = cleanup_mesh(&mut mesh, &CleanupParams::default());

        let report = validate_mesh(&mesh);
        assert!(report.is_clean(), "{report}");
    }

    #[test]
    fn empty_mesh_is_clean() {
        let report = validate_mesh(&ReliefMesh::new());
        assert!(report.is_clean());
        assert_eq!(report.vertex_count, 0);
    }

    #[test]
    fn report_display() {
        let report = validate_mesh(&dirty_mesh());
        let display = format!("{report}");
        assert!(display.contains("4 verts"));
        assert!(display.contains("1 duplicate"));
    }
}
