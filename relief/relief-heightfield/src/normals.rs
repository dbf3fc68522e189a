//! Area-weighted vertex normals.

use nalgebra::Vector3;
use relief_types::ReliefMesh;

/// Compute per-vertex normals as the area-weighted average of incident
/// face normals.
///
/// The unnormalized cross product of a face's edges is proportional to its
/// area, so summing raw cross products per vertex weights large faces more
/// heavily; the sum is normalized at the end. Vertices whose accumulated
/// normal has no length (no incident faces, or cancelling faces) get the
/// −Y axis, the dominant facing of grid meshes under the fixed winding.
///
/// # Example
///
/// ```
/// use relief_heightfield::{normalize_depth, build_grid_mesh, compute_vertex_normals, NormalizeParams};
/// use relief_types::DepthGrid;
///
/// let grid = DepthGrid::from_values(2, 2, vec![0.0, 1.0, 0.5, 0.8]).unwrap();
/// let mut mesh = build_grid_mesh(&normalize_depth(&grid, &NormalizeParams::default()), None);
/// compute_vertex_normals(&mut mesh);
///
/// assert!(mesh.has_normals());
/// ```
pub fn compute_vertex_normals(mesh: &mut ReliefMesh) {
    let mut accumulated = vec![Vector3::<f32>::zeros(); mesh.vertices.len()];

    for &[i0, i1, i2] in &mesh.faces {
        let v0 = mesh.vertices[i0 as usize].position;
        let v1 = mesh.vertices[i1 as usize].position;
        let v2 = mesh.vertices[i2 as usize].position;

        let face_normal = (v1 - v0).cross(&(v2 - v0));
        accumulated[i0 as usize] += face_normal;
        accumulated[i1 as usize] += face_normal;
        accumulated[i2 as usize] += face_normal;
    }

    for (vertex, sum) in mesh.vertices.iter_mut().zip(accumulated) {
        let len = sum.norm();
        vertex.attributes.normal = Some(if len > f32::EPSILON {
            sum / len
        } else {
            -Vector3::y()
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{build_grid_mesh, normalize_depth, NormalizeParams};
    use relief_types::DepthGrid;

    fn flat_mesh(height: usize, width: usize) -> ReliefMesh {
        // Normalization stretches any depth range to [0, max_depth], so a
        // near-flat mesh needs a tiny max_depth rather than a flat grid.
        let values = (0..height * width).map(|i| i as f32).collect();
        let grid = DepthGrid::from_values(height, width, values).unwrap();
        let params = NormalizeParams::default().with_max_depth(1e-6);
        build_grid_mesh(&normalize_depth(&grid, &params), None)
    }

    #[test]
    fn flat_grid_normals_point_down_y() {
        let mut mesh = flat_mesh(3, 3);
        compute_vertex_normals(&mut mesh);

        assert!(mesh.has_normals());
        for v in &mesh.vertices {
            let n = v.normal().unwrap();
            assert!((n.norm() - 1.0).abs() < 1e-5);
            assert!(n.y < -0.99, "expected -Y facing, got {n:?}");
        }
    }

    #[test]
    fn isolated_vertices_get_axis_fallback() {
        let mut mesh = flat_mesh(1, 3); // zero faces
        compute_vertex_normals(&mut mesh);

        for v in &mesh.vertices {
            assert_eq!(v.normal().unwrap(), -Vector3::y());
        }
    }

    #[test]
    fn normals_are_unit_length_on_relief() {
        let grid = DepthGrid::from_values(3, 3, vec![0.0, 1.0, 0.0, 1.0, 2.0, 1.0, 0.0, 1.0, 0.0])
            .unwrap();
        let mut mesh = build_grid_mesh(&normalize_depth(&grid, &NormalizeParams::default()), None);
        compute_vertex_normals(&mut mesh);

        for v in &mesh.vertices {
            assert!((v.normal().unwrap().norm() - 1.0).abs() < 1e-5);
        }
    }
}
