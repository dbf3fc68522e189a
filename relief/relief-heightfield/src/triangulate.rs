//! Fixed-diagonal grid triangulation.

use rayon::prelude::*;
use relief_types::{ImageGrid, ReliefMesh, Vertex};
use tracing::debug;

use crate::normalize::NormalizedDepth;

/// Build a raw triangle mesh from a normalized depth grid.
///
/// Vertex placement for grid cell (row i, col j) of an H×W grid:
///
/// - `x = (j − W/2) / max(W, H)`
/// - `y = depth[i][j]`
/// - `z = −(i − H/2) / max(W, H)`
///
/// Vertices are emitted in row-major order (vertex index `i·W + j`). For
/// each interior quad with top-left index `idx`, with `a = idx`,
/// `b = idx + W`, `c = idx + 1`, `d = idx + W + 1`, two triangles are
/// emitted: `(a, b, c)` and `(c, b, d)`. The diagonal split and ordering
/// are fixed; they determine the face winding viewers use for normals.
///
/// When `image` is given and matches the grid shape, each vertex carries
/// the corresponding pixel color. A mismatched image is ignored.
///
/// Always succeeds: a single-row or single-column grid yields a mesh with
/// vertices but zero faces.
///
/// # Example
///
/// ```
/// use relief_heightfield::{normalize_depth, build_grid_mesh, NormalizeParams};
/// use relief_types::DepthGrid;
///
/// let grid = DepthGrid::from_values(3, 3, (0..9).map(|v| v as f32).collect()).unwrap();
/// let normalized = normalize_depth(&grid, &NormalizeParams::default());
/// let mesh = build_grid_mesh(&normalized, None);
///
/// assert_eq!(mesh.vertex_count(), 9);
/// assert_eq!(mesh.face_count(), 8);
/// ```
#[must_use]
pub fn build_grid_mesh(depth: &NormalizedDepth, image: Option<&ImageGrid>) -> ReliefMesh {
    let height = depth.height();
    let width = depth.width();
    let denom = width.max(height) as f32;
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;

    let image = image.filter(|img| img.height() == height && img.width() == width);

    let vertices: Vec<Vertex> = (0..height)
        .into_par_iter()
        .flat_map_iter(|i| {
            let z = -((i as f32 - half_h) / denom);
            (0..width).map(move |j| {
                let x = (j as f32 - half_w) / denom;
                let y = depth.value(i, j);
                match image.and_then(|img| img.get(i, j)) {
                    Some(color) => Vertex::with_color([x, y, z].into(), color),
                    None => Vertex::from_coords(x, y, z),
                }
            })
        })
        .collect();

    let mut faces = Vec::with_capacity(2 * height.saturating_sub(1) * width.saturating_sub(1));
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: mesh indices are u32; grids beyond 4B cells are unsupported
    for i in 0..height.saturating_sub(1) {
        for j in 0..width.saturating_sub(1) {
            let idx = (i * width + j) as u32;
            let (a, b, c, d) = (idx, idx + width as u32, idx + 1, idx + width as u32 + 1);
            faces.push([a, b, c]);
            faces.push([c, b, d]);
        }
    }

    debug!(
        vertices = vertices.len(),
        faces = faces.len(),
        "grid triangulated"
    );

    ReliefMesh::from_parts(vertices, faces)
}
