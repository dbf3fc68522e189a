//! Pipeline orchestration.

use relief_cleanup::{cleanup_mesh, CleanupParams};
use relief_gltf::{encode_glb, GlbArtifact};
use relief_heightfield::{
    build_grid_mesh, compute_vertex_normals, normalize_depth, NormalizeParams,
};
use relief_types::{DepthGrid, ImageGrid};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::diagnostic;
use crate::error::{PipelineError, PipelineResult};
use crate::estimator::DepthEstimator;

/// The depth-to-mesh pipeline orchestrator.
///
/// Owns the policy configuration and holds the externally-constructed
/// estimator capability. Everything else is request-local: each call
/// creates, transforms, and returns (or drops) its own grids, meshes, and
/// artifacts, so concurrent calls never share mutable state.
///
/// # Example
///
/// ```
/// use relief_pipeline::{DepthEstimator, InferenceError, PipelineConfig, ReliefPipeline};
/// use relief_types::{DepthGrid, ImageGrid, VertexColor};
///
/// struct RampModel;
///
/// impl DepthEstimator for RampModel {
///     fn estimate_depth(&self, image: &ImageGrid) -> Result<DepthGrid, InferenceError> {
///         let values = (0..image.height() * image.width())
///             .map(|i| i as f32)
///             .collect();
///         DepthGrid::from_values(image.height(), image.width(), values)
///             .ok_or_else(|| InferenceError::new("empty image"))
///     }
/// }
///
/// let pipeline = ReliefPipeline::new(RampModel, PipelineConfig::default());
/// let image = ImageGrid::solid(4, 4, VertexColor::WHITE).unwrap();
/// let artifact = pipeline.generate(&image).unwrap();
/// assert_eq!(&artifact.bytes()[0..4], b"glTF");
/// ```
#[derive(Debug)]
pub struct ReliefPipeline<E> {
    estimator: E,
    config: PipelineConfig,
}

impl<E: DepthEstimator> ReliefPipeline<E> {
    /// Create a pipeline around an estimator capability and policy config.
    pub const fn new(estimator: E, config: PipelineConfig) -> Self {
        Self { estimator, config }
    }

    /// The active configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline for a decoded image: estimate depth, then
    /// reconstruct and encode the mesh.
    ///
    /// # Errors
    ///
    /// Any [`PipelineError`] kind; estimator failures are surfaced
    /// unchanged as [`PipelineError::Inference`].
    pub fn generate(&self, image: &ImageGrid) -> PipelineResult<GlbArtifact> {
        let depth = self.estimator.estimate_depth(image)?;
        self.generate_from_depth(image, &depth)
    }

    /// Reconstruct and encode a mesh from an already-produced depth grid.
    ///
    /// Stages: validate → downscale policy → normalize → triangulate →
    /// cleanup → (vertex normals) → encode. The first failing stage stops
    /// the pipeline; no partial artifacts are returned.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidDepth`] - the grid has non-finite values
    ///   or does not match the image dimensions
    /// - [`PipelineError::EmptyMesh`] - cleanup removed every face; the
    ///   raw depth grid is persisted for inspection when possible
    /// - [`PipelineError::Encoding`] - GLB serialization failed
    pub fn generate_from_depth(
        &self,
        image: &ImageGrid,
        depth: &DepthGrid,
    ) -> PipelineResult<GlbArtifact> {
        if depth.height() != image.height() || depth.width() != image.width() {
            return Err(PipelineError::InvalidDepth {
                reason: format!(
                    "depth grid {}x{} does not match image {}x{}",
                    depth.height(),
                    depth.width(),
                    image.height(),
                    image.width()
                ),
            });
        }
        if depth.has_non_finite() {
            return Err(PipelineError::InvalidDepth {
                reason: "depth grid contains non-finite values".to_string(),
            });
        }

        let stride = self.config.downscale_for(image.width(), image.height());
        debug!(
            height = depth.height(),
            width = depth.width(),
            stride,
            "depth grid validated"
        );

        let normalize_params = NormalizeParams::default()
            .with_max_depth(self.config.max_depth)
            .with_stride(stride)
            .with_flat_epsilon(self.config.flat_epsilon)
            .with_ramp_magnitude(self.config.ramp_magnitude);
        let normalized = normalize_depth(depth, &normalize_params);

        // The paired image is subsampled in lockstep so vertex colors
        // stay aligned with the surviving grid cells.
        let subsampled_image;
        let image_for_colors = if stride > 1 {
            subsampled_image = image.subsample(stride);
            &subsampled_image
        } else {
            image
        };

        let mut mesh = build_grid_mesh(&normalized, Some(image_for_colors));
        let summary = cleanup_mesh(
            &mut mesh,
            &CleanupParams::default().with_area_epsilon(self.config.area_epsilon),
        );

        info!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            fallback = normalized.fallback_applied(),
            %summary,
            "mesh created"
        );

        if mesh.is_empty() {
            let diagnostic = diagnostic::persist_depth_dump(depth);
            return Err(PipelineError::EmptyMesh { diagnostic });
        }

        if self.config.compute_normals {
            compute_vertex_normals(&mut mesh);
        }

        let artifact = encode_glb(&mesh)?;
        info!(bytes = artifact.len(), "exported GLB artifact");
        Ok(artifact)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::estimator::InferenceError;
    use relief_types::VertexColor;

    /// Estimator returning a row-index ramp shaped to the image.
    struct RampModel;

    impl DepthEstimator for RampModel {
        fn estimate_depth(&self, image: &ImageGrid) -> Result<DepthGrid, InferenceError> {
            let width = image.width();
            let values = (0..image.height() * width)
                .map(|i| (i / width) as f32)
                .collect();
            DepthGrid::from_values(image.height(), width, values)
                .ok_or_else(|| InferenceError::new("empty image"))
        }
    }

    struct BrokenModel;

    impl DepthEstimator for BrokenModel {
        fn estimate_depth(&self, _image: &ImageGrid) -> Result<DepthGrid, InferenceError> {
            Err(InferenceError::new("CUDA device lost"))
        }
    }

    fn pipeline() -> ReliefPipeline<RampModel> {
        ReliefPipeline::new(RampModel, PipelineConfig::default())
    }

    fn image(height: usize, width: usize) -> ImageGrid {
        ImageGrid::solid(height, width, VertexColor::WHITE).unwrap()
    }

    #[test]
    fn generate_produces_glb() {
        let artifact = pipeline().generate(&image(4, 4)).unwrap();
        assert_eq!(&artifact.bytes()[0..4], b"glTF");
        assert_eq!(artifact.media_type(), "model/gltf-binary");
    }

    #[test]
    fn nan_depth_fails_validation() {
        let img = image(2, 2);
        let depth = DepthGrid::from_values(2, 2, vec![0.0, 1.0, f32::NAN, 0.5]).unwrap();

        let result = pipeline().generate_from_depth(&img, &depth);
        assert!(matches!(result, Err(PipelineError::InvalidDepth { .. })));
    }

    #[test]
    fn shape_mismatch_fails_validation() {
        let img = image(2, 2);
        let depth = DepthGrid::filled(3, 2, 1.0).unwrap();

        let result = pipeline().generate_from_depth(&img, &depth);
        match result {
            Err(PipelineError::InvalidDepth { reason }) => {
                assert!(reason.contains("does not match"));
            }
            other => panic!("expected InvalidDepth, got {other:?}"),
        }
    }

    #[test]
    fn flat_depth_still_meshes() {
        // Constant depth: the ramp fallback keeps the mesh non-degenerate.
        let img = image(3, 3);
        let depth = DepthGrid::filled(3, 3, 5.0).unwrap();

        let artifact = pipeline().generate_from_depth(&img, &depth).unwrap();
        assert!(!artifact.is_empty());
    }

    #[test]
    fn single_row_fails_with_diagnostic() {
        // One row triangulates to zero faces, so cleanup empties the mesh.
        let img = image(1, 5);
        let depth = DepthGrid::from_values(1, 5, vec![0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();

        let result = pipeline().generate_from_depth(&img, &depth);
        match result {
            Err(PipelineError::EmptyMesh { diagnostic }) => {
                let path = diagnostic.unwrap();
                assert!(path.exists());
                std::fs::remove_file(path).unwrap();
            }
            other => panic!("expected EmptyMesh, got {other:?}"),
        }
    }

    #[test]
    fn estimator_failure_surfaces_unchanged() {
        let pipeline = ReliefPipeline::new(BrokenModel, PipelineConfig::default());
        let result = pipeline.generate(&image(2, 2));

        match result {
            Err(PipelineError::Inference(err)) => {
                assert_eq!(err.reason, "CUDA device lost");
            }
            other => panic!("expected Inference, got {other:?}"),
        }
    }

    #[test]
    fn large_images_are_downscaled() {
        // Lowered threshold stands in for the 1024 default: a 6x6 grid
        // over threshold 4 shrinks to 3x3 before meshing.
        let config = PipelineConfig::default().with_downscale_threshold(4);
        let pipeline = ReliefPipeline::new(RampModel, config);

        let artifact = pipeline.generate(&image(6, 6)).unwrap();

        // 3x3 grid -> 9 vertices, 8 faces; verify via the position accessor.
        let bytes = artifact.bytes();
        let json_len =
            u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]) as usize;
        let doc: serde_json::Value = serde_json::from_slice(&bytes[20..20 + json_len]).unwrap();
        assert_eq!(doc["accessors"][0]["count"], 9);
    }

    #[test]
    fn normals_can_be_disabled() {
        let config = PipelineConfig::default().with_compute_normals(false);
        let pipeline = ReliefPipeline::new(RampModel, config);

        let artifact = pipeline.generate(&image(3, 3)).unwrap();
        let bytes = artifact.bytes();
        let json_len =
            u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]) as usize;
        let doc: serde_json::Value = serde_json::from_slice(&bytes[20..20 + json_len]).unwrap();

        let attributes = &doc["meshes"][0]["primitives"][0]["attributes"];
        assert!(attributes.get("NORMAL").is_none());
        // Vertex colors from the paired image are still present.
        assert!(attributes["COLOR_0"].is_u64());
    }
}
