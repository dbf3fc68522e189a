//! Depth-to-mesh pipeline orchestration.
//!
//! This crate wires the ReliefForge stages into a per-request pipeline:
//!
//! 1. **Validate** - Reject depth grids with non-finite values or a shape
//!    that does not match the decoded image
//! 2. **Downscale policy** - Stride-subsample large grids before meshing
//! 3. **Normalize** - Rescale depth into `[0, max_depth]` with flat-field
//!    fallback (`relief-heightfield`)
//! 4. **Triangulate** - Fixed-diagonal grid meshing with vertex colors
//!    from the paired image (`relief-heightfield`)
//! 5. **Cleanup** - Duplicate/degenerate/unreferenced removal
//!    (`relief-cleanup`)
//! 6. **Encode** - Self-contained GLB artifact (`relief-gltf`)
//!
//! The depth model itself is an external collaborator behind the
//! [`DepthEstimator`] capability trait, constructed once at process
//! startup and passed in; the pipeline never loads or mutates it.
//!
//! # Quick Start
//!
//! ```
//! use relief_pipeline::{DepthEstimator, InferenceError, PipelineConfig, ReliefPipeline};
//! use relief_types::{DepthGrid, ImageGrid, VertexColor};
//!
//! struct FlatModel;
//!
//! impl DepthEstimator for FlatModel {
//!     fn estimate_depth(&self, image: &ImageGrid) -> Result<DepthGrid, InferenceError> {
//!         DepthGrid::filled(image.height(), image.width(), 1.0)
//!             .ok_or_else(|| InferenceError::new("empty image"))
//!     }
//! }
//!
//! let pipeline = ReliefPipeline::new(FlatModel, PipelineConfig::default());
//! let image = ImageGrid::solid(8, 8, VertexColor::WHITE).unwrap();
//!
//! let artifact = pipeline.generate(&image).unwrap();
//! assert_eq!(artifact.media_type(), "model/gltf-binary");
//! ```
//!
//! # Error Taxonomy
//!
//! | Kind | Meaning |
//! |------|---------|
//! | [`PipelineError::InvalidDepth`] | Depth grid failed validation; nothing attempted |
//! | [`PipelineError::EmptyMesh`] | Cleanup removed every face; raw depth persisted when possible |
//! | [`PipelineError::Encoding`] | GLB serialization failed |
//! | [`PipelineError::Inference`] | Estimator failed; surfaced unchanged |
//!
//! The flat-field ramp fallback is a recorded condition, not an error:
//! the pipeline logs it and continues.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::cast_precision_loss)] // Grid dimensions fit f32 vertex space by design
#![allow(clippy::module_name_repetitions)]

mod config;
mod diagnostic;
mod error;
mod estimator;
mod pipeline;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use estimator::{DepthEstimator, InferenceError};
pub use pipeline::ReliefPipeline;

// Re-export the artifact and grid types callers exchange with the pipeline
pub use relief_gltf::{GlbArtifact, GLB_MEDIA_TYPE};
pub use relief_types::{DepthGrid, ImageGrid, ReliefMesh, VertexColor};
