//! The depth-estimation capability boundary.

use relief_types::{DepthGrid, ImageGrid};
use thiserror::Error;

/// Failure reported by the external depth estimator.
///
/// The pipeline surfaces this unchanged; there is no core-internal
/// recovery or retry.
#[derive(Debug, Error)]
#[error("depth estimation failed: {reason}")]
pub struct InferenceError {
    /// Collaborator-provided description of the failure.
    pub reason: String,
}

impl InferenceError {
    /// Create an inference error with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Capability object for the external depth-estimation model.
///
/// Implementations wrap a model loaded once during process initialization;
/// the pipeline holds the capability for its lifetime and never
/// re-initializes or mutates it per request. The contract accepts exactly
/// one input shape: the decoded image. Any calling-convention negotiation
/// with the underlying model belongs inside the implementation, not here.
///
/// The call is synchronous and may block for arbitrary latency; the
/// pipeline issues at most one outstanding call per request.
pub trait DepthEstimator {
    /// Produce a dense depth grid shaped to the image's pixel dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError`] when the model fails to produce a grid.
    fn estimate_depth(&self, image: &ImageGrid) -> Result<DepthGrid, InferenceError>;
}

impl<T: DepthEstimator + ?Sized> DepthEstimator for &T {
    fn estimate_depth(&self, image: &ImageGrid) -> Result<DepthGrid, InferenceError> {
        (**self).estimate_depth(image)
    }
}

impl<T: DepthEstimator + ?Sized> DepthEstimator for Box<T> {
    fn estimate_depth(&self, image: &ImageGrid) -> Result<DepthGrid, InferenceError> {
        (**self).estimate_depth(image)
    }
}

impl<T: DepthEstimator + ?Sized> DepthEstimator for std::sync::Arc<T> {
    fn estimate_depth(&self, image: &ImageGrid) -> Result<DepthGrid, InferenceError> {
        (**self).estimate_depth(image)
    }
}
