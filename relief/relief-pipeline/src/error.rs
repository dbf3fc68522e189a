//! Pipeline error taxonomy.

use std::path::PathBuf;

use relief_gltf::EncodeError;
use thiserror::Error;

use crate::estimator::InferenceError;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors reported by the depth-to-mesh pipeline.
///
/// All kinds are non-retriable at this level; retry policy, if any,
/// belongs to the caller. The pipeline stops at the first failure and
/// never returns partial artifacts.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The depth grid failed validation (non-finite values, or a shape
    /// that does not match the image). No mesh was attempted.
    #[error("invalid depth grid: {reason}")]
    InvalidDepth {
        /// What made the grid invalid.
        reason: String,
    },

    /// Cleanup yielded a mesh with zero vertices or zero faces.
    ///
    /// When the raw depth grid could be persisted, `diagnostic` holds the
    /// dump location for offline inspection.
    #[error("cleanup produced an empty mesh{}", diagnostic_suffix(.diagnostic))]
    EmptyMesh {
        /// Location of the persisted raw depth dump, when available.
        diagnostic: Option<PathBuf>,
    },

    /// GLB serialization failed.
    #[error("mesh encoding failed: {0}")]
    Encoding(#[from] EncodeError),

    /// The external estimator failed; surfaced unchanged.
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl PipelineError {
    /// The diagnostic dump path, present only on empty-mesh failures
    /// where the dump was persisted.
    #[must_use]
    pub fn diagnostic(&self) -> Option<&PathBuf> {
        match self {
            Self::EmptyMesh { diagnostic } => diagnostic.as_ref(),
            _ => None,
        }
    }
}

fn diagnostic_suffix(diagnostic: &Option<PathBuf>) -> String {
    diagnostic.as_ref().map_or_else(String::new, |path| {
        format!(" (raw depth saved to {})", path.display())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn invalid_depth_message() {
        let err = PipelineError::InvalidDepth {
            reason: "depth grid contains non-finite values".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "invalid depth grid: depth grid contains non-finite values"
        );
    }

    #[test]
    fn empty_mesh_message_includes_dump_path() {
        let err = PipelineError::EmptyMesh {
            diagnostic: Some(PathBuf::from("/tmp/relief-depth-1.rdg")),
        };
        let message = format!("{err}");
        assert!(message.contains("empty mesh"));
        assert!(message.contains("/tmp/relief-depth-1.rdg"));
        assert!(err.diagnostic().is_some());
    }

    #[test]
    fn empty_mesh_message_without_dump() {
        let err = PipelineError::EmptyMesh { diagnostic: None };
        assert_eq!(format!("{err}"), "cleanup produced an empty mesh");
        assert!(err.diagnostic().is_none());
    }

    #[test]
    fn inference_error_is_surfaced_unchanged() {
        let err: PipelineError = InferenceError::new("device lost").into();
        assert_eq!(format!("{err}"), "depth estimation failed: device lost");
    }
}
