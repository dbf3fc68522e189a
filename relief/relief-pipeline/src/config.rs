//! Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Policy constants for the depth-to-mesh pipeline.
///
/// All values are tunable policy with defaults matching the production
/// service behavior; none are derived from physics or the depth model.
///
/// # Example
///
/// ```
/// use relief_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default()
///     .with_max_depth(1.5)
///     .with_downscale_threshold(2048);
/// assert_eq!(config.downscale_for(4000, 1000), 2);
/// assert_eq!(config.downscale_for(800, 600), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Upper bound of the normalized height range. Default: `2.0`
    pub max_depth: f32,

    /// Image dimension above which the depth grid is downscaled.
    /// Default: `1024`
    pub downscale_threshold: usize,

    /// Stride applied when the threshold is exceeded. Default: `2`
    pub downscale_factor: usize,

    /// Flat-field detection threshold for normalization. Default: `1e-6`
    pub flat_epsilon: f32,

    /// Ramp amplitude applied to flat depth fields. Default: `1e-6`
    pub ramp_magnitude: f32,

    /// Whether to attach area-weighted vertex normals before export.
    /// Default: `true`
    pub compute_normals: bool,

    /// Minimum triangle area during cleanup. Default: `1e-12`
    pub area_epsilon: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_depth: 2.0,
            downscale_threshold: 1024,
            downscale_factor: 2,
            flat_epsilon: 1e-6,
            ramp_magnitude: 1e-6,
            compute_normals: true,
            area_epsilon: 1e-12,
        }
    }
}

impl PipelineConfig {
    /// Set the normalized height range upper bound.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: f32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the image dimension above which downscaling applies.
    #[must_use]
    pub const fn with_downscale_threshold(mut self, threshold: usize) -> Self {
        self.downscale_threshold = threshold;
        self
    }

    /// Set the downscale stride.
    #[must_use]
    pub const fn with_downscale_factor(mut self, factor: usize) -> Self {
        self.downscale_factor = factor;
        self
    }

    /// Set the flat-field detection threshold.
    #[must_use]
    pub const fn with_flat_epsilon(mut self, epsilon: f32) -> Self {
        self.flat_epsilon = epsilon;
        self
    }

    /// Set the flat-field ramp amplitude.
    #[must_use]
    pub const fn with_ramp_magnitude(mut self, magnitude: f32) -> Self {
        self.ramp_magnitude = magnitude;
        self
    }

    /// Set whether vertex normals are computed before export.
    #[must_use]
    pub const fn with_compute_normals(mut self, compute: bool) -> Self {
        self.compute_normals = compute;
        self
    }

    /// Set the cleanup area threshold.
    #[must_use]
    pub const fn with_area_epsilon(mut self, epsilon: f64) -> Self {
        self.area_epsilon = epsilon;
        self
    }

    /// The downscale stride for an image of the given dimensions:
    /// `downscale_factor` when the larger dimension exceeds the
    /// threshold, otherwise 1.
    #[must_use]
    pub fn downscale_for(&self, width: usize, height: usize) -> usize {
        if width.max(height) > self.downscale_threshold {
            self.downscale_factor.max(1)
        } else {
            1
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_policy() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_depth, 2.0);
        assert_eq!(config.downscale_threshold, 1024);
        assert_eq!(config.downscale_factor, 2);
        assert!(config.compute_normals);
    }

    #[test]
    fn downscale_policy() {
        let config = PipelineConfig::default();
        assert_eq!(config.downscale_for(2000, 1200), 2);
        assert_eq!(config.downscale_for(1200, 2000), 2);
        assert_eq!(config.downscale_for(1024, 1024), 1);
        assert_eq!(config.downscale_for(640, 480), 1);
    }

    #[test]
    fn zero_factor_never_disables_meshing() {
        let config = PipelineConfig::default().with_downscale_factor(0);
        assert_eq!(config.downscale_for(4000, 4000), 1);
    }

    #[test]
    fn serde_roundtrip_with_defaults() {
        let json = "{}";
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.downscale_threshold, 1024);

        let full = serde_json::to_string(&PipelineConfig::default().with_max_depth(3.0)).unwrap();
        let parsed: PipelineConfig = serde_json::from_str(&full).unwrap();
        assert_eq!(parsed.max_depth, 3.0);
    }
}
