//! Depth normalization with flat-field fallback.

use rayon::prelude::*;
use relief_types::DepthGrid;
use tracing::{debug, warn};

/// Parameters for depth normalization.
///
/// `flat_epsilon` and `ramp_magnitude` are tunable policy, not a numeric
/// contract: the flat-field detection threshold and the ramp amplitude only
/// need to be small relative to representable depth resolution.
///
/// # Example
///
/// ```
/// use relief_heightfield::NormalizeParams;
///
/// let params = NormalizeParams::default()
///     .with_max_depth(1.5)
///     .with_stride(2);
/// assert_eq!(params.stride, 2);
/// ```
#[derive(Debug, Clone)]
pub struct NormalizeParams {
    /// Upper bound of the output height range. Must be positive.
    /// Default: `2.0`
    pub max_depth: f32,

    /// Subsampling stride applied before normalization (1 = no subsampling).
    /// Default: `1`
    pub stride: usize,

    /// Range threshold below which the grid is treated as flat.
    /// Default: `1e-6`
    pub flat_epsilon: f32,

    /// Amplitude of the monotonic ramp applied to flat grids.
    /// Default: `1e-6`
    pub ramp_magnitude: f32,
}

impl Default for NormalizeParams {
    fn default() -> Self {
        Self {
            max_depth: 2.0,
            stride: 1,
            flat_epsilon: 1e-6,
            ramp_magnitude: 1e-6,
        }
    }
}

impl NormalizeParams {
    /// Set the output height range upper bound.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: f32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the subsampling stride.
    #[must_use]
    pub const fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
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
}

/// A depth grid rescaled into `[0, max_depth]`.
///
/// The minimum source value maps to 0 and the maximum to `max_depth`,
/// except for flat-field inputs, where a deterministic ramp is applied
/// first (recorded in [`NormalizedDepth::fallback_applied`]). Values are
/// always finite.
#[derive(Debug, Clone)]
pub struct NormalizedDepth {
    height: usize,
    width: usize,
    values: Vec<f32>,
    max_depth: f32,
    fallback_applied: bool,
}

impl NormalizedDepth {
    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Row-major normalized values.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of range.
    #[inline]
    #[must_use]
    pub fn value(&self, row: usize, col: usize) -> f32 {
        self.values[row * self.width + col]
    }

    /// The height range upper bound the grid was scaled to.
    #[inline]
    #[must_use]
    pub const fn max_depth(&self) -> f32 {
        self.max_depth
    }

    /// Whether the flat-field ramp fallback was applied.
    ///
    /// A recorded condition, not an error: the mesh is valid but visually
    /// near-flat, and carries no depth signal from the model.
    #[inline]
    #[must_use]
    pub const fn fallback_applied(&self) -> bool {
        self.fallback_applied
    }
}

/// Normalize a raw depth grid into `[0, max_depth]`.
///
/// Steps:
///
/// 1. Subsample by `params.stride` (stride selection, see
///    [`DepthGrid::subsample`]).
/// 2. Compute min/max ignoring NaN.
/// 3. If the range is within `flat_epsilon`, add a monotonic ramp of
///    amplitude `ramp_magnitude` down the rows (across the columns when the
///    grid has a single row) and recompute. A 1x1 grid normalizes to zero.
/// 4. Rescale to `[0, max_depth]`.
///
/// The caller is responsible for rejecting non-finite input first; the
/// pipeline does so before this stage runs.
#[must_use]
pub fn normalize_depth(depth: &DepthGrid, params: &NormalizeParams) -> NormalizedDepth {
    let grid = depth.subsample(params.stride);
    let height = grid.height();
    let width = grid.width();
    let mut values = grid.values().to_vec();

    let range = grid.min_max();
    let mut fallback_applied = false;

    let (min, max) = match range {
        Some((min, max)) if (max - min).abs() > params.flat_epsilon => (min, max),
        Some((min, _)) => {
            // Flat field: no depth signal. Ramp along the longest-available
            // axis so the division below is well-defined.
            fallback_applied = true;
            warn!(
                height,
                width,
                constant = min,
                "flat depth field, applying ramp fallback"
            );
            apply_ramp(&mut values, height, width, params.ramp_magnitude);
            min_max(&values).unwrap_or((0.0, 0.0))
        }
        None => {
            // Every value NaN; unreachable behind pipeline validation but
            // kept total: normalize to a zero field.
            fallback_applied = true;
            values.fill(0.0);
            (0.0, 0.0)
        }
    };

    let span = max - min;
    if span > 0.0 {
        let scale = params.max_depth / span;
        values
            .par_iter_mut()
            .for_each(|v| *v = (*v - min) * scale);
    } else {
        // 1x1 grids (and the all-NaN guard above) have no range to map.
        values.fill(0.0);
    }

    debug!(height, width, max_depth = params.max_depth, "depth normalized");

    NormalizedDepth {
        height,
        width,
        values,
        max_depth: params.max_depth,
        fallback_applied,
    }
}

/// Add a linear 0..magnitude ramp: down the rows when there are at least
/// two, otherwise across the columns.
fn apply_ramp(values: &mut [f32], height: usize, width: usize, magnitude: f32) {
    if height > 1 {
        for (i, row) in values.chunks_exact_mut(width).enumerate() {
            let offset = magnitude * (i as f32) / ((height - 1) as f32);
            for v in row {
                *v += offset;
            }
        }
    } else if width > 1 {
        for (j, v) in values.iter_mut().enumerate() {
            *v += magnitude * (j as f32) / ((width - 1) as f32);
        }
    }
    // 1x1: nothing to ramp; the caller maps the degenerate range to zero.
}

fn min_max(values: &[f32]) -> Option<(f32, f32)> {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in values {
        if v.is_nan() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
    }
    (min <= max).then_some((min, max))
}
