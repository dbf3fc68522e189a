//! Dense per-pixel grids: depth values and paired image pixels.

use crate::vertex::VertexColor;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A dense H×W grid of per-pixel depth estimates, stored row-major.
///
/// Depth units are arbitrary and defined by the producing model. The grid
/// shape is validated at construction: both dimensions must be at least 1
/// and the value count must equal `height * width`.
///
/// Values are *not* validated here; callers that require finite values
/// (the pipeline does) check with [`DepthGrid::has_non_finite`] first.
///
/// # Example
///
/// ```
/// use relief_types::DepthGrid;
///
/// let grid = DepthGrid::from_values(2, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(grid.get(1, 2), Some(5.0));
/// assert_eq!(grid.min_max(), Some((0.0, 5.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DepthGrid {
    height: usize,
    width: usize,
    values: Vec<f32>,
}

impl DepthGrid {
    /// Create a grid from row-major values.
    ///
    /// Returns `None` if either dimension is zero or if `values.len()`
    /// does not equal `height * width`.
    ///
    /// # Example
    ///
    /// ```
    /// use relief_types::DepthGrid;
    ///
    /// assert!(DepthGrid::from_values(2, 2, vec![0.0; 4]).is_some());
    /// assert!(DepthGrid::from_values(2, 2, vec![0.0; 3]).is_none());
    /// assert!(DepthGrid::from_values(0, 2, vec![]).is_none());
    /// ```
    #[must_use]
    pub fn from_values(height: usize, width: usize, values: Vec<f32>) -> Option<Self> {
        if height == 0 || width == 0 || values.len() != height * width {
            return None;
        }
        Some(Self {
            height,
            width,
            values,
        })
    }

    /// Create a grid where every cell holds the same value.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn filled(height: usize, width: usize, value: f32) -> Option<Self> {
        Self::from_values(height, width, vec![value; height.checked_mul(width)?])
    }

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

    /// Row-major slice of all values.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value at (row, col), or `None` when out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.height && col < self.width {
            Some(self.values[row * self.width + col])
        } else {
            None
        }
    }

    /// One row of the grid as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height`.
    #[inline]
    #[must_use]
    pub fn row(&self, row: usize) -> &[f32] {
        &self.values[row * self.width..(row + 1) * self.width]
    }

    /// Subsample the grid by taking every `stride`-th row and column.
    ///
    /// This is stride selection, not interpolation: cell (i, j) of the
    /// result is cell (i·stride, j·stride) of the source. The result has
    /// `ceil(H/stride) × ceil(W/stride)` cells. A stride of 0 or 1 returns
    /// a clone.
    ///
    /// # Example
    ///
    /// ```
    /// use relief_types::DepthGrid;
    ///
    /// let grid = DepthGrid::from_values(3, 3, (0..9).map(|v| v as f32).collect()).unwrap();
    /// let small = grid.subsample(2);
    /// assert_eq!(small.height(), 2);
    /// assert_eq!(small.width(), 2);
    /// assert_eq!(small.values(), &[0.0, 2.0, 6.0, 8.0]);
    /// ```
    #[must_use]
    pub fn subsample(&self, stride: usize) -> Self {
        let stride = stride.max(1);
        if stride == 1 {
            return self.clone();
        }

        let height = self.height.div_ceil(stride);
        let width = self.width.div_ceil(stride);
        let mut values = Vec::with_capacity(height * width);
        for i in (0..self.height).step_by(stride) {
            for j in (0..self.width).step_by(stride) {
                values.push(self.values[i * self.width + j]);
            }
        }

        Self {
            height,
            width,
            values,
        }
    }

    /// Minimum and maximum over the grid, ignoring NaN values.
    ///
    /// Returns `None` when every value is NaN.
    #[must_use]
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in &self.values {
            if v.is_nan() {
                continue;
            }
            min = min.min(v);
            max = max.max(v);
        }
        (min <= max).then_some((min, max))
    }

    /// Whether the grid contains any NaN or infinite value.
    #[must_use]
    pub fn has_non_finite(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }
}

/// A decoded image paired with a depth grid: dimensions plus RGB pixels,
/// stored row-major.
///
/// The pipeline uses the image for its pixel dimensions (the depth grid must
/// match them) and, optionally, to carry per-vertex colors into the mesh.
///
/// # Example
///
/// ```
/// use relief_types::{ImageGrid, VertexColor};
///
/// let image = ImageGrid::solid(2, 2, VertexColor::RED).unwrap();
/// assert_eq!(image.get(0, 1), Some(VertexColor::RED));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageGrid {
    height: usize,
    width: usize,
    pixels: Vec<VertexColor>,
}

impl ImageGrid {
    /// Create an image grid from row-major pixels.
    ///
    /// Returns `None` if either dimension is zero or if `pixels.len()`
    /// does not equal `height * width`.
    #[must_use]
    pub fn from_pixels(height: usize, width: usize, pixels: Vec<VertexColor>) -> Option<Self> {
        if height == 0 || width == 0 || pixels.len() != height * width {
            return None;
        }
        Some(Self {
            height,
            width,
            pixels,
        })
    }

    /// Create an image filled with a single color.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn solid(height: usize, width: usize, color: VertexColor) -> Option<Self> {
        Self::from_pixels(height, width, vec![color; height.checked_mul(width)?])
    }

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

    /// Row-major slice of all pixels.
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[VertexColor] {
        &self.pixels
    }

    /// Pixel at (row, col), or `None` when out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<VertexColor> {
        if row < self.height && col < self.width {
            Some(self.pixels[row * self.width + col])
        } else {
            None
        }
    }

    /// Subsample the image in lockstep with [`DepthGrid::subsample`].
    #[must_use]
    pub fn subsample(&self, stride: usize) -> Self {
        let stride = stride.max(1);
        if stride == 1 {
            return self.clone();
        }

        let height = self.height.div_ceil(stride);
        let width = self.width.div_ceil(stride);
        let mut pixels = Vec::with_capacity(height * width);
        for i in (0..self.height).step_by(stride) {
            for j in (0..self.width).step_by(stride) {
                pixels.push(self.pixels[i * self.width + j]);
            }
        }

        Self {
            height,
            width,
            pixels,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn from_values_validates_shape() {
        assert!(DepthGrid::from_values(2, 3, vec![0.0; 6]).is_some());
        assert!(DepthGrid::from_values(2, 3, vec![0.0; 5]).is_none());
        assert!(DepthGrid::from_values(0, 3, vec![]).is_none());
        assert!(DepthGrid::from_values(3, 0, vec![]).is_none());
    }

    #[test]
    fn get_in_and_out_of_range() {
        let grid = DepthGrid::from_values(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(grid.get(0, 0), Some(1.0));
        assert_eq!(grid.get(1, 1), Some(4.0));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 2), None);
    }

    #[test]
    fn row_slices() {
        let grid = DepthGrid::from_values(2, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(grid.row(0), &[0.0, 1.0, 2.0]);
        assert_eq!(grid.row(1), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn subsample_shrinks_by_ceil() {
        // 5 rows with stride 2 -> rows 0, 2, 4 = ceil(5/2) = 3
        let grid = DepthGrid::from_values(5, 4, (0..20).map(|v| v as f32).collect()).unwrap();
        let small = grid.subsample(2);
        assert_eq!(small.height(), 3);
        assert_eq!(small.width(), 2);
        assert_eq!(small.get(0, 0), Some(0.0));
        assert_eq!(small.get(1, 1), Some(10.0));
        assert_eq!(small.get(2, 0), Some(16.0));
    }

    #[test]
    fn full_resolution_grid_halves() {
        // The pipeline's stride-2 policy on a 2000x1200 grid yields 1000x600.
        let grid = DepthGrid::filled(1200, 2000, 1.0).unwrap();
        let small = grid.subsample(2);
        assert_eq!(small.height(), 600);
        assert_eq!(small.width(), 1000);
    }

    #[test]
    fn subsample_stride_one_is_identity() {
        let grid = DepthGrid::from_values(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(grid.subsample(1), grid);
        assert_eq!(grid.subsample(0), grid);
    }

    #[test]
    fn min_max_ignores_nan() {
        let grid = DepthGrid::from_values(2, 2, vec![1.0, f32::NAN, -3.0, 4.0]).unwrap();
        assert_eq!(grid.min_max(), Some((-3.0, 4.0)));
    }

    #[test]
    fn min_max_all_nan_is_none() {
        let grid = DepthGrid::filled(2, 2, f32::NAN).unwrap();
        assert_eq!(grid.min_max(), None);
    }

    #[test]
    fn non_finite_detection() {
        let clean = DepthGrid::filled(2, 2, 1.5).unwrap();
        assert!(!clean.has_non_finite());

        let nan = DepthGrid::from_values(1, 2, vec![0.0, f32::NAN]).unwrap();
        assert!(nan.has_non_finite());

        let inf = DepthGrid::from_values(1, 2, vec![0.0, f32::INFINITY]).unwrap();
        assert!(inf.has_non_finite());
    }

    #[test]
    fn image_lockstep_subsample() {
        let pixels = (0..12)
            .map(|i| VertexColor::new(i as u8, 0, 0))
            .collect::<Vec<_>>();
        let image = ImageGrid::from_pixels(3, 4, pixels).unwrap();
        let small = image.subsample(2);
        assert_eq!(small.height(), 2);
        assert_eq!(small.width(), 2);
        assert_eq!(small.get(0, 1), Some(VertexColor::new(2, 0, 0)));
        assert_eq!(small.get(1, 0), Some(VertexColor::new(8, 0, 0)));
    }

    #[test]
    fn image_validates_shape() {
        assert!(ImageGrid::from_pixels(2, 2, vec![VertexColor::WHITE; 4]).is_some());
        assert!(ImageGrid::from_pixels(2, 2, vec![VertexColor::WHITE; 5]).is_none());
        assert!(ImageGrid::solid(0, 2, VertexColor::WHITE).is_none());
    }
}
