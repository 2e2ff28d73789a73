//! Heatmap accumulation of positive scan windows.
//!
//! Each positive window adds one to every pixel it covers, so pixels covered
//! by many overlapping detections stand out. Thresholding the heatmap and
//! labeling connected regions happen downstream; [`Heatmap::threshold`] only
//! produces the boolean mask a labeler consumes.
//!
//! A heatmap is owned and mutated by a single accumulator. Parallel scans
//! accumulate into separate heatmaps (or collect windows first) and reduce
//! explicitly afterwards.

use ndarray::{s, Array2, ArrayView2};

use crate::geometry::Window;
use crate::image_size::ImageSize;

/// Per-pixel count of positive windows covering that pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heatmap {
    counts: Array2<u32>,
}

impl Heatmap {
    /// All-zero heatmap of the given size.
    pub fn zeros(size: ImageSize) -> Self {
        Self {
            counts: size.zeroed_counts(),
        }
    }

    /// Wrap an existing `(height, width)` count grid.
    pub fn from_counts(counts: Array2<u32>) -> Self {
        Self { counts }
    }

    pub fn size(&self) -> ImageSize {
        ImageSize::from_shape(self.counts.dim())
    }

    /// Add one to every pixel in `[y0, y1) x [x0, x1)` of each window.
    ///
    /// Windows are clipped to the grid; the part of a window outside the
    /// image contributes nothing.
    pub fn accumulate(&mut self, windows: &[Window]) {
        let (rows, cols) = self.counts.dim();
        for window in windows {
            let x0 = clamp_index(window.left(), cols);
            let x1 = clamp_index(window.right(), cols);
            let y0 = clamp_index(window.top(), rows);
            let y1 = clamp_index(window.bottom(), rows);
            if x0 >= x1 || y0 >= y1 {
                continue;
            }
            let mut region = self.counts.slice_mut(s![y0..y1, x0..x1]);
            region += 1;
        }
    }

    /// Read-only view of the counts, indexed `[row, col]`.
    pub fn counts(&self) -> ArrayView2<'_, u32> {
        self.counts.view()
    }

    pub fn into_counts(self) -> Array2<u32> {
        self.counts
    }

    /// Highest count in the grid, zero for an empty grid.
    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Mask of pixels whose count is strictly greater than `min_count`.
    pub fn threshold(&self, min_count: u32) -> Array2<bool> {
        self.counts.mapv(|c| c > min_count)
    }
}

fn clamp_index(coord: i64, len: usize) -> usize {
    coord.clamp(0, len as i64) as usize
}

/// Build a heatmap of `size` from the windows the detector flagged as positive.
///
/// # Examples
/// ```rust
/// use slider::geometry::Window;
/// use slider::heatmap::aggregate_heatmap;
/// use slider::image_size::ImageSize;
///
/// let positives = vec![Window::new((0, 0), (2, 2)), Window::new((1, 1), (3, 3))];
/// let heatmap = aggregate_heatmap(ImageSize::from_width_height(4, 4), &positives);
///
/// assert_eq!(heatmap.counts()[[1, 1]], 2);
/// assert_eq!(heatmap.counts()[[3, 3]], 0);
/// ```
pub fn aggregate_heatmap(size: ImageSize, positive_windows: &[Window]) -> Heatmap {
    let mut heatmap = Heatmap::zeros(size);
    heatmap.accumulate(positive_windows);
    heatmap
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn size4() -> ImageSize {
        ImageSize::from_width_height(4, 4)
    }

    #[test]
    fn test_single_window() {
        let heatmap = aggregate_heatmap(size4(), &[Window::new((0, 0), (2, 2))]);
        let expected: Array2<u32> =
            arr2(&[[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        assert_eq!(heatmap.counts(), expected);
    }

    #[test]
    fn test_overlapping_windows_accumulate() {
        let windows = [Window::new((0, 0), (2, 2)), Window::new((1, 1), (3, 3))];
        let heatmap = aggregate_heatmap(size4(), &windows);
        let expected: Array2<u32> =
            arr2(&[[1, 1, 0, 0], [1, 2, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]]);
        assert_eq!(heatmap.counts(), expected);
        assert_eq!(heatmap.max(), 2);
    }

    #[test]
    fn test_rows_are_y_and_columns_are_x() {
        let size = ImageSize::from_width_height(5, 3);
        let heatmap = aggregate_heatmap(size, &[Window::new((3, 0), (5, 1))]);
        assert_eq!(heatmap.counts().dim(), (3, 5));
        assert_eq!(heatmap.counts()[[0, 3]], 1);
        assert_eq!(heatmap.counts()[[0, 4]], 1);
        assert_eq!(heatmap.counts().sum(), 2);
        assert_eq!(heatmap.size(), size);
    }

    #[test]
    fn test_windows_are_clipped() {
        let windows = [
            Window::new((2, 2), (10, 10)),
            Window::new((-5, -5), (1, 1)),
            Window::new((10, 10), (20, 20)),
        ];
        let heatmap = aggregate_heatmap(size4(), &windows);
        let expected: Array2<u32> =
            arr2(&[[1, 0, 0, 0], [0, 0, 0, 0], [0, 0, 1, 1], [0, 0, 1, 1]]);
        assert_eq!(heatmap.counts(), expected);
    }

    #[test]
    fn test_accumulate_is_additive() {
        let window = Window::new((0, 0), (4, 4));
        let mut heatmap = Heatmap::zeros(size4());
        heatmap.accumulate(&[window]);
        heatmap.accumulate(&[window, window]);
        assert!(heatmap.counts().iter().all(|&c| c == 3));
    }

    #[test]
    fn test_threshold_is_strict() {
        let heatmap = Heatmap::from_counts(arr2(&[[0, 1], [2, 3]]));
        assert_eq!(heatmap.threshold(1), arr2(&[[false, false], [true, true]]));
        assert_eq!(heatmap.threshold(0), arr2(&[[false, true], [true, true]]));
    }

    #[test]
    fn test_empty_positive_list() {
        let heatmap = aggregate_heatmap(size4(), &[]);
        assert_eq!(heatmap.max(), 0);
        assert_eq!(heatmap.into_counts(), Array2::<u32>::zeros((4, 4)));
    }
}
