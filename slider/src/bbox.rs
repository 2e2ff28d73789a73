//! Bounding boxes of labeled connected regions.
//!
//! The labeler that produces a [`LabelMap`] lives outside this crate; this
//! module only turns its output into one [`Rect`] per label. Box corners are
//! the minimum and maximum pixel coordinates of the label, so a one-pixel
//! region yields a zero-area rectangle.

use std::collections::BTreeMap;

use log::warn;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};
use crate::geometry::Rect;
use crate::image_size::ImageSize;

/// What to do with a label ID in `1..=label_count` that has no pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Leave the label out of the result and keep going.
    #[default]
    Skip,
    /// Return [`ScanError::EmptyLabel`].
    Fail,
}

/// Connected-component label grid: 0 is background, `1..=label_count` are regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: Array2<u32>,
    label_count: u32,
}

impl LabelMap {
    pub fn new(labels: Array2<u32>, label_count: u32) -> Self {
        Self {
            labels,
            label_count,
        }
    }

    pub fn labels(&self) -> ArrayView2<'_, u32> {
        self.labels.view()
    }

    pub fn label_count(&self) -> u32 {
        self.label_count
    }

    pub fn size(&self) -> ImageSize {
        ImageSize::from_shape(self.labels.dim())
    }

    /// Shortcut for [`extract_bounding_boxes`] on this map.
    pub fn bounding_boxes(&self, policy: LabelPolicy) -> Result<Vec<Rect>> {
        extract_bounding_boxes(self.labels.view(), self.label_count, policy)
    }
}

/// Running `(min_x, min_y, max_x, max_y)` of one label.
type Bounds = (usize, usize, usize, usize);

/// One bounding rectangle per label `1..=label_count`, in label order.
///
/// Pixels carrying a label above `label_count` are ignored.
///
/// # Errors
/// [`ScanError::EmptyLabel`] for the first label without pixels when `policy`
/// is [`LabelPolicy::Fail`].
///
/// # Examples
/// ```rust
/// use ndarray::arr2;
/// use slider::bbox::{extract_bounding_boxes, LabelPolicy};
///
/// let labels = arr2(&[
///     [0, 1, 1],
///     [0, 1, 0],
///     [2, 0, 0],
/// ]);
/// let boxes = extract_bounding_boxes(labels.view(), 2, LabelPolicy::Skip).unwrap();
///
/// assert_eq!((boxes[0].left(), boxes[0].top()), (1, 0));
/// assert_eq!((boxes[0].right(), boxes[0].bottom()), (2, 1));
/// assert_eq!(boxes[1].area(), 0);
/// ```
pub fn extract_bounding_boxes(
    labels: ArrayView2<u32>,
    label_count: u32,
    policy: LabelPolicy,
) -> Result<Vec<Rect>> {
    // Only labels present in the grid get an entry
    let mut bounds: BTreeMap<u32, Bounds> = BTreeMap::new();

    for ((row, col), &label) in labels.indexed_iter() {
        if label == 0 || label > label_count {
            continue;
        }
        bounds
            .entry(label)
            .and_modify(|(min_x, min_y, max_x, max_y)| {
                *min_x = (*min_x).min(col);
                *min_y = (*min_y).min(row);
                *max_x = (*max_x).max(col);
                *max_y = (*max_y).max(row);
            })
            .or_insert((col, row, col, row));
    }

    let missing = label_count as usize - bounds.len();
    if missing > 0 {
        match policy {
            LabelPolicy::Skip => warn!(
                "{} of {} labels have no pixels, skipping",
                missing, label_count
            ),
            LabelPolicy::Fail => return Err(ScanError::EmptyLabel(first_missing(&bounds))),
        }
    }

    bounds
        .values()
        .map(|&(min_x, min_y, max_x, max_y)| {
            Rect::from_edges(min_x as i64, min_y as i64, max_x as i64, max_y as i64)
        })
        .collect()
}

/// Smallest label `>= 1` absent from `bounds`.
fn first_missing(bounds: &BTreeMap<u32, Bounds>) -> u32 {
    let mut expected = 1;
    for &label in bounds.keys() {
        if label != expected {
            break;
        }
        expected += 1;
    }
    expected
}
