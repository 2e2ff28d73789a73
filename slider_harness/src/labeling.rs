//! Connected-component labeling of thresholded heatmaps.

use ndarray::{Array2, ArrayView2};
use slider::bbox::LabelMap;

/// 8-connectivity neighbor offsets as (dy, dx)
const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Label 8-connected regions of `true` pixels.
///
/// Labels are assigned `1..=label_count` in row-major order of each region's
/// first pixel; background stays 0.
///
/// # Examples
/// ```rust
/// use ndarray::arr2;
/// use slider_harness::labeling::connected_components;
///
/// let mask = arr2(&[
///     [true, false, false],
///     [false, true, false],
///     [false, false, false],
/// ]);
/// let labels = connected_components(mask.view());
/// assert_eq!(labels.label_count(), 1);
/// ```
pub fn connected_components(mask: ArrayView2<bool>) -> LabelMap {
    let (rows, cols) = mask.dim();
    let mut labels = Array2::<u32>::zeros((rows, cols));
    let mut label_count = 0;

    for ((row, col), &set) in mask.indexed_iter() {
        if !set || labels[[row, col]] != 0 {
            continue;
        }
        label_count += 1;
        labels[[row, col]] = label_count;
        let mut stack = vec![(row, col)];

        while let Some((y, x)) = stack.pop() {
            for &(dy, dx) in &NEIGHBORS {
                let ny = y as isize + dy;
                let nx = x as isize + dx;
                if ny < 0 || nx < 0 || ny >= rows as isize || nx >= cols as isize {
                    continue;
                }
                let (ny, nx) = (ny as usize, nx as usize);
                if mask[[ny, nx]] && labels[[ny, nx]] == 0 {
                    labels[[ny, nx]] = label_count;
                    stack.push((ny, nx));
                }
            }
        }
    }

    LabelMap::new(labels, label_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use slider::bbox::LabelPolicy;
    use slider::geometry::Rect;

    #[test]
    fn test_empty_mask() {
        let mask = Array2::<bool>::from_elem((4, 4), false);
        let labels = connected_components(mask.view());
        assert_eq!(labels.label_count(), 0);
        assert!(labels.labels().iter().all(|&l| l == 0));
    }

    #[test]
    fn test_separate_regions() {
        let mask = arr2(&[
            [true, true, false, false, false],
            [true, true, false, false, false],
            [false, false, false, false, false],
            [false, false, false, true, true],
        ]);
        let labels = connected_components(mask.view());

        let expected: Array2<u32> = arr2(&[
            [1, 1, 0, 0, 0],
            [1, 1, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 2, 2],
        ]);
        assert_eq!(labels.label_count(), 2);
        assert_eq!(labels.labels(), expected);
    }

    #[test]
    fn test_diagonal_neighbors_join() {
        let mask = arr2(&[
            [true, false, false],
            [false, true, false],
            [false, false, true],
        ]);
        let labels = connected_components(mask.view());
        assert_eq!(labels.label_count(), 1);
    }

    #[test]
    fn test_u_shape_is_one_region() {
        let mask = arr2(&[
            [true, false, true],
            [true, false, true],
            [true, true, true],
        ]);
        let labels = connected_components(mask.view());
        assert_eq!(labels.label_count(), 1);
        assert_eq!(
            labels.bounding_boxes(LabelPolicy::Fail).unwrap(),
            vec![Rect::from_edges(0, 0, 2, 2).unwrap()]
        );
    }

    #[test]
    fn test_labels_feed_bounding_boxes() {
        let mut mask = Array2::<bool>::from_elem((10, 12), false);
        mask.slice_mut(ndarray::s![1..3, 1..4]).fill(true);
        mask.slice_mut(ndarray::s![6..9, 7..11]).fill(true);

        let labels = connected_components(mask.view());
        let boxes = labels.bounding_boxes(LabelPolicy::Fail).unwrap();
        assert_eq!(
            boxes,
            vec![
                Rect::from_edges(1, 1, 3, 2).unwrap(),
                Rect::from_edges(7, 6, 10, 8).unwrap(),
            ]
        );
    }
}
