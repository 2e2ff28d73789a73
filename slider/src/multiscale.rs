//! Multi-scale scan plans.
//!
//! [`PartitionedWindows`] pairs window generation with partitioning for one
//! scale. [`MultiScaleWindowSet`] builds one such pair per scale and merges
//! them partition by partition, so worker `i` receives every scale's share
//! of partition `i` in one list. Both are built eagerly and are immutable
//! afterwards, which makes them safe to share across scan workers.

use log::{debug, info};

use crate::error::{Result, ScanError};
use crate::generator::{generate_windows, ScaleSpec};
use crate::geometry::{Window, WindowList};
use crate::partition::{partition_windows, PartitionOptions, PartitionSet};

/// Windows of a single scale together with their partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionedWindows {
    windows: WindowList,
    partitions: PartitionSet,
}

impl PartitionedWindows {
    /// Generate and partition the windows of `spec`.
    ///
    /// Options are validated before any window is generated.
    pub fn build(spec: &ScaleSpec, options: &PartitionOptions) -> Result<Self> {
        options.validate()?;
        let windows = generate_windows(spec)?;
        let partitions = partition_windows(&windows, options)?;
        Ok(Self {
            windows,
            partitions,
        })
    }

    /// All generated windows in row-major order.
    pub fn all_windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn partition(&self, index: usize) -> Result<&[Window]> {
        self.partitions.get(index)
    }

    pub fn partitions(&self) -> &PartitionSet {
        &self.partitions
    }

    pub fn n_partitions(&self) -> usize {
        self.partitions.len()
    }
}

/// Precomputed per-partition window lists across several scales.
///
/// # Examples
/// ```rust
/// use slider::generator::ScaleSpec;
/// use slider::multiscale::MultiScaleWindowSet;
/// use slider::partition::PartitionOptions;
///
/// let scales = vec![
///     ScaleSpec::new((0, 100), (0, 100), (50, 50), (0.5, 0.5)),
///     ScaleSpec::new((0, 100), (0, 100), (20, 20), (0.5, 0.5)),
/// ];
/// let set = MultiScaleWindowSet::build(&scales, &PartitionOptions::new(2)).unwrap();
///
/// assert_eq!(set.n_partitions(), 2);
/// assert!(set.windows_for_partition(1).is_ok());
/// assert!(set.windows_for_partition(2).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiScaleWindowSet {
    partitions: Vec<WindowList>,
    scale_window_counts: Vec<usize>,
}

impl MultiScaleWindowSet {
    /// Build every scale and concatenate partition `i` across scales in scale order.
    ///
    /// # Errors
    /// The first validation error of any scale or of `options`; nothing is
    /// returned for a partially valid configuration.
    pub fn build(scales: &[ScaleSpec], options: &PartitionOptions) -> Result<Self> {
        options.validate()?;

        let per_scale = scales
            .iter()
            .map(|spec| PartitionedWindows::build(spec, options))
            .collect::<Result<Vec<_>>>()?;

        let mut partitions = vec![Vec::new(); options.n_partitions];
        for scale in &per_scale {
            for (merged, part) in partitions.iter_mut().zip(scale.partitions().iter()) {
                merged.extend_from_slice(part);
            }
        }

        let scale_window_counts: Vec<usize> =
            per_scale.iter().map(|s| s.all_windows().len()).collect();

        for (index, windows) in partitions.iter().enumerate() {
            debug!("Partition {}: {} windows", index, windows.len());
        }
        info!(
            "Built scan plan: {} scales, {} windows, {} partitions",
            scales.len(),
            scale_window_counts.iter().sum::<usize>(),
            options.n_partitions
        );

        Ok(Self {
            partitions,
            scale_window_counts,
        })
    }

    /// Windows assigned to partition `index`.
    ///
    /// # Errors
    /// [`ScanError::PartitionIndexOutOfRange`] if `index >= n_partitions()`.
    pub fn windows_for_partition(&self, index: usize) -> Result<&[Window]> {
        self.partitions
            .get(index)
            .map(Vec::as_slice)
            .ok_or(ScanError::PartitionIndexOutOfRange {
                index,
                n_partitions: self.partitions.len(),
            })
    }

    pub fn n_partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn scale_count(&self) -> usize {
        self.scale_window_counts.len()
    }

    /// Number of windows generated for each scale, before partitioning.
    pub fn scale_window_counts(&self) -> &[usize] {
        &self.scale_window_counts
    }

    /// Distinct windows generated across all scales.
    pub fn total_windows(&self) -> usize {
        self.scale_window_counts.iter().sum()
    }

    /// Windows handed out across all partitions, counting seam duplicates.
    pub fn scheduled_windows(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::PartitionExtent;

    fn scales() -> Vec<ScaleSpec> {
        vec![
            ScaleSpec::new((0, 400), (0, 200), (100, 100), (0.5, 0.5)),
            ScaleSpec::new((100, 300), (50, 150), (50, 50), (0.5, 0.5)),
        ]
    }

    #[test]
    fn test_partitioned_windows_single_scale() {
        let spec = ScaleSpec::new((0, 100), (0, 100), (50, 50), (0.5, 0.5));
        let pw = PartitionedWindows::build(&spec, &PartitionOptions::new(1)).unwrap();
        assert_eq!(pw.all_windows().len(), 9);
        assert_eq!(pw.partition(0).unwrap(), pw.all_windows());
        assert!(pw.partition(1).is_err());
        assert_eq!(pw.n_partitions(), 1);
    }

    #[test]
    fn test_partitions_concatenate_in_scale_order() {
        let specs = scales();
        let options = PartitionOptions::new(3);
        let set = MultiScaleWindowSet::build(&specs, &options).unwrap();

        let first = PartitionedWindows::build(&specs[0], &options).unwrap();
        let second = PartitionedWindows::build(&specs[1], &options).unwrap();

        for index in 0..3 {
            let mut expected = first.partition(index).unwrap().to_vec();
            expected.extend_from_slice(second.partition(index).unwrap());
            assert_eq!(set.windows_for_partition(index).unwrap(), expected.as_slice());
        }

        assert_eq!(set.scale_count(), 2);
        assert_eq!(
            set.scale_window_counts(),
            &[first.all_windows().len(), second.all_windows().len()]
        );
        assert!(set.scheduled_windows() >= set.total_windows());
    }

    #[test]
    fn test_single_partition_holds_everything() {
        let specs = scales();
        let set = MultiScaleWindowSet::build(&specs, &PartitionOptions::new(1)).unwrap();

        let mut expected = Vec::new();
        for spec in &specs {
            expected.extend(generate_windows(spec).unwrap());
        }
        assert_eq!(set.windows_for_partition(0).unwrap(), expected.as_slice());
        assert_eq!(set.total_windows(), expected.len());
        assert_eq!(set.scheduled_windows(), expected.len());
    }

    #[test]
    fn test_out_of_range_partition() {
        let set = MultiScaleWindowSet::build(&scales(), &PartitionOptions::new(4)).unwrap();
        assert!(matches!(
            set.windows_for_partition(4),
            Err(ScanError::PartitionIndexOutOfRange {
                index: 4,
                n_partitions: 4
            })
        ));
    }

    #[test]
    fn test_invalid_scale_fails_whole_build() {
        let mut specs = scales();
        specs[1].overlap = (1.5, 0.5);
        assert!(MultiScaleWindowSet::build(&specs, &PartitionOptions::new(2)).is_err());
        assert!(MultiScaleWindowSet::build(&scales(), &PartitionOptions::new(0)).is_err());
    }

    #[test]
    fn test_no_scales() {
        let set = MultiScaleWindowSet::build(&[], &PartitionOptions::new(2)).unwrap();
        assert_eq!(set.n_partitions(), 2);
        assert!(set.windows_for_partition(0).unwrap().is_empty());
        assert_eq!(set.total_windows(), 0);
    }

    #[test]
    fn test_extent_mode_is_applied_per_scale() {
        let specs = vec![ScaleSpec::new((600, 1000), (0, 100), (100, 100), (0.5, 0.5))];
        let seeded = MultiScaleWindowSet::build(&specs, &PartitionOptions::new(4)).unwrap();
        let tight = MultiScaleWindowSet::build(
            &specs,
            &PartitionOptions::new(4).with_extent(PartitionExtent::FromWindows),
        )
        .unwrap();

        assert!(seeded.windows_for_partition(0).unwrap().is_empty());
        assert!(!tight.windows_for_partition(0).unwrap().is_empty());
    }
}
