//! Overlap-preserving partitioning of a window list along the x axis.
//!
//! The horizontal extent of the windows is cut into `n` equal slices of width
//! `dx`. Partition `s` accepts every window whose left edge lies in
//!
//! ```text
//! [min_x + s * dx, min_x + (s + 1 + overlap_fraction) * dx]
//! ```
//!
//! so neighbouring partitions share a band of windows near their seam and a
//! detection straddling the seam is fully scanned by at least one worker.
//! A window can therefore appear in several partitions. Windows are never
//! reordered: each partition keeps the input order.
//!
//! The extent is seeded at the origin by default, meaning `min_x` never rises
//! above zero even when every window sits far to the right. That shifts the
//! partition seams and can leave leading partitions empty. It is kept as the
//! default for compatibility with existing scan plans; use
//! [`PartitionExtent::FromWindows`] to span exactly the windows instead.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};
use crate::geometry::{Window, WindowList};

/// Overlap between adjacent partitions, as a fraction of one slice width.
pub const DEFAULT_PARTITION_OVERLAP: f64 = 0.5;

/// How the coordinate extent used to place partition seams is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionExtent {
    /// Min/max start at zero, so the extent always includes the origin.
    #[default]
    SeededAtOrigin,
    /// Min/max over the window edges only.
    FromWindows,
}

/// Partitioning parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionOptions {
    pub n_partitions: usize,
    pub overlap_fraction: f64,
    pub extent: PartitionExtent,
}

impl PartitionOptions {
    pub fn new(n_partitions: usize) -> Self {
        Self {
            n_partitions,
            overlap_fraction: DEFAULT_PARTITION_OVERLAP,
            extent: PartitionExtent::default(),
        }
    }

    pub fn with_overlap_fraction(mut self, overlap_fraction: f64) -> Self {
        self.overlap_fraction = overlap_fraction;
        self
    }

    pub fn with_extent(mut self, extent: PartitionExtent) -> Self {
        self.extent = extent;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_partitions == 0 {
            return Err(ScanError::InvalidPartitionCount(self.n_partitions));
        }
        if !self.overlap_fraction.is_finite() || self.overlap_fraction < 0.0 {
            return Err(ScanError::InvalidPartitionOverlap(self.overlap_fraction));
        }
        Ok(())
    }
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Bounding extent of a window list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Extent {
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
}

impl Extent {
    fn seed(value: i64) -> Self {
        Self {
            min_x: value,
            min_y: value,
            max_x: value,
            max_y: value,
        }
    }

    fn include(mut self, window: &Window) -> Self {
        self.min_x = self.min_x.min(window.left());
        self.min_y = self.min_y.min(window.top());
        self.max_x = self.max_x.max(window.right());
        self.max_y = self.max_y.max(window.bottom());
        self
    }

    fn of(windows: &[Window], mode: PartitionExtent) -> Self {
        match mode {
            PartitionExtent::SeededAtOrigin => {
                windows.iter().fold(Self::seed(0), |e, w| e.include(w))
            }
            PartitionExtent::FromWindows => match windows.first() {
                Some(first) => {
                    let initial = Self {
                        min_x: first.left(),
                        min_y: first.top(),
                        max_x: first.right(),
                        max_y: first.bottom(),
                    };
                    windows.iter().fold(initial, |e, w| e.include(w))
                }
                None => Self::seed(0),
            },
        }
    }
}

/// Ordered partitions of a window list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSet {
    partitions: Vec<WindowList>,
}

impl PartitionSet {
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Windows of partition `index`.
    ///
    /// # Errors
    /// [`ScanError::PartitionIndexOutOfRange`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&[Window]> {
        self.partitions
            .get(index)
            .map(Vec::as_slice)
            .ok_or(ScanError::PartitionIndexOutOfRange {
                index,
                n_partitions: self.partitions.len(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Window]> {
        self.partitions.iter().map(Vec::as_slice)
    }

    /// Concatenate all partitions in order, keeping duplicates.
    pub fn flatten(&self) -> WindowList {
        self.partitions.iter().flatten().copied().collect()
    }
}

/// Split `windows` into `options.n_partitions` overlapping groups.
///
/// # Errors
/// [`ScanError::InvalidPartitionCount`] for zero partitions and
/// [`ScanError::InvalidPartitionOverlap`] for a negative or non-finite overlap.
///
/// # Examples
/// ```rust
/// use slider::generator::{generate_windows, ScaleSpec};
/// use slider::partition::{partition_windows, PartitionOptions};
///
/// let spec = ScaleSpec::new((0, 100), (0, 100), (50, 50), (0.5, 0.5));
/// let windows = generate_windows(&spec).unwrap();
///
/// let single = partition_windows(&windows, &PartitionOptions::new(1)).unwrap();
/// assert_eq!(single.flatten(), windows);
/// ```
pub fn partition_windows(windows: &[Window], options: &PartitionOptions) -> Result<PartitionSet> {
    options.validate()?;

    let extent = Extent::of(windows, options.extent);
    let n = options.n_partitions;
    let dx = (extent.max_x - extent.min_x) as f64 / n as f64;
    let min_x = extent.min_x as f64;

    debug!(
        "Partitioning {} windows into {} slices over x [{}, {}] y [{}, {}], dx {:.3}",
        windows.len(),
        n,
        extent.min_x,
        extent.max_x,
        extent.min_y,
        extent.max_y,
        dx
    );

    let partitions = (0..n)
        .map(|step| {
            let lower = min_x + step as f64 * dx;
            let upper = min_x + (step as f64 + 1.0 + options.overlap_fraction) * dx;
            let members: WindowList = windows
                .iter()
                .filter(|w| {
                    let left = w.left() as f64;
                    left >= lower && left <= upper
                })
                .copied()
                .collect();
            trace!(
                "Partition {}: left edge in [{:.3}, {:.3}], {} windows",
                step,
                lower,
                upper,
                members.len()
            );
            members
        })
        .collect();

    Ok(PartitionSet { partitions })
}
