//! Multi-scale sliding-window scan planning and detection aggregation.
//!
//! The crate plans a scan and condenses its results; it does not classify
//! image patches itself. A typical flow:
//!
//! 1. Describe each scale with a [`ScaleSpec`] and build a
//!    [`MultiScaleWindowSet`] once.
//! 2. Hand [`MultiScaleWindowSet::windows_for_partition`] to independent
//!    workers, each running its own classifier.
//! 3. Fold the positive windows into a [`Heatmap`], threshold it, label the
//!    mask, and turn the labels into boxes with [`extract_bounding_boxes`].

pub mod bbox;
pub mod config;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod heatmap;
pub mod image_size;
pub mod multiscale;
pub mod partition;

pub use bbox::{extract_bounding_boxes, LabelMap, LabelPolicy};
pub use config::ScanConfig;
pub use error::{Result, ScanError};
pub use generator::{generate_windows, ScaleSpec};
pub use geometry::{Point, Rect, Window, WindowList};
pub use heatmap::{aggregate_heatmap, Heatmap};
pub use image_size::ImageSize;
pub use multiscale::{MultiScaleWindowSet, PartitionedWindows};
pub use partition::{partition_windows, PartitionExtent, PartitionOptions, PartitionSet};
