//! Scan configuration and JSON persistence.
//!
//! A [`ScanConfig`] bundles the scale list with partitioning and labeling
//! choices so a whole scan plan can be kept in one file:
//!
//! ```json
//! {
//!   "scales": [
//!     {"x_range": [0, 1280], "y_range": [360, 740], "window_size": [192, 192], "overlap": [0.85, 0.85]}
//!   ],
//!   "n_partitions": 32,
//!   "partition_overlap_fraction": 0.5,
//!   "partition_extent": "seeded_at_origin",
//!   "label_policy": "skip"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::bbox::LabelPolicy;
use crate::error::Result;
use crate::generator::ScaleSpec;
use crate::multiscale::MultiScaleWindowSet;
use crate::partition::{PartitionExtent, PartitionOptions, DEFAULT_PARTITION_OVERLAP};

fn default_n_partitions() -> usize {
    1
}

fn default_partition_overlap() -> f64 {
    DEFAULT_PARTITION_OVERLAP
}

/// Complete description of a multi-scale scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Scales in scan order
    pub scales: Vec<ScaleSpec>,
    /// Number of independent scan partitions
    #[serde(default = "default_n_partitions")]
    pub n_partitions: usize,
    /// Forward overlap of each partition, as a fraction of one partition width
    #[serde(default = "default_partition_overlap")]
    pub partition_overlap_fraction: f64,
    #[serde(default)]
    pub partition_extent: PartitionExtent,
    #[serde(default)]
    pub label_policy: LabelPolicy,
}

impl ScanConfig {
    pub fn new(scales: Vec<ScaleSpec>, n_partitions: usize) -> Self {
        Self {
            scales,
            n_partitions,
            partition_overlap_fraction: DEFAULT_PARTITION_OVERLAP,
            partition_extent: PartitionExtent::default(),
            label_policy: LabelPolicy::default(),
        }
    }

    /// Road-scene search ranges for a 1280x720 dash camera.
    ///
    /// Large windows cover the near road, small windows only the band around
    /// the horizon where distant vehicles appear.
    pub fn vehicle_search() -> Self {
        let overlap = (0.85, 0.85);
        Self::new(
            vec![
                ScaleSpec::new((0, 1280), (360, 740), (192, 192), overlap),
                ScaleSpec::new((0, 1280), (360, 740), (160, 160), overlap),
                ScaleSpec::new((0, 1280), (360, 700), (128, 128), overlap),
                ScaleSpec::new((200, 1200), (360, 550), (96, 96), overlap),
                ScaleSpec::new((200, 1200), (360, 500), (64, 64), overlap),
            ],
            32,
        )
    }

    pub fn partition_options(&self) -> PartitionOptions {
        PartitionOptions::new(self.n_partitions)
            .with_overlap_fraction(self.partition_overlap_fraction)
            .with_extent(self.partition_extent)
    }

    /// Build the precomputed window set described by this config.
    pub fn build_window_set(&self) -> Result<MultiScaleWindowSet> {
        MultiScaleWindowSet::build(&self.scales, &self.partition_options())
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
