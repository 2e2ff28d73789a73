//! End-to-end scan: classify every scheduled window in parallel, then
//! condense the positives into bounding boxes.

use std::collections::HashSet;

use log::{debug, info};
use rayon::prelude::*;
use slider::bbox::{LabelMap, LabelPolicy};
use slider::error::Result;
use slider::geometry::{Rect, Window, WindowList};
use slider::heatmap::{aggregate_heatmap, Heatmap};
use slider::image_size::ImageSize;
use slider::multiscale::MultiScaleWindowSet;

use crate::classifier::WindowClassifier;
use crate::labeling::connected_components;

/// Post-processing settings for one scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSettings {
    pub image_size: ImageSize,
    /// Heatmap pixels must exceed this count to count as detected
    pub heat_threshold: u32,
    pub label_policy: LabelPolicy,
}

impl ScanSettings {
    pub fn new(image_size: ImageSize, heat_threshold: u32) -> Self {
        Self {
            image_size,
            heat_threshold,
            label_policy: LabelPolicy::default(),
        }
    }

    pub fn with_label_policy(mut self, label_policy: LabelPolicy) -> Self {
        self.label_policy = label_policy;
        self
    }
}

/// Everything a scan produced, from raw positives to final boxes.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Positive windows found by each partition worker, seam duplicates included
    pub partition_positive_counts: Vec<usize>,
    /// Distinct positive windows in partition order
    pub positives: WindowList,
    pub heatmap: Heatmap,
    pub labels: LabelMap,
    pub boxes: Vec<Rect>,
}

impl ScanReport {
    pub fn detection_count(&self) -> usize {
        self.boxes.len()
    }
}

/// Run `classifier` over every partition of `plan` and aggregate the result.
///
/// Partitions are scanned on the rayon pool, one task per partition. Windows
/// near a partition seam are scheduled more than once; each distinct window
/// contributes to the heatmap exactly once.
///
/// # Errors
/// Propagates [`slider::ScanError::EmptyLabel`] under [`LabelPolicy::Fail`].
pub fn run_scan<C>(
    plan: &MultiScaleWindowSet,
    classifier: &C,
    settings: &ScanSettings,
) -> Result<ScanReport>
where
    C: WindowClassifier + ?Sized,
{
    let per_partition = (0..plan.n_partitions())
        .into_par_iter()
        .map(|index| {
            let windows = plan.windows_for_partition(index)?;
            let positives: WindowList = windows
                .iter()
                .filter(|window| classifier.is_positive(window))
                .copied()
                .collect();
            debug!(
                "Partition {}: {} of {} windows positive",
                index,
                positives.len(),
                windows.len()
            );
            Ok(positives)
        })
        .collect::<Result<Vec<WindowList>>>()?;

    let partition_positive_counts = per_partition.iter().map(Vec::len).collect();
    let positives = merge_positives(per_partition);

    let heatmap = aggregate_heatmap(settings.image_size, &positives);
    let mask = heatmap.threshold(settings.heat_threshold);
    let labels = connected_components(mask.view());
    let boxes = labels.bounding_boxes(settings.label_policy)?;

    info!(
        "Scan complete: {} positive windows, peak heat {}, {} detections",
        positives.len(),
        heatmap.max(),
        boxes.len()
    );

    Ok(ScanReport {
        partition_positive_counts,
        positives,
        heatmap,
        labels,
        boxes,
    })
}

/// Concatenate per-partition positives, keeping the first occurrence of each window.
fn merge_positives(per_partition: Vec<WindowList>) -> WindowList {
    let mut seen: HashSet<Window> = HashSet::new();
    per_partition
        .into_iter()
        .flatten()
        .filter(|window| seen.insert(*window))
        .collect()
}
