//! Scan harness around the `slider` core
//!
//! Supplies the collaborators the core leaves to its callers: a window
//! classifier boundary, a parallel scan runner, connected-component
//! labeling, and rendering of heatmaps and detections.

pub mod classifier;
pub mod labeling;
pub mod pipeline;
pub mod render;

pub use classifier::{OverlapClassifier, WindowClassifier};
pub use labeling::connected_components;
pub use pipeline::{run_scan, ScanReport, ScanSettings};
pub use render::{
    clipped_rect, draw_boxes, heatmap_to_gray_image, mask_to_gray_image, PixelBounds,
};
