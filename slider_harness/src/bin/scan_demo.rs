//! Synthetic multi-scale scan demo
//!
//! Builds a scan plan, classifies every window against known target boxes,
//! and writes the detections (and optionally the heatmap) as PNG images.
//!
//! # Usage
//!
//! ```bash
//! # Road-scene preset with two default targets
//! cargo run --release --bin scan_demo -- --output detections.png
//!
//! # Custom plan and targets
//! cargo run --release --bin scan_demo -- --config scan.json \
//!     --target 300,420,460,540 --target 820,400,980,520 \
//!     --threshold 3 --heatmap-output heat.png
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use log::info;
use slider::config::ScanConfig;
use slider::geometry::Rect;
use slider::image_size::ImageSize;
use slider_harness::classifier::OverlapClassifier;
use slider_harness::pipeline::{run_scan, ScanSettings};
use slider_harness::render::{clipped_rect, draw_boxes, heatmap_to_gray_image, PixelBounds};

const DEFAULT_TARGETS: [&str; 2] = ["300,420,460,540", "820,400,980,520"];

/// Parse a target box given as "left,top,right,bottom"
fn parse_target(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 4 {
        return Err("Target must be in format 'left,top,right,bottom'".to_string());
    }

    let mut edges = [0i64; 4];
    for (edge, part) in edges.iter_mut().zip(&parts) {
        *edge = part
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("Invalid coordinate '{}'", part.trim()))?;
    }

    Rect::from_edges(edges[0], edges[1], edges[2], edges[3])
        .map_err(|e| format!("Invalid target: {}", e))
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scan configuration JSON; the road-scene preset is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long, default_value_t = 1280)]
    width: usize,

    /// Image height in pixels
    #[arg(long, default_value_t = 720)]
    height: usize,

    /// Override the number of scan partitions
    #[arg(short, long)]
    partitions: Option<usize>,

    /// Heatmap pixels must exceed this many positive windows
    #[arg(short, long, default_value_t = 2)]
    threshold: u32,

    /// Fraction of a window that must overlap a target to count as positive
    #[arg(long, default_value_t = 0.5)]
    min_overlap: f64,

    /// Ground-truth target box "left,top,right,bottom" (repeatable)
    #[arg(long = "target", value_parser = parse_target)]
    targets: Vec<Rect>,

    /// Output image with detections drawn
    #[arg(short, long, default_value = "scan_detections.png")]
    output: PathBuf,

    /// Optional grayscale heatmap output
    #[arg(long)]
    heatmap_output: Option<PathBuf>,
}

fn synthetic_scene(size: ImageSize, targets: &[Rect]) -> RgbImage {
    let (width, height) = (size.width as u32, size.height as u32);
    let mut scene = RgbImage::from_pixel(width, height, Rgb([90, 90, 90]));
    for target in targets {
        if let Some(rect) = clipped_rect(target.pixel_bounds(), width, height) {
            draw_filled_rect_mut(&mut scene, rect, Rgb([40, 60, 160]));
        }
    }
    scene
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ScanConfig::load_from_file(path)
            .with_context(|| format!("Failed to load scan config {}", path.display()))?,
        None => ScanConfig::vehicle_search(),
    };
    if let Some(n) = args.partitions {
        config.n_partitions = n;
    }

    let targets = if args.targets.is_empty() {
        DEFAULT_TARGETS
            .iter()
            .map(|s| parse_target(s).map_err(anyhow::Error::msg))
            .collect::<Result<Vec<_>>>()?
    } else {
        args.targets.clone()
    };

    let plan = config.build_window_set().context("Invalid scan plan")?;
    info!(
        "Plan: {} scales, {} windows ({} scheduled) over {} partitions",
        plan.scale_count(),
        plan.total_windows(),
        plan.scheduled_windows(),
        plan.n_partitions()
    );

    let size = ImageSize::from_width_height(args.width, args.height);
    let classifier = OverlapClassifier::new(targets, args.min_overlap);
    info!(
        "Classifying against {} targets at minimum overlap {}",
        classifier.targets().len(),
        classifier.min_overlap()
    );
    let settings = ScanSettings::new(size, args.threshold).with_label_policy(config.label_policy);
    let report = run_scan(&plan, &classifier, &settings)?;

    println!("Positive windows: {}", report.positives.len());
    println!("Peak heat: {}", report.heatmap.max());
    println!("Detections: {}", report.detection_count());
    for (i, bbox) in report.boxes.iter().enumerate() {
        println!("  {}: {}", i + 1, bbox);
    }

    let scene = synthetic_scene(size, classifier.targets());
    let annotated = draw_boxes(&scene, &report.boxes, Rgb([255, 0, 0]), 4);
    annotated
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("Wrote detections to {}", args.output.display());

    if let Some(path) = &args.heatmap_output {
        heatmap_to_gray_image(&report.heatmap)
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote heatmap to {}", path.display());
    }

    Ok(())
}
