//! End-to-end scans: plan -> parallel classification -> heatmap -> labels -> boxes -> images

use image::{Rgb, RgbImage};
use slider::bbox::LabelPolicy;
use slider::config::ScanConfig;
use slider::generator::ScaleSpec;
use slider::geometry::Rect;
use slider::image_size::ImageSize;
use slider::partition::PartitionExtent;
use slider_harness::classifier::OverlapClassifier;
use slider_harness::pipeline::{run_scan, ScanSettings};
use slider_harness::render::{draw_boxes, heatmap_to_gray_image};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn square_target_config(n_partitions: usize) -> ScanConfig {
    ScanConfig::new(
        vec![ScaleSpec::new((0, 400), (0, 300), (50, 50), (0.5, 0.5))],
        n_partitions,
    )
}

fn square_target() -> OverlapClassifier {
    OverlapClassifier::new(vec![Rect::from_edges(100, 100, 200, 200).unwrap()], 0.5)
}

#[test]
fn test_single_target_yields_one_box() {
    init_logging();
    let plan = square_target_config(1).build_window_set().unwrap();
    let settings = ScanSettings::new(ImageSize::from_width_height(400, 300), 1);

    let report = run_scan(&plan, &square_target(), &settings).unwrap();

    // 5 x 5 window starts around the target, minus the four half-covered corners
    assert_eq!(report.positives.len(), 21);
    // Interior pixels sit under 2 x 2 windows
    assert_eq!(report.heatmap.counts()[[150, 150]], 4);
    assert_eq!(report.heatmap.max(), 4);
    assert_eq!(report.boxes, vec![Rect::from_edges(75, 75, 224, 224).unwrap()]);
}

#[test]
fn test_result_is_independent_of_partitioning() {
    init_logging();
    let settings = ScanSettings::new(ImageSize::from_width_height(400, 300), 1);
    let baseline = run_scan(
        &square_target_config(1).build_window_set().unwrap(),
        &square_target(),
        &settings,
    )
    .unwrap();

    for n_partitions in [2, 5, 16] {
        for extent in [PartitionExtent::SeededAtOrigin, PartitionExtent::FromWindows] {
            let mut config = square_target_config(n_partitions);
            config.partition_extent = extent;
            let plan = config.build_window_set().unwrap();
            let report = run_scan(&plan, &square_target(), &settings).unwrap();

            assert_eq!(report.partition_positive_counts.len(), n_partitions);
            assert_eq!(report.heatmap, baseline.heatmap);
            assert_eq!(report.boxes, baseline.boxes);
        }
    }
}

#[test]
fn test_config_file_drives_scan() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.json");

    let mut config = square_target_config(3);
    config.label_policy = LabelPolicy::Fail;
    config.save_to_file(&path).unwrap();

    let loaded = ScanConfig::load_from_file(&path).unwrap();
    let plan = loaded.build_window_set().unwrap();
    let settings = ScanSettings::new(ImageSize::from_width_height(400, 300), 1)
        .with_label_policy(loaded.label_policy);

    let nothing = OverlapClassifier::new(vec![], 0.5);
    let report = run_scan(&plan, &nothing, &settings).unwrap();
    assert!(report.boxes.is_empty());

    let report = run_scan(&plan, &square_target(), &settings).unwrap();
    assert_eq!(report.detection_count(), 1);
}

#[test]
fn test_road_scene_preset_renders() {
    init_logging();
    let target = Rect::from_edges(300, 420, 460, 540).unwrap();
    let plan = ScanConfig::vehicle_search().build_window_set().unwrap();
    let size = ImageSize::from_width_height(1280, 720);
    let settings = ScanSettings::new(size, 2);

    let report = run_scan(&plan, &OverlapClassifier::new(vec![target], 0.5), &settings).unwrap();

    assert!(report.detection_count() >= 1);
    assert!(report
        .boxes
        .iter()
        .any(|bbox| bbox.overlap(&target).is_some()));

    let scene = RgbImage::new(1280, 720);
    let annotated = draw_boxes(&scene, &report.boxes, Rgb([255, 0, 0]), 4);
    let heat = heatmap_to_gray_image(&report.heatmap);
    assert_eq!(annotated.dimensions(), (1280, 720));
    assert_eq!(heat.dimensions(), (1280, 720));

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("detections.png");
    annotated.save(&out).unwrap();
    assert!(out.exists());
}
