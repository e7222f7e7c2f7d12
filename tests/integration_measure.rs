//! Integration tests for six-view measurement.
//!
//! Synthetic walnut folders are written to a temp directory and measured
//! through the public API:
//! - Round silhouettes measure the same on every axis
//! - Implausible views are ignored
//! - Debug mode writes the four intermediate images per view

use assert_fs::prelude::*;
use assert_fs::TempDir;
use image::{GrayImage, Luma};
use predicates::prelude::*;
use std::path::Path;
use walnut_pair::core::config::AlgorithmConfig;
use walnut_pair::core::measure::{DebugStep, SixViewEstimator};
use walnut_pair::core::scanner::{ScanConfig, WalkDirScanner};
use walnut_pair::core::Side;
use walnut_pair::error::{DimensionError, WalnutPairError};

/// Dark `size`x`size` square centred on a bright 200x200 frame.
///
/// At the default camera (300 mm, 1000 px) one pixel is 0.3 mm and the
/// square measures `(size - 1) * 0.3` mm.
fn write_view(path: &Path, size: u32) {
    let start = (200 - size) / 2;
    let span = start..start + size;
    GrayImage::from_fn(200, 200, |x, y| {
        if span.contains(&x) && span.contains(&y) {
            Luma([40])
        } else {
            Luma([220])
        }
    })
    .save(path)
    .unwrap();
}

fn write_object(temp: &TempDir, id: &str, size_for: impl Fn(Side) -> u32) {
    let dir = temp.child(id);
    dir.create_dir_all().unwrap();
    for side in Side::ALL {
        write_view(dir.child(format!("{}_{}.png", id, side)).path(), size_for(side));
    }
}

fn measure(temp: &TempDir, id: &str, config: &AlgorithmConfig) -> walnut_pair::Result<walnut_pair::core::DimensionValue> {
    let folder = WalkDirScanner::new(ScanConfig::default()).scan_object_dir(temp.child(id).path())?;
    let mut object = folder.load(config.camera)?;
    let estimator = SixViewEstimator::new(&config.measure, config.camera);
    object.estimate_dimensions(&estimator)
}

#[test]
fn round_walnut_measures_equal_axes() {
    let temp = TempDir::new().unwrap();
    write_object(&temp, "W001", |_| 121);

    let dimensions = measure(&temp, "W001", &AlgorithmConfig::default()).unwrap();

    assert!((dimensions.length_mm() - 36.0).abs() < 1e-6);
    assert!((dimensions.width_mm() - 36.0).abs() < 1e-6);
    assert!((dimensions.height_mm() - 36.0).abs() < 1e-6);
}

#[test]
fn oversized_view_is_ignored() {
    let temp = TempDir::new().unwrap();
    // 180 px fills 90% of the frame, above the 0.8 plausibility bound
    write_object(&temp, "W002", |side| if side == Side::Top { 180 } else { 121 });

    let dimensions = measure(&temp, "W002", &AlgorithmConfig::default()).unwrap();

    assert!((dimensions.length_mm() - 36.0).abs() < 1e-6);
    assert!((dimensions.width_mm() - 36.0).abs() < 1e-6);
}

#[test]
fn tiny_walnut_is_rejected() {
    let temp = TempDir::new().unwrap();
    write_object(&temp, "W003", |_| 61);

    let error = measure(&temp, "W003", &AlgorithmConfig::default()).unwrap_err();
    assert!(matches!(
        error,
        WalnutPairError::Dimension(DimensionError::OutOfRange { .. })
    ));
}

#[test]
fn debug_mode_writes_intermediate_images() {
    let temp = TempDir::new().unwrap();
    write_object(&temp, "W004", |_| 121);

    let mut config = AlgorithmConfig::default();
    config.measure.save_intermediate = true;
    measure(&temp, "W004", &config).unwrap();

    let intermediate = temp.child("W004").child("_intermediate");
    intermediate.assert(predicate::path::is_dir());
    for side in Side::ALL {
        for step in DebugStep::ALL {
            intermediate
                .child(format!("W004_{side}_intermediate_{}_{side}.png", step.code()))
                .assert(predicate::path::is_file());
        }
    }
}

#[test]
fn debug_images_are_not_written_by_default() {
    let temp = TempDir::new().unwrap();
    write_object(&temp, "W005", |_| 121);

    measure(&temp, "W005", &AlgorithmConfig::default()).unwrap();

    temp.child("W005")
        .child("_intermediate")
        .assert(predicate::path::missing());
}

#[test]
fn unreadable_view_fails_the_object() {
    let temp = TempDir::new().unwrap();
    write_object(&temp, "W006", |_| 121);
    temp.child("W006/W006_left.png").write_str("not a png").unwrap();

    let result = measure(&temp, "W006", &AlgorithmConfig::default());
    assert!(matches!(result, Err(WalnutPairError::Decode(_))));
}
