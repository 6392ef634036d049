//! Integration tests: single-signature analysis on synthetic scans.

#![allow(clippy::unwrap_used)]

mod common;

use firma_pipeline::{AnalysisConfig, CanonicalKey, FirmaError, GrayImage, PhysicalSize};

#[test]
fn analysis_is_deterministic() {
    common::init_logging();
    let png = common::signature_png();
    let config = AnalysisConfig::default();
    let a = firma_pipeline::analyze(&png, common::PHYSICAL, &config).unwrap();
    let b = firma_pipeline::analyze(&png, common::PHYSICAL, &config).unwrap();
    assert_eq!(a.features, b.features);
    assert_eq!(a.descriptor, b.descriptor);
    assert_eq!(
        serde_json::to_string(&a.descriptor).unwrap(),
        serde_json::to_string(&b.descriptor).unwrap(),
    );
}

#[test]
fn every_feature_is_present_and_finite() {
    common::init_logging();
    let analysis =
        firma_pipeline::analyze(&common::signature_png(), common::PHYSICAL, &AnalysisConfig::default()).unwrap();
    for key in CanonicalKey::ALL {
        let value = analysis.descriptor.value(key).unwrap();
        if let Some(n) = value.as_f64() {
            assert!(n.is_finite(), "{} = {n}", key.as_str());
        }
    }
    let features = &analysis.features;
    assert!(!features.avg_spacing.is_neutral());
    assert!(!features.avg_asola_size.is_neutral());
    assert!(!features.pressure_mean.is_neutral());
    assert_eq!(features.connected_components.value(), 5);
    assert!((analysis.metadata.px_per_mm_x - 4.0).abs() < 1e-12);
}

#[test]
fn measurements_follow_the_calibration() {
    common::init_logging();
    let gray = common::signature();
    let config = AnalysisConfig::default();
    let k = 2.0;
    let small = firma_pipeline::analyze_gray(gray.clone(), common::PHYSICAL, &config).unwrap();
    let large = firma_pipeline::analyze_gray(gray, common::PHYSICAL.scaled(k), &config).unwrap();

    let ratio = |f: fn(&firma_pipeline::SignatureFeatures) -> f64| f(&large.features) / f(&small.features);
    assert!((ratio(|f| f.avg_spacing.value()) - k).abs() < 1e-9);
    assert!((ratio(|f| f.baseline_std_mm.value()) - k).abs() < 1e-9);
    assert!((ratio(|f| f.avg_asola_size.value()) - k * k).abs() < 1e-9);

    // Scale-free features do not move.
    assert!((small.features.proportion.value() - large.features.proportion.value()).abs() < 1e-9);
    assert!((small.features.pressure_mean.value() - large.features.pressure_mean.value()).abs() < 1e-12);
}

#[test]
fn blank_page_has_no_signature() {
    common::init_logging();
    let blank = GrayImage::from_pixel(common::WIDTH, common::HEIGHT, image::Luma([255]));
    let result = firma_pipeline::analyze(&common::encode_png(&blank), common::PHYSICAL, &AnalysisConfig::default());
    assert!(matches!(result, Err(FirmaError::NoSignature)));
}

#[test]
fn physical_size_is_mandatory() {
    let result = firma_pipeline::analyze(
        &common::signature_png(),
        PhysicalSize::new(0.0, 75.0),
        &AnalysisConfig::default(),
    );
    assert!(matches!(result, Err(FirmaError::InvalidCalibration { .. })));
}

#[test]
fn invalid_config_is_rejected() {
    let config = AnalysisConfig {
        curvature_stride: 0,
        ..AnalysisConfig::default()
    };
    let result = firma_pipeline::analyze(&common::signature_png(), common::PHYSICAL, &config);
    assert!(matches!(result, Err(FirmaError::InvalidConfig(_))));
}
