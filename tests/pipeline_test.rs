use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use env_logger::{Builder, Env};
use image::{DynamicImage, Rgb, RgbImage};
use oralscan::report::{NO_FINDINGS_SUMMARY, SEVERE_STEPS};
use oralscan::{
    Classifier, ClassifierInfo, DiseaseClass, FixedClassifier, FixedRegionEstimator, ImageTensor,
    ProbabilityVector, ScanError, ScanPipeline, Severity, ToothRegion,
};

fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

fn pipeline(scores: Vec<f32>) -> ScanPipeline {
    ScanPipeline::builder()
        .with_classifier(FixedClassifier::new(scores).expect("valid scores"))
        .build()
        .expect("Failed to build pipeline")
}

fn sample_image() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(320, 240, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 200])
    }))
}

#[test]
fn test_cavity_scan_is_severe() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let outcome = pipeline(vec![0.1, 0.85, 0.05, 0.05, 0.05, 0.05, 0.05]).analyze_image(&sample_image())?;

    let detected = &outcome.detection.detected;
    assert_eq!(detected.len(), 1);
    assert_eq!(detected[0].disease, DiseaseClass::Cavity);
    assert_eq!(detected[0].confidence, 0.85);
    assert!(ToothRegion::ALL.contains(&detected[0].region));

    let report = &outcome.report;
    assert_eq!(report.severity, Severity::Severe);
    assert_eq!(report.summary, "Likely cavity detected.");
    assert!(report
        .recommendations
        .contains(&"Schedule a filling appointment within 2 weeks".to_string()));
    assert_eq!(report.next_steps, SEVERE_STEPS);
    Ok(())
}

#[test]
fn test_normal_scan_is_reassuring() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let outcome = pipeline(vec![0.9, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).analyze_image(&sample_image())?;

    assert!(outcome.detection.detected.is_empty());
    assert_eq!(outcome.report.severity, Severity::Normal);
    assert_eq!(outcome.report.summary, NO_FINDINGS_SUMMARY);
    assert!(outcome.report.detected_conditions.is_empty());
    Ok(())
}

#[test]
fn test_mean_of_exactly_point_six_is_mild() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let outcome = pipeline(vec![0.0, 0.0, 0.65, 0.55, 0.0, 0.0, 0.0]).analyze_image(&sample_image())?;

    assert_eq!(outcome.detection.labels, vec!["Plaque", "Gum Inflammation"]);
    assert_eq!(outcome.detection.severity, Severity::Mild);
    assert_eq!(outcome.report.summary, "Likely plaque and gum inflammation detected.");
    Ok(())
}

#[test]
fn test_scan_from_file() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("scan.png");
    sample_image().save(&path)?;

    let pipeline = ScanPipeline::builder()
        .with_classifier(FixedClassifier::new(vec![0.2, 0.0, 0.7, 0.0, 0.0, 0.0, 0.0])?)
        .with_region_estimator(Arc::new(FixedRegionEstimator(ToothRegion::MolarL2)))
        .build()?;
    let outcome = pipeline.analyze_path(&path)?;

    assert_eq!(outcome.report.severity, Severity::Moderate);
    assert_eq!(outcome.report.detected_conditions[0].region, ToothRegion::MolarL2);
    Ok(())
}

#[test]
fn test_non_image_file_is_decode_error() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("notes.jpg");
    std::fs::write(&path, "this is plain text")?;

    let result = pipeline(vec![0.0; 7]).analyze_path(&path);
    assert!(matches!(result, Err(ScanError::Decode(_))));
    Ok(())
}

#[test]
fn test_missing_classifier_fails_fast() {
    let result = ScanPipeline::builder().build();
    assert!(matches!(result, Err(ScanError::ModelNotLoaded(_))));
}

struct UnloadedClassifier;

impl Classifier for UnloadedClassifier {
    fn classify(&self, _tensor: &ImageTensor) -> Result<ProbabilityVector, ScanError> {
        Err(ScanError::ModelNotLoaded("no weights".into()))
    }

    fn info(&self) -> ClassifierInfo {
        ClassifierInfo::new("unloaded", false)
    }
}

#[test]
fn test_unloaded_classifier_is_rejected() {
    let result = ScanPipeline::builder().with_classifier(UnloadedClassifier).build();
    assert!(matches!(result, Err(ScanError::ModelNotLoaded(_))));
}

struct ShortOutputClassifier;

impl Classifier for ShortOutputClassifier {
    fn classify(&self, _tensor: &ImageTensor) -> Result<ProbabilityVector, ScanError> {
        ProbabilityVector::new(vec![0.5; 5])
    }

    fn info(&self) -> ClassifierInfo {
        ClassifierInfo::new("short", true)
    }
}

#[test]
fn test_malformed_classifier_output_fails_whole_scan() {
    let pipeline = ScanPipeline::builder().with_classifier(ShortOutputClassifier).build().unwrap();
    let result = pipeline.analyze_image(&sample_image());
    assert!(matches!(result, Err(ScanError::InvalidOutput(_))));
}

#[test]
fn test_batch_keeps_order_and_isolates_failures() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dir = tempfile::tempdir()?;
    let good = dir.path().join("good.png");
    sample_image().save(&good)?;
    let bad = dir.path().join("bad.png");
    std::fs::write(&bad, [0u8; 32])?;
    let missing = dir.path().join("missing.png");

    let paths: Vec<PathBuf> = vec![good.clone(), bad, missing, good];
    let results = pipeline(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.9]).analyze_batch(&paths);

    assert_eq!(results.len(), 4);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(ScanError::Decode(_))));
    assert!(matches!(results[2], Err(ScanError::Io(_))));
    let last = results[3].as_ref().unwrap();
    assert_eq!(last.detection.detected[0].disease, DiseaseClass::Ulcer);
    Ok(())
}

#[test]
fn test_thread_safety() {
    let pipeline = Arc::new(pipeline(vec![0.1, 0.5, 0.6, 0.0, 0.0, 0.0, 0.0]));
    let mut handles = vec![];

    for _ in 0..4 {
        let pipeline = Arc::clone(&pipeline);
        handles.push(thread::spawn(move || {
            let outcome = pipeline.analyze_image(&sample_image()).unwrap();
            assert_eq!(outcome.detection.detected.len(), 2);
            for condition in &outcome.detection.detected {
                assert!(ToothRegion::ALL.contains(&condition.region));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_report_json_shape() -> Result<(), Box<dyn std::error::Error>> {
    let outcome = pipeline(vec![0.1, 0.85, 0.05, 0.05, 0.05, 0.05, 0.05]).analyze_image(&sample_image())?;
    let value: serde_json::Value = serde_json::from_str(&outcome.report.to_json()?)?;

    for key in ["summary", "detected_conditions", "recommendations", "nutritional_deficiencies", "severity", "next_steps"] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(value["severity"], "severe");
    assert_eq!(value["detected_conditions"][0]["name"], "cavity");
    Ok(())
}
