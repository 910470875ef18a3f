use rand::SeedableRng;
use rand::rngs::StdRng;
use solarcool::application::dataset::{
    ClassCounts, DatasetAssembler, DatasetSummary, balance_classes,
};
use solarcool::application::ml::{
    CoolingPredictor, ModelTrainer, ModelVerdict, SmartCorePredictor, TrainedClassifier,
    TrainingConfig,
};
use solarcool::domain::config::{LabelProfile, SyntheticLabelConfig, SystemConstants};
use solarcool::domain::ports::HourlyRecord;
use solarcool::infrastructure::persistence::{
    LABELED_DATASET_FILE, load_observations, raw_data_path, read_labeled_dataset,
    write_labeled_dataset, write_region_records,
};

/// Ten clear-sky summer days for one region.
fn synthetic_region(base_temp: f64, peak_irradiance: f64) -> Vec<HourlyRecord> {
    let mut records = Vec::new();
    for day in 1..=10u64 {
        for hour in 0..24u64 {
            let g = if (6..=19).contains(&hour) {
                let x = (hour as f64 - 13.0) / 7.0;
                peak_irradiance * (1.0 - x * x).max(0.0)
            } else {
                0.0
            };
            let t = base_temp + 6.0 * (1.0 - ((hour as f64 - 15.0) / 9.0).powi(2)).max(0.0);
            records.push(HourlyRecord {
                timestamp_key: 2022_06_00_00 + day * 100 + hour,
                irradiance_wm2: g,
                ambient_temp_c: t,
            });
        }
    }
    records
}

#[test]
fn test_raw_files_to_trained_model() {
    let dir = tempfile::tempdir().unwrap();
    write_region_records(
        &raw_data_path(dir.path(), "phoenix"),
        &synthetic_region(32.0, 1050.0),
    )
    .unwrap();
    write_region_records(
        &raw_data_path(dir.path(), "seattle"),
        &synthetic_region(12.0, 650.0),
    )
    .unwrap();

    let observations = load_observations(dir.path(), &["phoenix", "seattle"]).unwrap();
    assert_eq!(observations.len(), 2 * 10 * 24);

    let constants = SystemConstants::default();
    let assembler = DatasetAssembler::new(constants, SyntheticLabelConfig::default());
    let mut rng = StdRng::seed_from_u64(42);
    let samples = assembler.build(&observations, &mut rng);
    assert_eq!(samples.len(), observations.len());

    let summary = DatasetSummary::from_samples(&samples);
    let counts = ClassCounts::of(&samples);
    assert!(counts.positive > 0, "hot desert midday should need cooling");
    assert!(counts.negative > counts.positive);
    assert!(
        summary.regions["phoenix"].cooling_hours > summary.regions["seattle"].cooling_hours
    );

    let labeled_path = dir.path().join(LABELED_DATASET_FILE);
    write_labeled_dataset(&labeled_path, &samples).unwrap();
    let reloaded = read_labeled_dataset(&labeled_path).unwrap();
    assert_eq!(ClassCounts::of(&reloaded), counts);

    let balanced = balance_classes(reloaded, &mut rng).unwrap();
    let after = ClassCounts::of(&balanced);
    assert_eq!(after.positive, after.negative);
    assert_eq!(balanced.len(), 2 * counts.negative);

    let config = TrainingConfig {
        n_trees: 20,
        ..TrainingConfig::default()
    };
    let outcome = ModelTrainer::new(config).train(&balanced).unwrap();
    let report = outcome.report.expect("held-out split");
    assert!(report.accuracy > 0.6);

    let model_path = dir.path().join("models").join("cooling_model.json");
    outcome.classifier.save(&model_path).unwrap();
    let restored = TrainedClassifier::load(&model_path).unwrap();
    assert_eq!(restored.feature_names(), outcome.classifier.feature_names());

    let predictor = SmartCorePredictor::new(model_path, constants);
    assert!(predictor.is_available());
    assert!(matches!(
        predictor.predict(5.0, 0.0, 2).unwrap(),
        ModelVerdict::Predicted(false)
    ));
}

#[test]
fn test_high_irradiance_profile_prefilters() {
    let dir = tempfile::tempdir().unwrap();
    write_region_records(
        &raw_data_path(dir.path(), "tucson"),
        &synthetic_region(30.0, 1000.0),
    )
    .unwrap();
    let observations = load_observations(dir.path(), &["tucson"]).unwrap();

    let config = SyntheticLabelConfig::for_profile(LabelProfile::HighIrradiance);
    let assembler = DatasetAssembler::new(SystemConstants::default(), config);
    let samples = assembler.build_parallel(&observations, 7);

    let kept = observations
        .iter()
        .filter(|o| o.irradiance_wm2() > 600.0)
        .count();
    assert_eq!(samples.len(), kept);
    assert!(samples.len() < observations.len());

    // Same seed, same labels regardless of thread scheduling
    let again = assembler.build_parallel(&observations, 7);
    assert_eq!(samples, again);
}

#[test]
fn test_missing_model_is_soft_failure() {
    let dir = tempfile::tempdir().unwrap();
    let predictor =
        SmartCorePredictor::new(dir.path().join("absent.json"), SystemConstants::default());
    assert!(!predictor.is_available());
    let verdict = predictor.predict(30.0, 800.0, 13).unwrap();
    assert!(verdict.prediction().is_none());
}
