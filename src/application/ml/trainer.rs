use crate::application::dataset::balancer::{ClassCounts, balance_classes};
use crate::application::ml::classifier::{ForestParams, TrainedClassifier, to_matrix};
use crate::domain::cooling::types::TrainingSample;
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::{FEATURE_NAMES, features_to_row};
use crate::domain::ml::metrics::EvaluationReport;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use tracing::{info, warn};

/// Fewer samples than this cannot give a meaningful 80/20 split.
pub const MIN_TRAINING_SAMPLES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub n_trees: u16,
    pub max_depth: u16,
    pub min_samples_split: usize,
    /// Share of each class held out for evaluation; 0 trains on everything.
    pub test_fraction: f64,
    pub seed: u64,
    /// Equalize class frequencies in the training split before fitting.
    pub class_balanced: bool,
    pub feature_names: Vec<String>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 2,
            test_fraction: 0.2,
            seed: 42,
            class_balanced: true,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug)]
pub struct TrainingOutcome {
    pub classifier: TrainedClassifier,
    pub report: Option<EvaluationReport>,
    pub train_size: usize,
    pub test_size: usize,
}

/// Splits samples so each label keeps its share in both halves.
/// Returns (train, test); both halves are shuffled.
pub fn stratified_split<'a>(
    samples: &'a [TrainingSample],
    test_fraction: f64,
    rng: &mut StdRng,
) -> (Vec<&'a TrainingSample>, Vec<&'a TrainingSample>) {
    let mut train = Vec::with_capacity(samples.len());
    let mut test = Vec::new();

    for label in [false, true] {
        let mut class: Vec<&TrainingSample> =
            samples.iter().filter(|s| s.label() == label).collect();
        class.shuffle(rng);
        let n_test = ((class.len() as f64) * test_fraction).round() as usize;
        let n_test = n_test.min(class.len());
        let rest = class.split_off(n_test);
        test.extend(class);
        train.extend(rest);
    }

    train.shuffle(rng);
    test.shuffle(rng);
    (train, test)
}

pub struct ModelTrainer {
    config: TrainingConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    fn rows(&self, samples: &[&TrainingSample]) -> Result<(Vec<Vec<f64>>, Vec<i32>), ModelError> {
        let mut x = Vec::with_capacity(samples.len());
        let mut y = Vec::with_capacity(samples.len());
        for s in samples {
            let row = features_to_row(&s.features, &self.config.feature_names)
                .map_err(|name| ModelError::UnknownFeature { name })?;
            x.push(row);
            y.push(i32::from(s.label()));
        }
        Ok((x, y))
    }

    pub fn train(&self, samples: &[TrainingSample]) -> Result<TrainingOutcome, ModelError> {
        if samples.len() < MIN_TRAINING_SAMPLES {
            return Err(ModelError::InsufficientData {
                need: MIN_TRAINING_SAMPLES,
                have: samples.len(),
            });
        }
        let counts = ClassCounts::of(samples);
        if counts.positive == 0 || counts.negative == 0 {
            return Err(ModelError::Training(format!(
                "Both labels are required, got {} negative / {} positive",
                counts.negative, counts.positive
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let (train, test) = stratified_split(samples, self.config.test_fraction, &mut rng);

        let train_set: Vec<TrainingSample> = if self.config.class_balanced {
            let owned = train.iter().map(|s| (*s).clone()).collect();
            balance_classes(owned, &mut rng).map_err(|e| ModelError::Training(e.to_string()))?
        } else {
            train.iter().map(|s| (*s).clone()).collect()
        };
        let train_refs: Vec<&TrainingSample> = train_set.iter().collect();
        let (x_train, y_train) = self.rows(&train_refs)?;

        let params = ForestParams {
            n_trees: self.config.n_trees,
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            seed: self.config.seed,
        };
        info!(
            "Training Random Forest Classifier (Trees: {}, Depth: {}, MinSplit: {}) on {} samples...",
            params.n_trees,
            params.max_depth,
            params.min_samples_split,
            x_train.len()
        );

        let forest_params = RandomForestClassifierParameters::default()
            .with_n_trees(params.n_trees.into())
            .with_max_depth(params.max_depth)
            .with_min_samples_split(params.min_samples_split)
            .with_seed(params.seed);
        let x_matrix = to_matrix(&x_train)?;
        let model = RandomForestClassifier::fit(&x_matrix, &y_train, forest_params)
            .map_err(|e| ModelError::Training(e.to_string()))?;

        let classifier = TrainedClassifier::new(
            self.config.feature_names.clone(),
            params,
            x_train.len(),
            model,
        );

        let report = if test.is_empty() {
            warn!("No hold-out split; skipping evaluation");
            None
        } else {
            let (x_test, y_test) = self.rows(&test)?;
            let predicted = classifier.predict_rows(&x_test)?;
            let actual: Vec<bool> = y_test.iter().map(|&l| l == 1).collect();
            let report = EvaluationReport::new(&actual, &predicted);
            info!(
                "Hold-out evaluation (n={}): accuracy {:.2}%, precision {:.3}, recall {:.3}",
                test.len(),
                report.accuracy * 100.0,
                report.precision,
                report.recall
            );
            Some(report)
        };

        Ok(TrainingOutcome {
            train_size: x_train.len(),
            test_size: test.len(),
            classifier,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cooling::types::{CoolingDecision, FeatureVector};

    /// Label is a clean function of panel temperature and irradiance.
    fn separable_corpus(n: usize) -> Vec<TrainingSample> {
        (0..n)
            .map(|i| {
                let hot = i % 2 == 0;
                let jitter = (i % 7) as f64;
                let irradiance = (if hot { 900.0 } else { 150.0 }) + jitter * 10.0;
                TrainingSample {
                    region_id: "test".to_string(),
                    features: FeatureVector {
                        ambient_temp_c: if hot { 38.0 + jitter } else { 12.0 + jitter },
                        irradiance_wm2: irradiance,
                        panel_temp_c: if hot { 65.0 + jitter } else { 18.0 + jitter },
                        hour_of_day: (i % 24) as u32,
                    },
                    decision: CoolingDecision {
                        energy_gain_w: if hot { 5.0 } else { 0.0 },
                        cooling_cost_w: if hot { 2.35 } else { 0.0 },
                        should_cool: hot,
                    },
                }
            })
            .collect()
    }

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            n_trees: 10,
            max_depth: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_stratified_split_preserves_ratio() {
        let mut samples = separable_corpus(100);
        // Drop most positives so the classes are unequal
        samples.retain(|s| !s.label() || s.features.ambient_temp_c < 41.0);
        let counts = ClassCounts::of(&samples);

        let mut rng = StdRng::seed_from_u64(42);
        let (train, test) = stratified_split(&samples, 0.2, &mut rng);

        assert_eq!(train.len() + test.len(), samples.len());
        let test_pos = test.iter().filter(|s| s.label()).count();
        let expected_pos = (counts.positive as f64 * 0.2).round() as usize;
        assert_eq!(test_pos, expected_pos);
    }

    #[test]
    fn test_split_is_reproducible() {
        let samples = separable_corpus(60);
        let (a, _) = stratified_split(&samples, 0.2, &mut StdRng::seed_from_u64(42));
        let (b, _) = stratified_split(&samples, 0.2, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_train_and_evaluate_separable() {
        let samples = separable_corpus(200);
        let outcome = ModelTrainer::new(small_config()).train(&samples).unwrap();

        assert_eq!(outcome.test_size, 40);
        let report = outcome.report.unwrap();
        assert!(report.accuracy > 0.95, "accuracy = {}", report.accuracy);
        assert_eq!(report.confusion.total(), 40);
        assert_eq!(
            outcome.classifier.feature_names(),
            &["ambient_temp_c", "irradiance_wm2", "panel_temp_c", "hour"]
        );
    }

    #[test]
    fn test_custom_feature_order_round_trips_through_predict() {
        let config = TrainingConfig {
            feature_names: vec![
                "hour".to_string(),
                "panel_temp_c".to_string(),
                "irradiance_wm2".to_string(),
                "ambient_temp_c".to_string(),
            ],
            ..small_config()
        };
        let outcome = ModelTrainer::new(config).train(&separable_corpus(200)).unwrap();
        let clf = outcome.classifier;

        let hot = FeatureVector {
            ambient_temp_c: 40.0,
            irradiance_wm2: 950.0,
            panel_temp_c: 68.0,
            hour_of_day: 13,
        };
        let cold = FeatureVector {
            ambient_temp_c: 13.0,
            irradiance_wm2: 160.0,
            panel_temp_c: 19.0,
            hour_of_day: 9,
        };
        assert!(clf.predict(&hot).unwrap());
        assert!(!clf.predict(&cold).unwrap());
        assert_eq!(clf.row_for(&hot).unwrap(), vec![13.0, 68.0, 950.0, 40.0]);
    }

    #[test]
    fn test_save_and_load_model() {
        let outcome = ModelTrainer::new(small_config()).train(&separable_corpus(100)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models/cooling_decision_model.json");

        outcome.classifier.save(&path).unwrap();
        let loaded = TrainedClassifier::load(&path).unwrap();

        assert_eq!(loaded.feature_names(), outcome.classifier.feature_names());
        assert_eq!(loaded.params(), outcome.classifier.params());
        let rows = vec![vec![40.0, 950.0, 68.0, 13.0], vec![13.0, 160.0, 19.0, 9.0]];
        assert_eq!(
            loaded.predict_rows(&rows).unwrap(),
            outcome.classifier.predict_rows(&rows).unwrap()
        );
    }

    #[test]
    fn test_load_missing_model_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrainedClassifier::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn test_load_corrupt_model_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = TrainedClassifier::load(&path).unwrap_err();
        assert!(matches!(err, ModelError::Serialization(_)));
    }

    #[test]
    fn test_single_class_rejected() {
        let samples: Vec<_> = separable_corpus(40).into_iter().filter(|s| s.label()).collect();
        let err = ModelTrainer::new(small_config()).train(&samples).unwrap_err();
        assert!(matches!(err, ModelError::Training(_)));
    }

    #[test]
    fn test_too_few_samples_rejected() {
        let err = ModelTrainer::new(small_config()).train(&separable_corpus(4)).unwrap_err();
        assert!(matches!(err, ModelError::InsufficientData { need: 10, have: 4 }));
    }

    #[test]
    fn test_unknown_feature_rejected() {
        let config = TrainingConfig {
            feature_names: vec!["wind_speed".to_string()],
            ..small_config()
        };
        let err = ModelTrainer::new(config).train(&separable_corpus(40)).unwrap_err();
        assert!(matches!(err, ModelError::UnknownFeature { .. }));
    }
}
