use crate::domain::cooling::types::FeatureVector;
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::features_to_row;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

pub type Forest = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Hyper-parameters recorded alongside a fitted forest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: u16,
    pub max_depth: u16,
    pub min_samples_split: usize,
    pub seed: u64,
}

/// A fitted forest plus the feature order it was trained on.
///
/// Read-only after construction; inference always assembles rows in
/// `feature_names` order.
#[derive(Serialize, Deserialize)]
pub struct TrainedClassifier {
    feature_names: Vec<String>,
    params: ForestParams,
    trained_at: DateTime<Utc>,
    training_samples: usize,
    model: Forest,
}

impl std::fmt::Debug for TrainedClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedClassifier")
            .field("feature_names", &self.feature_names)
            .field("params", &self.params)
            .field("trained_at", &self.trained_at)
            .field("training_samples", &self.training_samples)
            .finish_non_exhaustive()
    }
}

pub(crate) fn to_matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>, ModelError> {
    DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| ModelError::Matrix(e.to_string()))
}

impl TrainedClassifier {
    pub fn new(
        feature_names: Vec<String>,
        params: ForestParams,
        training_samples: usize,
        model: Forest,
    ) -> Self {
        Self {
            feature_names,
            params,
            trained_at: Utc::now(),
            training_samples,
            model,
        }
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn training_samples(&self) -> usize {
        self.training_samples
    }

    /// Row for `fv` in this model's stored feature order.
    pub fn row_for(&self, fv: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        features_to_row(fv, &self.feature_names).map_err(|name| ModelError::UnknownFeature { name })
    }

    /// Predicts raw rows that are already in `feature_names` order.
    pub fn predict_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<bool>, ModelError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let x = to_matrix(rows)?;
        let labels = self
            .model
            .predict(&x)
            .map_err(|e| ModelError::Prediction(e.to_string()))?;
        Ok(labels.into_iter().map(|l| l == 1).collect())
    }

    pub fn predict(&self, fv: &FeatureVector) -> Result<bool, ModelError> {
        let row = self.row_for(fv)?;
        self.predict_rows(&[row])?
            .first()
            .copied()
            .ok_or_else(|| ModelError::Prediction("No prediction returned".to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ModelError::Io(e.to_string()))?;
        }
        let file = File::create(path).map_err(|e| ModelError::Io(e.to_string()))?;
        serde_json::to_writer(BufWriter::new(file), self)
            .map_err(|e| ModelError::Serialization(e.to_string()))?;
        info!("Saved model ({} features) to {:?}", self.feature_names.len(), path);
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound {
                path: path.display().to_string(),
            });
        }
        let file = File::open(path).map_err(|e| ModelError::Io(e.to_string()))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| ModelError::Serialization(format!("Failed to deserialize model: {}", e)))
    }
}
