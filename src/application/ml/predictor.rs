use crate::application::ml::classifier::TrainedClassifier;
use crate::domain::config::SystemConstants;
use crate::domain::cooling::thermal::panel_temperature_for;
use crate::domain::cooling::types::{FeatureVector, sanitize_irradiance};
use crate::domain::errors::ModelError;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Result of asking the learned model. `Unavailable` is a soft condition: the
/// physics decision is still valid without it. Loading errors from
/// `TrainedClassifier::load` are folded into this variant and never surface
/// from `predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ModelVerdict {
    Predicted(bool),
    Unavailable(String),
}

impl ModelVerdict {
    pub fn prediction(&self) -> Option<bool> {
        match self {
            Self::Predicted(v) => Some(*v),
            Self::Unavailable(_) => None,
        }
    }
}

/// Interface for cooling classifiers
pub trait CoolingPredictor: Send + Sync {
    /// Predicts from raw weather; panel temperature is derived internally.
    fn predict(
        &self,
        ambient_temp_c: f64,
        irradiance_wm2: f64,
        hour: u32,
    ) -> Result<ModelVerdict, ModelError>;

    /// Get model name/type
    fn name(&self) -> &str;
}

pub struct SmartCorePredictor {
    model: Option<TrainedClassifier>,
    model_path: PathBuf,
    constants: SystemConstants,
    unavailable_reason: Option<String>,
}

impl SmartCorePredictor {
    /// Loads the model at `model_path`. A missing or unreadable file leaves the
    /// predictor in the unavailable state instead of failing.
    pub fn new(model_path: PathBuf, constants: SystemConstants) -> Self {
        let mut predictor = Self {
            model: None,
            model_path,
            constants,
            unavailable_reason: None,
        };
        predictor.load_model();
        predictor
    }

    pub fn from_classifier(classifier: TrainedClassifier, constants: SystemConstants) -> Self {
        Self {
            model: Some(classifier),
            model_path: PathBuf::new(),
            constants,
            unavailable_reason: None,
        }
    }

    fn load_model(&mut self) {
        match TrainedClassifier::load(&self.model_path) {
            Ok(model) => {
                info!(
                    "Successfully loaded ML model from {:?} (features: {:?})",
                    self.model_path,
                    model.feature_names()
                );
                self.model = Some(model);
            }
            Err(e) => {
                warn!("{}. Predictor will report the model as unavailable.", e);
                self.unavailable_reason = Some(e.to_string());
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn classifier(&self) -> Option<&TrainedClassifier> {
        self.model.as_ref()
    }
}

impl CoolingPredictor for SmartCorePredictor {
    fn predict(
        &self,
        ambient_temp_c: f64,
        irradiance_wm2: f64,
        hour: u32,
    ) -> Result<ModelVerdict, ModelError> {
        let Some(model) = &self.model else {
            return Ok(ModelVerdict::Unavailable(
                self.unavailable_reason
                    .clone()
                    .unwrap_or_else(|| "No trained classifier loaded".to_string()),
            ));
        };

        let g = sanitize_irradiance(irradiance_wm2);
        let features = FeatureVector {
            ambient_temp_c,
            irradiance_wm2: g,
            panel_temp_c: panel_temperature_for(&self.constants.panel, ambient_temp_c, g),
            hour_of_day: hour,
        };
        model.predict(&features).map(ModelVerdict::Predicted)
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}
