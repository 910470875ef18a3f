pub mod classifier;
pub mod predictor;
pub mod trainer;

pub use classifier::TrainedClassifier;
pub use predictor::{CoolingPredictor, ModelVerdict, SmartCorePredictor};
pub use trainer::{ModelTrainer, TrainingConfig, TrainingOutcome};
