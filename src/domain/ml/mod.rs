// Feature ordering shared by training and inference
pub mod feature_registry;

// Classification metrics
pub mod metrics;
