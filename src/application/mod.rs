// Labeled dataset construction
pub mod dataset;

// Classifier training and inference
pub mod ml;

// Physics vs. model comparison for a place and hour
pub mod cooling_advisor;
