// Panel physics and cooling decisions
pub mod cooling;

// Physical constants and label policy
pub mod config;

// Feature registry and evaluation metrics
pub mod ml;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
