// Thermal and electrical panel model
pub mod power;
pub mod thermal;

// Cooling decisions (live and synthetic-label)
pub mod decision;
pub mod synthetic;

// Observations, samples, region catalog
pub mod regions;
pub mod types;
