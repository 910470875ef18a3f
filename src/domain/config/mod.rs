//! Configuration domain module
//!
//! Value objects holding the physical constants and the synthetic-label
//! policy. Both are passed explicitly into the core functions; nothing in the
//! domain reads globals.

pub mod label_config;
pub mod panel_config;

pub use label_config::{Band, LabelProfile, SensorNoise, SyntheticLabelConfig};
pub use panel_config::{ConstantsError, PanelSpec, PumpSpec, SystemConstants};
