//! Steady-state panel temperature from the NOCT approximation.
//!
//! `T_panel = T_ambient + (NOCT - 20) / 800 * G`
//!
//! Wind is ignored here; the synthetic labeler applies its own wind offset.

use crate::domain::config::PanelSpec;

/// NOCT rating conditions: 20°C ambient, 800 W/m² irradiance.
pub const NOCT_AMBIENT_C: f64 = 20.0;
pub const NOCT_IRRADIANCE_WM2: f64 = 800.0;

/// Temperature rise per W/m² for a panel with the given NOCT.
pub fn heating_coefficient(noct_c: f64) -> f64 {
    (noct_c - NOCT_AMBIENT_C) / NOCT_IRRADIANCE_WM2
}

pub fn panel_temperature(ambient_temp_c: f64, irradiance_wm2: f64, noct_c: f64) -> f64 {
    ambient_temp_c + heating_coefficient(noct_c) * irradiance_wm2
}

/// `panel_temperature` using the panel's configured NOCT.
pub fn panel_temperature_for(panel: &PanelSpec, ambient_temp_c: f64, irradiance_wm2: f64) -> f64 {
    panel_temperature(ambient_temp_c, irradiance_wm2, panel.noct_c)
}
