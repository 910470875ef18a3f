use crate::domain::config::PanelSpec;
use crate::domain::cooling::thermal::panel_temperature_for;
use crate::domain::cooling::types::{PanelState, sanitize_irradiance};

/// Temperature-derated conversion efficiency.
///
/// The linear model goes negative above ~225°C for default constants; that is
/// clamped to zero rather than reported.
pub fn efficiency(panel: &PanelSpec, panel_temp_c: f64) -> f64 {
    let eta = panel.eta_ref * (1.0 - panel.beta_per_c * (panel_temp_c - panel.reference_temp_c));
    eta.max(0.0)
}

/// Electrical output (W) of the panel at a given cell temperature.
pub fn power_output(panel: &PanelSpec, panel_temp_c: f64, irradiance_wm2: f64) -> f64 {
    efficiency(panel, panel_temp_c) * sanitize_irradiance(irradiance_wm2) * panel.area_m2
}

/// Panel temperature plus output with and without cooling to the target.
pub fn panel_state(panel: &PanelSpec, ambient_temp_c: f64, irradiance_wm2: f64) -> PanelState {
    let g = sanitize_irradiance(irradiance_wm2);
    let panel_temp_c = panel_temperature_for(panel, ambient_temp_c, g);

    PanelState {
        panel_temp_c,
        uncooled_power_w: power_output(panel, panel_temp_c, g),
        cooled_power_w: power_output(panel, panel.cooling_target_c, g),
    }
}
