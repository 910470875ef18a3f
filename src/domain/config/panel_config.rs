use serde::{Deserialize, Serialize};

/// Error type for physical constant validation
#[derive(Debug, thiserror::Error)]
pub enum ConstantsError {
    #[error("Invalid panel constants: {0}")]
    Panel(String),

    #[error("Invalid pump constants: {0}")]
    Pump(String),
}

/// Photovoltaic panel constants (FSP-100M datasheet values by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSpec {
    pub area_m2: f64,          // 0.63 m x 0.45 m
    pub eta_ref: f64,          // Reference efficiency at 25°C
    pub beta_per_c: f64,       // Efficiency loss per °C above reference
    pub reference_temp_c: f64, // STC cell temperature
    pub noct_c: f64,           // Nominal Operating Cell Temperature
    pub cooling_target_c: f64, // Temperature the cooling loop brings the panel to
}

impl Default for PanelSpec {
    fn default() -> Self {
        Self {
            area_m2: 0.63 * 0.45,
            eta_ref: 0.18,
            beta_per_c: 0.005,
            reference_temp_c: 25.0,
            noct_c: 45.0,
            cooling_target_c: 35.0,
        }
    }
}

/// Water pump driving the cooling loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpSpec {
    pub rated_power_w: f64,
    pub efficiency: f64,
    pub flow_rate_l_min: f64,
    pub min_runtime_min: f64,
}

impl Default for PumpSpec {
    fn default() -> Self {
        Self {
            rated_power_w: 2.0,
            efficiency: 0.85,
            flow_rate_l_min: 25.0,
            min_runtime_min: 6.0,
        }
    }
}

impl PumpSpec {
    /// Electrical draw of the pump while running (W).
    pub fn power_draw_w(&self) -> f64 {
        self.rated_power_w / self.efficiency
    }
}

/// Every physical constant the thermal, power and decision models need.
///
/// One value of this struct is built at startup and passed by reference into
/// every core function, so training and inference can never disagree on a
/// constant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConstants {
    pub panel: PanelSpec,
    pub pump: PumpSpec,
}

impl SystemConstants {
    pub fn validate(&self) -> Result<(), ConstantsError> {
        let p = &self.panel;
        if p.area_m2 <= 0.0 {
            return Err(ConstantsError::Panel(format!("area_m2 = {}", p.area_m2)));
        }
        if !(0.0..=1.0).contains(&p.eta_ref) {
            return Err(ConstantsError::Panel(format!("eta_ref = {}", p.eta_ref)));
        }
        if p.beta_per_c < 0.0 {
            return Err(ConstantsError::Panel(format!(
                "beta_per_c = {}",
                p.beta_per_c
            )));
        }
        if p.noct_c <= 20.0 {
            return Err(ConstantsError::Panel(format!(
                "noct_c must exceed the 20°C NOCT reference, got {}",
                p.noct_c
            )));
        }
        if self.pump.rated_power_w < 0.0 {
            return Err(ConstantsError::Pump(format!(
                "rated_power_w = {}",
                self.pump.rated_power_w
            )));
        }
        if self.pump.efficiency <= 0.0 || self.pump.efficiency > 1.0 {
            return Err(ConstantsError::Pump(format!(
                "efficiency = {}",
                self.pump.efficiency
            )));
        }
        Ok(())
    }
}
