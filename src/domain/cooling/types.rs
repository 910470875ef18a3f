use crate::domain::errors::ObservationError;
use serde::{Deserialize, Serialize};

/// Clamps an irradiance reading to a usable value.
/// Negative and NaN readings (night-time offsets, sensor faults) become zero.
pub fn sanitize_irradiance(irradiance_wm2: f64) -> f64 {
    if irradiance_wm2.is_nan() || irradiance_wm2 < 0.0 {
        0.0
    } else {
        irradiance_wm2
    }
}

/// One hour of raw weather for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    region_id: String,
    hour_of_day: u32,
    ambient_temp_c: f64,
    irradiance_wm2: f64,
}

impl WeatherObservation {
    /// Irradiance is stored as received; consumers clamp it at the point of use.
    pub fn new(
        region_id: impl Into<String>,
        hour_of_day: u32,
        ambient_temp_c: f64,
        irradiance_wm2: f64,
    ) -> Result<Self, ObservationError> {
        let region_id = region_id.into();
        if hour_of_day > 23 {
            return Err(ObservationError::HourOutOfRange { hour: hour_of_day });
        }
        if !ambient_temp_c.is_finite() {
            return Err(ObservationError::InvalidTemperature {
                region: region_id,
                value: ambient_temp_c,
            });
        }
        Ok(Self {
            region_id,
            hour_of_day,
            ambient_temp_c,
            irradiance_wm2,
        })
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    pub fn hour_of_day(&self) -> u32 {
        self.hour_of_day
    }

    pub fn ambient_temp_c(&self) -> f64 {
        self.ambient_temp_c
    }

    /// Raw irradiance, possibly negative.
    pub fn irradiance_wm2(&self) -> f64 {
        self.irradiance_wm2
    }

    pub fn clamped_irradiance_wm2(&self) -> f64 {
        sanitize_irradiance(self.irradiance_wm2)
    }
}

/// Derived thermal/electrical state of the panel for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelState {
    pub panel_temp_c: f64,
    pub uncooled_power_w: f64,
    pub cooled_power_w: f64,
}

/// Outcome of the cooling decision for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoolingDecision {
    pub energy_gain_w: f64,
    pub cooling_cost_w: f64,
    pub should_cool: bool,
}

impl CoolingDecision {
    /// Decision for an observation that never reached the activation gate.
    pub fn inactive() -> Self {
        Self {
            energy_gain_w: 0.0,
            cooling_cost_w: 0.0,
            should_cool: false,
        }
    }

    pub fn net_gain_w(&self) -> f64 {
        self.energy_gain_w - self.cooling_cost_w
    }
}

/// Feature row the classifier is trained and queried on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub ambient_temp_c: f64,
    pub irradiance_wm2: f64,
    pub panel_temp_c: f64,
    pub hour_of_day: u32,
}

/// A labeled row of the training corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub region_id: String,
    pub features: FeatureVector,
    pub decision: CoolingDecision,
}

impl TrainingSample {
    pub fn label(&self) -> bool {
        self.decision.should_cool
    }
}
