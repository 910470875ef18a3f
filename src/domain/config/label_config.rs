use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed interval a hysteresis value is drawn from uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Standard deviations of the simulated measurement chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorNoise {
    pub irradiance_sigma_wm2: f64, // Pyranometer
    pub ambient_sigma_c: f64,      // Thermocouple
    pub panel_sigma_c: f64,        // IR sensor
    pub max_wind_speed_ms: f64,
    pub wind_cooling_c_per_ms: f64,
}

impl Default for SensorNoise {
    fn default() -> Self {
        Self {
            irradiance_sigma_wm2: 15.0,
            ambient_sigma_c: 0.5,
            panel_sigma_c: 2.0,
            max_wind_speed_ms: 5.0,
            wind_cooling_c_per_ms: 0.3,
        }
    }
}

impl SensorNoise {
    /// No noise and no wind: synthetic labels collapse onto the physics.
    pub fn none() -> Self {
        Self {
            irradiance_sigma_wm2: 0.0,
            ambient_sigma_c: 0.0,
            panel_sigma_c: 0.0,
            max_wind_speed_ms: 0.0,
            wind_cooling_c_per_ms: 0.0,
        }
    }
}

/// Named presets matching the two dataset generators that existed historically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelProfile {
    /// Multi-region generator: 46-50°C threshold band, 20% economic margin.
    Regional,
    /// Training-focused generator: 44-48°C band, 0.8x margin, >600 W/m² rows only.
    HighIrradiance,
}

impl fmt::Display for LabelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regional => write!(f, "regional"),
            Self::HighIrradiance => write!(f, "high_irradiance"),
        }
    }
}

impl FromStr for LabelProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "regional" => Ok(Self::Regional),
            "high_irradiance" => Ok(Self::HighIrradiance),
            _ => anyhow::bail!(
                "Invalid label profile: {}. Must be 'regional' or 'high_irradiance'",
                s
            ),
        }
    }
}

/// Parameters of the synthetic-label decision (noise, hysteresis, margin, flips).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticLabelConfig {
    pub noise: SensorNoise,
    pub threshold_band_c: Band,
    pub target_band_c: Band,
    pub min_irradiance_wm2: f64, // Activation floor, strict
    pub margin: f64,             // Gain must exceed cost x margin
    pub false_positive_rate: f64,
    pub false_negative_rate: f64,
    /// Rows at or below this irradiance are dropped before labeling.
    pub prefilter_irradiance_wm2: Option<f64>,
}

impl Default for SyntheticLabelConfig {
    fn default() -> Self {
        Self::for_profile(LabelProfile::Regional)
    }
}

impl SyntheticLabelConfig {
    pub fn for_profile(profile: LabelProfile) -> Self {
        match profile {
            LabelProfile::Regional => Self {
                noise: SensorNoise::default(),
                threshold_band_c: Band::new(46.0, 50.0),
                target_band_c: Band::new(36.0, 40.0),
                min_irradiance_wm2: 100.0,
                margin: 1.2,
                false_positive_rate: 0.03,
                false_negative_rate: 0.05,
                prefilter_irradiance_wm2: None,
            },
            LabelProfile::HighIrradiance => Self {
                noise: SensorNoise::default(),
                threshold_band_c: Band::new(44.0, 48.0),
                target_band_c: Band::new(36.0, 40.0),
                min_irradiance_wm2: 100.0,
                margin: 0.8,
                false_positive_rate: 0.03,
                false_negative_rate: 0.05,
                prefilter_irradiance_wm2: Some(600.0),
            },
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, band) in [
            ("threshold_band_c", self.threshold_band_c),
            ("target_band_c", self.target_band_c),
        ] {
            if !(band.low <= band.high) {
                return Err(format!("Invalid {}: [{}, {}]", name, band.low, band.high));
            }
        }
        for (name, p) in [
            ("false_positive_rate", self.false_positive_rate),
            ("false_negative_rate", self.false_negative_rate),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("Invalid {}: {}", name, p));
            }
        }
        if !(self.margin >= 0.0) || self.margin.is_infinite() {
            return Err(format!("Invalid margin: {}", self.margin));
        }
        let n = &self.noise;
        if n.irradiance_sigma_wm2 < 0.0
            || n.ambient_sigma_c < 0.0
            || n.panel_sigma_c < 0.0
            || n.max_wind_speed_ms < 0.0
        {
            return Err("Sensor noise parameters must be non-negative".to_string());
        }
        Ok(())
    }
}
