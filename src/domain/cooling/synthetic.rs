//! Synthetic-label decision engine.
//!
//! Produces noisy, realistic labels for training by simulating the measurement
//! chain (pyranometer, thermocouple, IR panel sensor, wind), hysteresis on the
//! activation threshold and cooling target, and an imperfect pump controller.
//!
//! Random draws per observation, in order:
//! 1. irradiance noise, 2. ambient noise, 3. panel-sensor noise, 4. wind speed,
//! 5. activation threshold, 6. cooling target, 7. decision-noise roll.
//!
//! Callers own the random source; reusing one seeded stream over a whole batch
//! reproduces the batch exactly.

use crate::domain::config::{Band, SyntheticLabelConfig, SystemConstants};
use crate::domain::cooling::power::efficiency;
use crate::domain::cooling::thermal::heating_coefficient;
use crate::domain::cooling::types::{
    CoolingDecision, FeatureVector, TrainingSample, WeatherObservation, sanitize_irradiance,
};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// What the simulated sensors reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasuredConditions {
    pub ambient_temp_c: f64,
    pub irradiance_wm2: f64,
    pub panel_temp_c: f64,
    pub wind_speed_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntheticOutcome {
    pub measured: MeasuredConditions,
    pub threshold_c: f64,
    pub target_c: f64,
    /// Whether the activation gate (hot and sunny enough) held.
    pub gate_open: bool,
    /// Decision before controller noise.
    pub physics_should_cool: bool,
    /// Final decision, after controller noise.
    pub decision: CoolingDecision,
}

fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, sigma: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + sigma * z
}

/// Always consumes exactly one draw, so degenerate bands keep the stream aligned.
fn uniform<R: Rng + ?Sized>(rng: &mut R, band: Band) -> f64 {
    let u: f64 = rng.random();
    band.low + u * (band.high - band.low)
}

#[derive(Debug, Clone)]
pub struct SyntheticLabeler {
    constants: SystemConstants,
    config: SyntheticLabelConfig,
}

impl SyntheticLabeler {
    pub fn new(constants: SystemConstants, config: SyntheticLabelConfig) -> Self {
        Self { constants, config }
    }

    pub fn constants(&self) -> &SystemConstants {
        &self.constants
    }

    pub fn config(&self) -> &SyntheticLabelConfig {
        &self.config
    }

    /// Runs the measurement model, the gated decision and the decision noise.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        ambient_temp_c: f64,
        irradiance_wm2: f64,
        rng: &mut R,
    ) -> SyntheticOutcome {
        let noise = &self.config.noise;
        let panel = &self.constants.panel;

        let g_true = sanitize_irradiance(irradiance_wm2);
        let g_measured = gaussian(rng, g_true, noise.irradiance_sigma_wm2).max(0.0);
        let t_amb_measured = gaussian(rng, ambient_temp_c, noise.ambient_sigma_c);

        let panel_temp = t_amb_measured + heating_coefficient(panel.noct_c) * g_measured;
        let panel_temp_noisy = gaussian(rng, panel_temp, noise.panel_sigma_c);
        let wind_speed_ms = uniform(rng, Band::new(0.0, noise.max_wind_speed_ms));
        let panel_temp_measured = panel_temp_noisy - wind_speed_ms * noise.wind_cooling_c_per_ms;

        let threshold_c = uniform(rng, self.config.threshold_band_c);
        let target_c = uniform(rng, self.config.target_band_c);

        let gate_open =
            panel_temp_measured > threshold_c && g_measured > self.config.min_irradiance_wm2;

        let physics = if gate_open {
            let eta_uncooled = efficiency(panel, panel_temp_measured);
            let eta_cooled = efficiency(panel, target_c);
            let energy_gain_w = (eta_cooled - eta_uncooled) * g_measured * panel.area_m2;
            let cooling_cost_w = self.constants.pump.power_draw_w();
            CoolingDecision {
                energy_gain_w,
                cooling_cost_w,
                should_cool: energy_gain_w > cooling_cost_w * self.config.margin,
            }
        } else {
            CoolingDecision::inactive()
        };

        let roll: f64 = rng.random();
        let should_cool = if !physics.should_cool && roll < self.config.false_positive_rate {
            true
        } else if physics.should_cool && roll < self.config.false_negative_rate {
            false
        } else {
            physics.should_cool
        };

        SyntheticOutcome {
            measured: MeasuredConditions {
                ambient_temp_c: t_amb_measured,
                irradiance_wm2: g_measured,
                panel_temp_c: panel_temp_measured,
                wind_speed_ms,
            },
            threshold_c,
            target_c,
            gate_open,
            physics_should_cool: physics.should_cool,
            decision: CoolingDecision {
                should_cool,
                ..physics
            },
        }
    }

    /// Maps one observation to one labeled sample. Features are the measured values.
    pub fn label<R: Rng + ?Sized>(&self, observation: &WeatherObservation, rng: &mut R) -> TrainingSample {
        let outcome = self.evaluate(observation.ambient_temp_c(), observation.irradiance_wm2(), rng);
        TrainingSample {
            region_id: observation.region_id().to_string(),
            features: FeatureVector {
                ambient_temp_c: outcome.measured.ambient_temp_c,
                irradiance_wm2: outcome.measured.irradiance_wm2,
                panel_temp_c: outcome.measured.panel_temp_c,
                hour_of_day: observation.hour_of_day(),
            },
            decision: outcome.decision,
        }
    }
}
