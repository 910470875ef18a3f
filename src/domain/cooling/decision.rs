use crate::domain::config::SystemConstants;
use crate::domain::cooling::power::panel_state;
use crate::domain::cooling::types::{CoolingDecision, PanelState};
use serde::{Deserialize, Serialize};

/// Physics-only view of one set of conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsAssessment {
    pub state: PanelState,
    pub decision: CoolingDecision,
}

/// Deterministic cooling decision used by the live path.
///
/// Gain and cost are always computed; there is no activation gate and no
/// margin. Cooling is recommended when the recovered power strictly exceeds the
/// pump draw.
pub fn assess(
    constants: &SystemConstants,
    ambient_temp_c: f64,
    irradiance_wm2: f64,
) -> PhysicsAssessment {
    let state = panel_state(&constants.panel, ambient_temp_c, irradiance_wm2);
    let energy_gain_w = state.cooled_power_w - state.uncooled_power_w;
    let cooling_cost_w = constants.pump.power_draw_w();

    PhysicsAssessment {
        state,
        decision: CoolingDecision {
            energy_gain_w,
            cooling_cost_w,
            should_cool: energy_gain_w > cooling_cost_w,
        },
    }
}

/// Smallest irradiance (W/m²) at which cooling pays off for a given ambient
/// temperature, found by bisection over [0, max_irradiance].
/// Returns `None` when cooling never pays off in that range.
pub fn break_even_irradiance(
    constants: &SystemConstants,
    ambient_temp_c: f64,
    max_irradiance_wm2: f64,
) -> Option<f64> {
    if !assess(constants, ambient_temp_c, max_irradiance_wm2).decision.should_cool {
        return None;
    }

    let mut lo = 0.0_f64;
    let mut hi = max_irradiance_wm2;
    if assess(constants, ambient_temp_c, lo).decision.should_cool {
        return Some(lo);
    }
    // Net gain is convex in G here, so bisection on the sign change is enough
    for _ in 0..60 {
        let mid = (lo + hi) / 2.0;
        if assess(constants, ambient_temp_c, mid).decision.should_cool {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Some(hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scenario_recommends_cooling() {
        let a = assess(&SystemConstants::default(), 30.0, 800.0);
        assert!((a.state.panel_temp_c - 55.0).abs() < 1e-9);
        assert!((a.decision.energy_gain_w - 4.0824).abs() < 1e-3);
        assert!((a.decision.cooling_cost_w - 2.3529).abs() < 1e-3);
        assert!(a.decision.should_cool);
    }

    #[test]
    fn test_cold_dim_conditions_do_not_cool() {
        let a = assess(&SystemConstants::default(), 10.0, 50.0);
        // Panel is below the 35°C target, cooling would cost output
        assert!(a.decision.energy_gain_w < 0.0);
        assert!(!a.decision.should_cool);
    }

    #[test]
    fn test_assess_is_pure() {
        let c = SystemConstants::default();
        let first = assess(&c, 27.3, 912.4);
        let second = assess(&c, 27.3, 912.4);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cost_computed_without_gate() {
        let a = assess(&SystemConstants::default(), -5.0, 0.0);
        assert_eq!(a.decision.energy_gain_w, 0.0);
        assert!(a.decision.cooling_cost_w > 2.0);
    }

    #[test]
    fn test_negative_irradiance_is_clamped() {
        let c = SystemConstants::default();
        assert_eq!(assess(&c, 25.0, -40.0), assess(&c, 25.0, 0.0));
    }

    #[test]
    fn test_break_even_irradiance() {
        let c = SystemConstants::default();
        let g = break_even_irradiance(&c, 30.0, 1200.0).unwrap();
        assert!(g > 0.0 && g < 800.0);
        assert!(!assess(&c, 30.0, g - 1.0).decision.should_cool);
        assert!(assess(&c, 30.0, g + 1.0).decision.should_cool);
    }

    #[test]
    fn test_break_even_absent_in_cold() {
        assert!(break_even_irradiance(&SystemConstants::default(), -30.0, 300.0).is_none());
    }
}
