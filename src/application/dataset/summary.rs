use crate::application::dataset::balancer::ClassCounts;
use crate::domain::cooling::types::TrainingSample;
use serde::Serialize;
use statrs::statistics::{Data, Distribution};
use std::collections::BTreeMap;
use std::fmt;

/// Positive ratio outside this range is flagged as imbalanced.
pub const BALANCE_RANGE: (f64, f64) = (0.1, 0.9);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegionStats {
    pub hours: usize,
    pub cooling_hours: usize,
}

/// Averages over the samples labeled "should cool".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositiveStats {
    pub mean_panel_temp_c: f64,
    pub mean_irradiance_wm2: f64,
    pub mean_energy_gain_w: f64,
    pub std_energy_gain_w: f64,
    pub max_energy_gain_w: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub counts: ClassCounts,
    pub regions: BTreeMap<String, RegionStats>,
    pub positive_stats: Option<PositiveStats>,
}

impl DatasetSummary {
    pub fn from_samples(samples: &[TrainingSample]) -> Self {
        let mut regions: BTreeMap<String, RegionStats> = BTreeMap::new();
        for s in samples {
            let entry = regions.entry(s.region_id.clone()).or_default();
            entry.hours += 1;
            if s.label() {
                entry.cooling_hours += 1;
            }
        }

        let positives: Vec<&TrainingSample> = samples.iter().filter(|s| s.label()).collect();
        let positive_stats = if positives.is_empty() {
            None
        } else {
            let panel: Vec<f64> = positives.iter().map(|s| s.features.panel_temp_c).collect();
            let irradiance: Vec<f64> = positives.iter().map(|s| s.features.irradiance_wm2).collect();
            let (panel, irradiance) = (Data::new(panel), Data::new(irradiance));
            let gains: Vec<f64> = positives.iter().map(|s| s.decision.energy_gain_w).collect();
            let max_energy_gain_w = gains.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let gain = Data::new(gains);

            Some(PositiveStats {
                mean_panel_temp_c: panel.mean().unwrap_or(0.0),
                mean_irradiance_wm2: irradiance.mean().unwrap_or(0.0),
                mean_energy_gain_w: gain.mean().unwrap_or(0.0),
                std_energy_gain_w: gain.std_dev().filter(|v| v.is_finite()).unwrap_or(0.0),
                max_energy_gain_w,
            })
        };

        Self {
            counts: ClassCounts::of(samples),
            regions,
            positive_stats,
        }
    }

    pub fn is_imbalanced(&self) -> bool {
        let ratio = self.counts.positive_ratio();
        ratio < BALANCE_RANGE.0 || ratio > BALANCE_RANGE.1
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.counts.total().max(1) as f64;
        writeln!(f, "Total samples: {}", self.counts.total())?;
        writeln!(
            f,
            "Should cool (label=1): {} ({:.1}%)",
            self.counts.positive,
            self.counts.positive as f64 / total * 100.0
        )?;
        writeln!(
            f,
            "No cooling (label=0): {} ({:.1}%)",
            self.counts.negative,
            self.counts.negative as f64 / total * 100.0
        )?;

        writeln!(f, "\nCooling beneficial hours by region:")?;
        for (region, stats) in &self.regions {
            let pct = if stats.hours > 0 {
                stats.cooling_hours as f64 / stats.hours as f64 * 100.0
            } else {
                0.0
            };
            writeln!(
                f,
                "   {:<14} {:>5}/{:<5} hours ({:.1}%)",
                region, stats.cooling_hours, stats.hours, pct
            )?;
        }

        let ratio = self.counts.positive_ratio() * 100.0;
        if self.is_imbalanced() {
            writeln!(f, "\nWARNING: Imbalanced dataset ({:.1}% positive class)", ratio)?;
        } else {
            writeln!(f, "\nClass balance OK: {:.1}% positive class", ratio)?;
        }

        if let Some(p) = &self.positive_stats {
            writeln!(f, "\nWhen cooling is beneficial:")?;
            writeln!(f, "   Avg panel temp:  {:.1} °C", p.mean_panel_temp_c)?;
            writeln!(f, "   Avg irradiance:  {:.1} W/m²", p.mean_irradiance_wm2)?;
            writeln!(
                f,
                "   Avg energy gain: {:.2} W (std {:.2})",
                p.mean_energy_gain_w, p.std_energy_gain_w
            )?;
            write!(f, "   Max energy gain: {:.2} W", p.max_energy_gain_w)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cooling::types::{CoolingDecision, FeatureVector};

    fn sample(region: &str, should_cool: bool, gain: f64) -> TrainingSample {
        TrainingSample {
            region_id: region.to_string(),
            features: FeatureVector {
                ambient_temp_c: 35.0,
                irradiance_wm2: if should_cool { 900.0 } else { 300.0 },
                panel_temp_c: if should_cool { 60.0 } else { 40.0 },
                hour_of_day: 13,
            },
            decision: CoolingDecision {
                energy_gain_w: gain,
                cooling_cost_w: 2.35,
                should_cool,
            },
        }
    }

    #[test]
    fn test_per_region_counts() {
        let samples = vec![
            sample("phoenix", true, 4.0),
            sample("phoenix", false, 0.0),
            sample("seattle", false, 0.0),
            sample("phoenix", true, 6.0),
        ];
        let summary = DatasetSummary::from_samples(&samples);

        assert_eq!(summary.counts.positive, 2);
        assert_eq!(
            summary.regions["phoenix"],
            RegionStats {
                hours: 3,
                cooling_hours: 2
            }
        );
        assert_eq!(summary.regions["seattle"].cooling_hours, 0);

        let p = summary.positive_stats.unwrap();
        assert!((p.mean_energy_gain_w - 5.0).abs() < 1e-9);
        assert!((p.max_energy_gain_w - 6.0).abs() < 1e-9);
        assert!((p.mean_panel_temp_c - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_imbalance_flag() {
        let mut samples: Vec<_> = (0..19).map(|_| sample("miami", false, 0.0)).collect();
        samples.push(sample("miami", true, 3.0));
        let summary = DatasetSummary::from_samples(&samples);
        assert!(summary.is_imbalanced());
        assert!(summary.to_string().contains("WARNING"));
    }

    #[test]
    fn test_no_positives() {
        let summary = DatasetSummary::from_samples(&[sample("denver", false, 0.0)]);
        assert!(summary.positive_stats.is_none());
        assert!(summary.is_imbalanced());
    }
}
