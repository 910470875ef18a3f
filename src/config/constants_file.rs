//! Optional TOML overrides for the physical constants and label policy.
//!
//! ```toml
//! [panel]
//! noct_c = 47.0
//!
//! [pump]
//! rated_power_w = 2.5
//!
//! [label]
//! margin = 1.0
//! ```
//!
//! Omitted keys keep their defaults.

use crate::domain::config::{PanelSpec, PumpSpec, SyntheticLabelConfig, SystemConstants};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConstantsFile {
    pub panel: PanelSpec,
    pub pump: PumpSpec,
    /// When present, replaces the profile's label parameters entirely.
    pub label: Option<SyntheticLabelConfig>,
}

impl ConstantsFile {
    pub fn constants(&self) -> SystemConstants {
        SystemConstants {
            panel: self.panel,
            pump: self.pump,
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let file: ConstantsFile = toml::from_str(text).context("Invalid constants TOML")?;
        file.constants()
            .validate()
            .context("Constants file failed validation")?;
        if let Some(label) = &file.label {
            label
                .validate()
                .map_err(anyhow::Error::msg)
                .context("Label section failed validation")?;
        }
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read constants file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("In {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let file = ConstantsFile::parse("[panel]\nnoct_c = 47.0\n").unwrap();
        assert_eq!(file.panel.noct_c, 47.0);
        assert_eq!(file.panel.eta_ref, 0.18);
        assert_eq!(file.pump.rated_power_w, 2.0);
        assert!(file.label.is_none());
    }

    #[test]
    fn test_label_section() {
        let file = ConstantsFile::parse("[label]\nmargin = 1.0\n").unwrap();
        let label = file.label.unwrap();
        assert_eq!(label.margin, 1.0);
        assert_eq!(label.min_irradiance_wm2, 100.0);
    }

    #[test]
    fn test_invalid_constants_rejected() {
        let err = ConstantsFile::parse("[pump]\nefficiency = 0.0\n").unwrap_err();
        assert!(format!("{:#}", err).contains("validation"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(ConstantsFile::parse("[battery]\ncapacity = 3\n").is_err());
    }
}
