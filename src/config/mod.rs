//! Configuration module for solarcool.
//!
//! Loads runtime settings from environment variables (after `.env`) and an
//! optional TOML constants file, and resolves them into the immutable domain
//! structures the core functions take.

mod constants_file;

pub use constants_file::ConstantsFile;

use crate::domain::config::{LabelProfile, SyntheticLabelConfig, SystemConstants};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_MODEL_FILE: &str = "cooling_model.json";
pub const DEFAULT_SEED: u64 = 42;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub model_path: PathBuf,
    pub seed: u64,
    pub label_profile: LabelProfile,
    pub margin_override: Option<f64>,
    pub constants_file: Option<PathBuf>,
    pub constants: SystemConstants,
    pub label_config: SyntheticLabelConfig,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        Self {
            model_path: data_dir.join("models").join(DEFAULT_MODEL_FILE),
            data_dir,
            seed: DEFAULT_SEED,
            label_profile: LabelProfile::Regional,
            margin_override: None,
            constants_file: None,
            constants: SystemConstants::default(),
            label_config: SyntheticLabelConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let data_dir = env::var("SOLARCOOL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let model_path = env::var("SOLARCOOL_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("models").join(DEFAULT_MODEL_FILE));

        let seed = match env::var("SOLARCOOL_SEED") {
            Ok(v) => v
                .parse::<u64>()
                .with_context(|| format!("Failed to parse SOLARCOOL_SEED: {}", v))?,
            Err(_) => DEFAULT_SEED,
        };

        let label_profile = env::var("SOLARCOOL_LABEL_PROFILE")
            .unwrap_or_else(|_| "regional".to_string())
            .parse::<LabelProfile>()?;

        let margin_override = match env::var("SOLARCOOL_MARGIN") {
            Ok(v) => Some(
                v.parse::<f64>()
                    .with_context(|| format!("Failed to parse SOLARCOOL_MARGIN: {}", v))?,
            ),
            Err(_) => None,
        };

        let constants_file = env::var("SOLARCOOL_CONSTANTS_FILE").ok().map(PathBuf::from);

        Self::resolve(
            data_dir,
            model_path,
            seed,
            label_profile,
            margin_override,
            constants_file,
        )
    }

    /// Applies the constants file and margin override on top of the profile.
    pub fn resolve(
        data_dir: PathBuf,
        model_path: PathBuf,
        seed: u64,
        label_profile: LabelProfile,
        margin_override: Option<f64>,
        constants_file: Option<PathBuf>,
    ) -> Result<Self> {
        let mut constants = SystemConstants::default();
        let mut label_config = SyntheticLabelConfig::for_profile(label_profile);

        if let Some(path) = &constants_file {
            let file = ConstantsFile::load(path)?;
            constants = file.constants();
            if let Some(label) = file.label {
                label_config = label;
            }
            info!("Loaded constants overrides from {}", path.display());
        }

        if let Some(margin) = margin_override {
            label_config = label_config.with_margin(margin);
        }

        constants.validate().context("Invalid system constants")?;
        label_config
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid label configuration")?;

        Ok(Self {
            data_dir,
            model_path,
            seed,
            label_profile,
            margin_override,
            constants_file,
            constants,
            label_config,
        })
    }

    /// Same settings with a different label profile, keeping any margin override.
    pub fn with_label_profile(&self, profile: LabelProfile) -> Result<Self> {
        Self::resolve(
            self.data_dir.clone(),
            self.model_path.clone(),
            self.seed,
            profile,
            self.margin_override,
            self.constants_file.clone(),
        )
    }
}
