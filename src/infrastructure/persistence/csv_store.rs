use crate::domain::cooling::types::{
    CoolingDecision, FeatureVector, TrainingSample, WeatherObservation,
};
use crate::domain::errors::DatasetError;
use crate::domain::ports::HourlyRecord;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const RAW_FILE_SUFFIX: &str = "_data.csv";
pub const LABELED_DATASET_FILE: &str = "full_training_data.csv";

/// Raw hourly row as fetched for one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRow {
    #[serde(rename = "Hour")]
    hour: u64,
    #[serde(rename = "Irradiance_Wm2")]
    irradiance_wm2: f64,
    #[serde(rename = "AmbientTemp_C")]
    ambient_temp_c: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LabeledRow {
    ambient_temp_c: f64,
    irradiance_wm2: f64,
    panel_temp_c: f64,
    hour: u32,
    region: String,
    energy_gain_w: f64,
    cooling_cost_w: f64,
    should_cool: u8,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

impl From<&TrainingSample> for LabeledRow {
    fn from(sample: &TrainingSample) -> Self {
        Self {
            ambient_temp_c: round_to(sample.features.ambient_temp_c, 2),
            irradiance_wm2: round_to(sample.features.irradiance_wm2, 2),
            panel_temp_c: round_to(sample.features.panel_temp_c, 2),
            hour: sample.features.hour_of_day,
            region: sample.region_id.clone(),
            energy_gain_w: round_to(sample.decision.energy_gain_w, 3),
            cooling_cost_w: round_to(sample.decision.cooling_cost_w, 3),
            should_cool: u8::from(sample.decision.should_cool),
        }
    }
}

fn csv_err(path: &Path) -> impl FnOnce(csv::Error) -> DatasetError + '_ {
    move |source| DatasetError::Csv {
        path: path.display().to_string(),
        source,
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> DatasetError + '_ {
    move |source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn ensure_parent(path: &Path) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
    }
    Ok(())
}

pub fn raw_data_path(dir: &Path, region_key: &str) -> PathBuf {
    dir.join(format!("{}{}", region_key, RAW_FILE_SUFFIX))
}

/// Writes one region's hourly series, overwriting any previous file.
pub fn write_region_records(path: &Path, records: &[HourlyRecord]) -> Result<(), DatasetError> {
    ensure_parent(path)?;
    let mut wtr = csv::Writer::from_path(path).map_err(csv_err(path))?;
    for r in records {
        wtr.serialize(RawRow {
            hour: r.timestamp_key,
            irradiance_wm2: r.irradiance_wm2,
            ambient_temp_c: r.ambient_temp_c,
        })
        .map_err(csv_err(path))?;
    }
    wtr.flush().map_err(io_err(path))?;
    info!("Saved {} hourly rows to {}", records.len(), path.display());
    Ok(())
}

/// Reads a region file into observations tagged with `region_id`.
/// Rows that fail observation validation are reported as `InvalidRow`.
pub fn read_region_observations(
    path: &Path,
    region_id: &str,
) -> Result<Vec<WeatherObservation>, DatasetError> {
    let file = File::open(path).map_err(io_err(path))?;
    let mut rdr = csv::Reader::from_reader(BufReader::new(file));

    let mut observations = Vec::new();
    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row = result.map_err(csv_err(path))?;
        let hour_of_day = (row.hour % 100) as u32;
        let obs =
            WeatherObservation::new(region_id, hour_of_day, row.ambient_temp_c, row.irradiance_wm2)
                .map_err(|e| DatasetError::InvalidRow {
                    path: path.display().to_string(),
                    row: idx + 1,
                    reason: e.to_string(),
                })?;
        observations.push(obs);
    }
    Ok(observations)
}

/// Loads `<region>_data.csv` for every key. Missing files are skipped with a
/// warning so a partial fetch still yields a dataset.
pub fn load_observations(
    dir: &Path,
    region_keys: &[&str],
) -> Result<Vec<WeatherObservation>, DatasetError> {
    let mut all = Vec::new();
    for key in region_keys {
        let path = raw_data_path(dir, key);
        if !path.exists() {
            warn!("No raw data for region {} at {}", key, path.display());
            continue;
        }
        let obs = read_region_observations(&path, key)?;
        info!("Loaded {} rows for {}", obs.len(), key);
        all.extend(obs);
    }
    if all.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(all)
}

pub fn write_labeled_dataset(path: &Path, samples: &[TrainingSample]) -> Result<(), DatasetError> {
    ensure_parent(path)?;
    let mut wtr = csv::Writer::from_path(path).map_err(csv_err(path))?;
    for sample in samples {
        wtr.serialize(LabeledRow::from(sample))
            .map_err(csv_err(path))?;
    }
    wtr.flush().map_err(io_err(path))?;
    info!("Saved {} labeled rows to {}", samples.len(), path.display());
    Ok(())
}

pub fn read_labeled_dataset(path: &Path) -> Result<Vec<TrainingSample>, DatasetError> {
    let file = File::open(path).map_err(io_err(path))?;
    let mut rdr = csv::Reader::from_reader(BufReader::new(file));

    let mut samples = Vec::new();
    for (idx, result) in rdr.deserialize::<LabeledRow>().enumerate() {
        let row = result.map_err(csv_err(path))?;
        let should_cool = match row.should_cool {
            0 => false,
            1 => true,
            other => {
                return Err(DatasetError::InvalidRow {
                    path: path.display().to_string(),
                    row: idx + 1,
                    reason: format!("label must be 0 or 1, got {}", other),
                });
            }
        };
        samples.push(TrainingSample {
            region_id: row.region,
            features: FeatureVector {
                ambient_temp_c: row.ambient_temp_c,
                irradiance_wm2: row.irradiance_wm2,
                panel_temp_c: row.panel_temp_c,
                hour_of_day: row.hour,
            },
            decision: CoolingDecision {
                energy_gain_w: row.energy_gain_w,
                cooling_cost_w: row.cooling_cost_w,
                should_cool,
            },
        });
    }
    if samples.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(samples)
}
