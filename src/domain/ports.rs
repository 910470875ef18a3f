use crate::domain::errors::WeatherError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ambient conditions at one place and hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub ambient_temp_c: f64,
    pub irradiance_wm2: f64,
}

/// One hourly row of a historical series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    /// `YYYYMMDDHH` as reported by the provider.
    pub timestamp_key: u64,
    pub irradiance_wm2: f64,
    pub ambient_temp_c: f64,
}

impl HourlyRecord {
    pub fn hour_of_day(&self) -> u32 {
        (self.timestamp_key % 100) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Conditions for a single hour (0-23) of a day.
    async fn fetch_hour(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
        hour: u32,
    ) -> Result<WeatherReading, WeatherError>;

    /// Every available hour between `start` and `end` inclusive.
    async fn fetch_range(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HourlyRecord>, WeatherError>;
}

#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// `Ok(None)` when the place name does not resolve.
    async fn locate(&self, place: &str) -> Result<Option<GeoLocation>, WeatherError>;
}
