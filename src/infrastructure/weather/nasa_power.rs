use crate::domain::errors::WeatherError;
use crate::domain::ports::{HourlyRecord, WeatherProvider, WeatherReading};
use crate::infrastructure::http_client_factory::HttpClientFactory;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use url::Url;

pub const NASA_POWER_HOURLY_URL: &str = "https://power.larc.nasa.gov/api/temporal/hourly/point";

/// NASA POWER marks missing values with -999.
const FILL_VALUE: f64 = -999.0;

const PARAM_TEMPERATURE: &str = "T2M";
const PARAM_IRRADIANCE: &str = "ALLSKY_SFC_SW_DWN";

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: Option<PowerProperties>,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: Option<BTreeMap<String, BTreeMap<String, Option<f64>>>>,
}

fn is_missing(value: Option<f64>) -> bool {
    match value {
        None => true,
        Some(v) => !v.is_finite() || v <= FILL_VALUE,
    }
}

/// Parses an hourly point response into records sorted by timestamp key.
/// Hours where either parameter is missing are skipped.
pub fn parse_hourly_response(body: &str) -> Result<Vec<HourlyRecord>, WeatherError> {
    let response: PowerResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::MalformedPayload {
            reason: e.to_string(),
        })?;

    let mut parameters = response
        .properties
        .and_then(|p| p.parameter)
        .ok_or_else(|| WeatherError::MalformedPayload {
            reason: "missing properties.parameter".to_string(),
        })?;

    let temperature = parameters.remove(PARAM_TEMPERATURE).ok_or_else(|| {
        WeatherError::MalformedPayload {
            reason: format!("missing {}", PARAM_TEMPERATURE),
        }
    })?;
    let irradiance = parameters.remove(PARAM_IRRADIANCE).ok_or_else(|| {
        WeatherError::MalformedPayload {
            reason: format!("missing {}", PARAM_IRRADIANCE),
        }
    })?;

    let mut records = Vec::with_capacity(irradiance.len());
    let mut skipped = 0usize;
    for (key, g) in irradiance {
        let t = temperature.get(&key).copied().flatten();
        if is_missing(g) || is_missing(t) {
            skipped += 1;
            continue;
        }
        let timestamp_key: u64 = key.parse().map_err(|_| WeatherError::MalformedPayload {
            reason: format!("invalid timestamp key {}", key),
        })?;
        records.push(HourlyRecord {
            timestamp_key,
            irradiance_wm2: g.unwrap_or_default(),
            ambient_temp_c: t.unwrap_or_default(),
        });
    }
    if skipped > 0 {
        debug!("Skipped {} hours with missing values", skipped);
    }
    Ok(records)
}

/// Hourly weather from the NASA POWER point API (community RE).
pub struct NasaPowerClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl NasaPowerClient {
    pub fn new() -> Self {
        Self {
            client: HttpClientFactory::create_client(),
            base_url: NASA_POWER_HOURLY_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn request_url(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Url, WeatherError> {
        let params = [
            ("parameters", format!("{},{}", PARAM_IRRADIANCE, PARAM_TEMPERATURE)),
            ("community", "RE".to_string()),
            ("longitude", longitude.to_string()),
            ("latitude", latitude.to_string()),
            ("start", start.format("%Y%m%d").to_string()),
            ("end", end.format("%Y%m%d").to_string()),
            ("format", "JSON".to_string()),
            // Hours are local solar time
            ("time-standard", "LST".to_string()),
        ];
        Url::parse_with_params(&self.base_url, &params).map_err(|e| WeatherError::RequestFailed {
            reason: format!("invalid URL: {}", e),
        })
    }

    async fn get_body(&self, url: Url) -> Result<String, WeatherError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WeatherError::RequestFailed {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(WeatherError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|e| WeatherError::RequestFailed {
            reason: e.to_string(),
        })
    }
}

impl Default for NasaPowerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProvider for NasaPowerClient {
    async fn fetch_hour(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
        hour: u32,
    ) -> Result<WeatherReading, WeatherError> {
        if hour > 23 {
            return Err(WeatherError::HourOutOfRange { hour });
        }

        let records = self.fetch_range(latitude, longitude, date, date).await?;
        records
            .iter()
            .find(|r| r.hour_of_day() == hour)
            .map(|r| WeatherReading {
                ambient_temp_c: r.ambient_temp_c,
                irradiance_wm2: r.irradiance_wm2,
            })
            .ok_or_else(|| WeatherError::MissingHour {
                date: date.to_string(),
                hour,
            })
    }

    async fn fetch_range(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HourlyRecord>, WeatherError> {
        let url = self.request_url(latitude, longitude, start, end)?;
        info!(
            "Fetching NASA POWER hourly data ({:.4}, {:.4}) {} -> {}",
            latitude, longitude, start, end
        );

        let body = self.get_body(url).await?;
        let records = parse_hourly_response(&body)?;
        if records.is_empty() {
            warn!("NASA POWER returned no usable hours for ({}, {})", latitude, longitude);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "Feature",
        "properties": {
            "parameter": {
                "ALLSKY_SFC_SW_DWN": {"2023071512": 812.4, "2023071513": 845.0, "2023071514": -999.0},
                "T2M": {"2023071512": 29.1, "2023071513": 30.6, "2023071514": 31.2}
            }
        }
    }"#;

    #[test]
    fn test_parse_skips_fill_values() {
        let records = parse_hourly_response(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp_key, 2023071512);
        assert_eq!(records[1].hour_of_day(), 13);
        assert!((records[1].irradiance_wm2 - 845.0).abs() < 1e-9);
        assert!((records[1].ambient_temp_c - 30.6).abs() < 1e-9);
    }

    #[test]
    fn test_parse_rejects_missing_parameter_block() {
        let err = parse_hourly_response(r#"{"messages": ["bad request"]}"#).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedPayload { .. }));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_hourly_response("<html>503</html>"),
            Err(WeatherError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_parse_requires_temperature() {
        let body = r#"{"properties":{"parameter":{"ALLSKY_SFC_SW_DWN":{"2023071512":800.0}}}}"#;
        let err = parse_hourly_response(body).unwrap_err();
        assert!(err.to_string().contains("T2M"));
    }

    #[test]
    fn test_request_url() {
        let client = NasaPowerClient::new();
        let day = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
        let url = client.request_url(33.4484, -112.074, day, day).unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("start=20220601"));
        assert!(query.contains("community=RE"));
        assert!(query.contains("time-standard=LST"));
        assert!(query.contains("latitude=33.4484"));
    }

    #[tokio::test]
    async fn test_fetch_hour_rejects_bad_hour_before_request() {
        let client = NasaPowerClient::new().with_base_url("http://127.0.0.1:9/unused");
        let day = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
        let err = client.fetch_hour(0.0, 0.0, day, 25).await.unwrap_err();
        assert!(matches!(err, WeatherError::HourOutOfRange { hour: 25 }));
    }
}
