use crate::application::ml::predictor::{CoolingPredictor, ModelVerdict};
use crate::domain::config::SystemConstants;
use crate::domain::cooling::decision::{PhysicsAssessment, assess};
use crate::domain::errors::WeatherError;
use crate::domain::ports::{GeoLocation, GeocodingProvider, WeatherProvider, WeatherReading};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Physics decision side by side with the learned model for one hour.
#[derive(Debug, Clone, Serialize)]
pub struct CoolingReport {
    pub location: Option<GeoLocation>,
    pub date: Option<NaiveDate>,
    pub hour: u32,
    pub reading: WeatherReading,
    pub physics: PhysicsAssessment,
    pub model: ModelVerdict,
}

impl CoolingReport {
    /// `None` when the model is unavailable.
    pub fn model_agrees(&self) -> Option<bool> {
        self.model
            .prediction()
            .map(|p| p == self.physics.decision.should_cool)
    }
}

pub struct CoolingAdvisor {
    geocoder: Arc<dyn GeocodingProvider>,
    weather: Arc<dyn WeatherProvider>,
    predictor: Option<Arc<dyn CoolingPredictor>>,
    constants: SystemConstants,
}

/// Ambient temperature must be finite. Irradiance may be NaN (clamped to
/// zero downstream) but not infinite.
fn validate_reading(reading: &WeatherReading) -> Result<(), WeatherError> {
    if !reading.ambient_temp_c.is_finite() {
        return Err(WeatherError::InvalidReading {
            reason: format!("ambient temperature {}", reading.ambient_temp_c),
        });
    }
    if reading.irradiance_wm2.is_infinite() {
        return Err(WeatherError::InvalidReading {
            reason: format!("irradiance {}", reading.irradiance_wm2),
        });
    }
    Ok(())
}

impl CoolingAdvisor {
    pub fn new(
        geocoder: Arc<dyn GeocodingProvider>,
        weather: Arc<dyn WeatherProvider>,
        predictor: Option<Arc<dyn CoolingPredictor>>,
        constants: SystemConstants,
    ) -> Self {
        Self {
            geocoder,
            weather,
            predictor,
            constants,
        }
    }

    fn model_verdict(&self, ambient_temp_c: f64, irradiance_wm2: f64, hour: u32) -> ModelVerdict {
        let Some(predictor) = &self.predictor else {
            return ModelVerdict::Unavailable("No predictor configured".to_string());
        };
        match predictor.predict(ambient_temp_c, irradiance_wm2, hour) {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!("{} failed: {}", predictor.name(), e);
                ModelVerdict::Unavailable(e.to_string())
            }
        }
    }

    /// Evaluates manually supplied conditions; performs no I/O.
    pub fn check_manual(
        &self,
        ambient_temp_c: f64,
        irradiance_wm2: f64,
        hour: u32,
    ) -> Result<CoolingReport, WeatherError> {
        if hour > 23 {
            return Err(WeatherError::HourOutOfRange { hour });
        }
        let reading = WeatherReading {
            ambient_temp_c,
            irradiance_wm2,
        };
        validate_reading(&reading)?;
        Ok(self.report(None, None, hour, reading))
    }

    /// Resolves `place`, fetches the hour's weather and evaluates it.
    pub async fn check_place(
        &self,
        place: &str,
        date: NaiveDate,
        hour: u32,
    ) -> Result<CoolingReport, WeatherError> {
        if hour > 23 {
            return Err(WeatherError::HourOutOfRange { hour });
        }

        let location = self
            .geocoder
            .locate(place)
            .await?
            .ok_or_else(|| WeatherError::LocationNotFound {
                place: place.to_string(),
            })?;
        info!(
            "Using {} (Lat: {:.3}, Lon: {:.3})",
            location.display_name, location.latitude, location.longitude
        );

        let reading = self
            .weather
            .fetch_hour(location.latitude, location.longitude, date, hour)
            .await?;
        validate_reading(&reading)?;
        info!(
            "Weather on {} at {}:00 -> {:.2}°C, {:.1} W/m²",
            date, hour, reading.ambient_temp_c, reading.irradiance_wm2
        );

        Ok(self.report(Some(location), Some(date), hour, reading))
    }

    fn report(
        &self,
        location: Option<GeoLocation>,
        date: Option<NaiveDate>,
        hour: u32,
        reading: WeatherReading,
    ) -> CoolingReport {
        let physics = assess(&self.constants, reading.ambient_temp_c, reading.irradiance_wm2);
        let model = self.model_verdict(reading.ambient_temp_c, reading.irradiance_wm2, hour);
        CoolingReport {
            location,
            date,
            hour,
            reading,
            physics,
            model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ModelError;
    use crate::domain::ports::HourlyRecord;
    use async_trait::async_trait;

    struct NoGeocoder;

    #[async_trait]
    impl GeocodingProvider for NoGeocoder {
        async fn locate(&self, _place: &str) -> Result<Option<GeoLocation>, WeatherError> {
            Ok(None)
        }
    }

    struct NoWeather;

    #[async_trait]
    impl WeatherProvider for NoWeather {
        async fn fetch_hour(
            &self,
            _lat: f64,
            _lon: f64,
            _date: NaiveDate,
            _hour: u32,
        ) -> Result<WeatherReading, WeatherError> {
            Err(WeatherError::RequestFailed {
                reason: "offline".to_string(),
            })
        }

        async fn fetch_range(
            &self,
            _lat: f64,
            _lon: f64,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<HourlyRecord>, WeatherError> {
            Ok(vec![])
        }
    }

    struct FailingPredictor;

    impl CoolingPredictor for FailingPredictor {
        fn predict(&self, _t: f64, _g: f64, _h: u32) -> Result<ModelVerdict, ModelError> {
            Err(ModelError::Prediction("boom".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn advisor(predictor: Option<Arc<dyn CoolingPredictor>>) -> CoolingAdvisor {
        CoolingAdvisor::new(
            Arc::new(NoGeocoder),
            Arc::new(NoWeather),
            predictor,
            SystemConstants::default(),
        )
    }

    #[test]
    fn test_manual_check_without_model() {
        let report = advisor(None).check_manual(30.0, 800.0, 13).unwrap();
        assert!(report.physics.decision.should_cool);
        assert!(report.model.prediction().is_none());
        assert_eq!(report.model_agrees(), None);
    }

    #[test]
    fn test_manual_check_rejects_bad_hour() {
        assert!(matches!(
            advisor(None).check_manual(30.0, 800.0, 24),
            Err(WeatherError::HourOutOfRange { hour: 24 })
        ));
    }

    #[test]
    fn test_manual_check_rejects_non_finite_reading() {
        let advisor = advisor(None);
        for (t, g) in [
            (f64::NAN, 800.0),
            (f64::INFINITY, 800.0),
            (30.0, f64::INFINITY),
        ] {
            assert!(matches!(
                advisor.check_manual(t, g, 13),
                Err(WeatherError::InvalidReading { .. })
            ));
        }
        // NaN irradiance still means "no sun"
        let report = advisor.check_manual(20.0, f64::NAN, 13).unwrap();
        assert_eq!(report.physics.state.uncooled_power_w, 0.0);
    }

    #[test]
    fn test_predictor_error_downgraded_to_unavailable() {
        let report = advisor(Some(Arc::new(FailingPredictor)))
            .check_manual(30.0, 800.0, 13)
            .unwrap();
        assert_eq!(
            report.model,
            ModelVerdict::Unavailable("Prediction failed: boom".to_string())
        );
        assert!(report.physics.decision.should_cool);
    }

    #[tokio::test]
    async fn test_unknown_place_reported() {
        let date = NaiveDate::from_ymd_opt(2023, 7, 15).unwrap();
        let err = advisor(None).check_place("Atlantis", date, 14).await.unwrap_err();
        assert!(matches!(err, WeatherError::LocationNotFound { .. }));
    }
}
