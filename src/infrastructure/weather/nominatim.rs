use crate::domain::errors::WeatherError;
use crate::domain::ports::{GeoLocation, GeocodingProvider};
use crate::infrastructure::http_client_factory::HttpClientFactory;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Parses a `/search?format=json` body and keeps the first hit.
pub fn parse_search_response(body: &str) -> Result<Option<GeoLocation>, WeatherError> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|e| WeatherError::MalformedPayload {
            reason: e.to_string(),
        })?;

    let Some(first) = places.into_iter().next() else {
        return Ok(None);
    };

    let latitude: f64 = first.lat.parse().map_err(|_| WeatherError::MalformedPayload {
        reason: format!("invalid latitude {}", first.lat),
    })?;
    let longitude: f64 = first.lon.parse().map_err(|_| WeatherError::MalformedPayload {
        reason: format!("invalid longitude {}", first.lon),
    })?;

    Ok(Some(GeoLocation {
        latitude,
        longitude,
        display_name: first.display_name,
    }))
}

pub struct NominatimGeocoder {
    client: ClientWithMiddleware,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new() -> Self {
        Self {
            client: HttpClientFactory::create_client(),
            base_url: NOMINATIM_SEARCH_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn request_url(&self, place: &str) -> Result<Url, WeatherError> {
        Url::parse_with_params(
            &self.base_url,
            &[("q", place), ("format", "json"), ("limit", "1")],
        )
        .map_err(|e| WeatherError::RequestFailed {
            reason: format!("invalid URL: {}", e),
        })
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeocodingProvider for NominatimGeocoder {
    async fn locate(&self, place: &str) -> Result<Option<GeoLocation>, WeatherError> {
        let url = self.request_url(place)?;
        info!("Geocoding '{}'", place);

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

        let body = response.text().await.map_err(|e| WeatherError::RequestFailed {
            reason: e.to_string(),
        })?;

        let location = parse_search_response(&body)?;
        if location.is_none() {
            warn!("No geocoding match for '{}'", place);
        }
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_match() {
        let body = r#"[
            {"lat": "28.6138954", "lon": "77.2090057", "display_name": "New Delhi, Delhi, India"},
            {"lat": "0", "lon": "0", "display_name": "ignored"}
        ]"#;
        let loc = parse_search_response(body).unwrap().unwrap();
        assert!((loc.latitude - 28.6138954).abs() < 1e-9);
        assert!((loc.longitude - 77.2090057).abs() < 1e-9);
        assert_eq!(loc.display_name, "New Delhi, Delhi, India");
    }

    #[test]
    fn test_parse_empty_result_is_none() {
        assert!(parse_search_response("[]").unwrap().is_none());
    }

    #[test]
    fn test_parse_bad_coordinate() {
        let body = r#"[{"lat": "north", "lon": "1.0"}]"#;
        assert!(matches!(
            parse_search_response(body),
            Err(WeatherError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_request_url_encodes_place() {
        let url = NominatimGeocoder::new().request_url("Jaipur, India").unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("q=Jaipur%2C+India"));
        assert!(query.contains("limit=1"));
    }
}
