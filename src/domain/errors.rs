use thiserror::Error;

/// Errors raised when a raw weather row cannot become an observation
#[derive(Debug, Error, PartialEq)]
pub enum ObservationError {
    #[error("Hour out of range (0-23): {hour}")]
    HourOutOfRange { hour: u32 },

    #[error("Non-finite ambient temperature for {region}: {value}")]
    InvalidTemperature { region: String, value: f64 },
}

/// Errors related to weather and geocoding providers
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Weather service returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("Malformed weather payload: {reason}")]
    MalformedPayload { reason: String },

    #[error("Hour out of range for data (0-23): {hour}")]
    HourOutOfRange { hour: u32 },

    #[error("No weather data for {date} at {hour}:00")]
    MissingHour { date: String, hour: u32 },

    #[error("Location not found: {place}")]
    LocationNotFound { place: String },

    #[error("Invalid weather reading: {reason}")]
    InvalidReading { reason: String },
}

/// Errors related to dataset assembly and storage
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset is empty")]
    Empty,

    #[error("Cannot balance classes: only label {label} present ({count} samples)")]
    SingleClass { label: u8, count: usize },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid row {row} in {path}: {reason}")]
    InvalidRow {
        path: String,
        row: usize,
        reason: String,
    },
}

/// Errors related to the trained classifier
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model file not found at {path}")]
    NotFound { path: String },

    #[error("Failed to read model file: {0}")]
    Io(String),

    #[error("Unknown feature in model: {name}")]
    UnknownFeature { name: String },

    #[error("Matrix creation failed: {0}")]
    Matrix(String),

    #[error("Training failed: {0}")]
    Training(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Model serialization failed: {0}")]
    Serialization(String),

    #[error("Not enough samples to train: need {need}, have {have}")]
    InsufficientData { need: usize, have: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_error_formatting() {
        let err = WeatherError::MissingHour {
            date: "2023-07-15".to_string(),
            hour: 14,
        };
        let msg = err.to_string();
        assert!(msg.contains("2023-07-15"));
        assert!(msg.contains("14:00"));
    }

    #[test]
    fn test_single_class_formatting() {
        let err = DatasetError::SingleClass { label: 0, count: 42 };
        let msg = err.to_string();
        assert!(msg.contains("label 0"));
        assert!(msg.contains("42"));
    }

    #[test]
    fn test_observation_error_equality() {
        assert_eq!(
            ObservationError::HourOutOfRange { hour: 24 },
            ObservationError::HourOutOfRange { hour: 24 }
        );
    }
}
