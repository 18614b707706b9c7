use reqwest::StatusCode;
use thiserror::Error;

/// First error met while scanning command-line parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("Wrong parameter")]
    WrongParameter,
    #[error("Bad API file")]
    BadApiFile,
    #[error("Bad limit value")]
    BadLimit,
    #[error("Bad LatLon value")]
    BadLatLon,
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("API key file must contain exactly one non-empty line")]
    InvalidApiKeyFile,
    #[error("Coordinates out of range: lat={lat}, lon={lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },
    #[error("Limit must be greater than zero, got {0}")]
    InvalidLimit(i32),
    #[error("Request to weather service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Weather service responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("No response from weather service yet")]
    NoResponse,
    #[error("Failed to parse weather service response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Field '{0}' is missing from weather service response")]
    MissingField(&'static str),
    #[error("Weather service response contains no forecasts")]
    EmptyForecast,
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),
}
