use std::{fs, path::Path, time::Duration};

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::WeatherError,
    model::{Coordinates, ForecastSummary},
};

pub const DEFAULT_ENDPOINT: &str = "https://api.weather.yandex.ru/v2/forecast";
pub const API_KEY_HEADER: &str = "X-Yandex-Weather-Key";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_LIMIT: u32 = 1;

/// Client for the Yandex forecast endpoint.
///
/// Keeps the body of the last successful request and extracts fields from it
/// on demand. A failed request never touches the stored body.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    endpoint: String,
    api_key: String,
    coordinates: Coordinates,
    limit: u32,
    last_response: Option<String>,
}

impl WeatherClient {
    pub fn new() -> Result<Self, WeatherError> {
        Self::with_options(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT)
    }

    pub fn with_options(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: String::new(),
            coordinates: Coordinates::default(),
            limit: DEFAULT_LIMIT,
            last_response: None,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api_key = key.into();
    }

    /// Read the API key from a file holding exactly one non-empty line.
    pub fn set_api_key_file(&mut self, path: impl AsRef<Path>) -> Result<(), WeatherError> {
        let contents = fs::read_to_string(path)?;
        let key = single_line(&contents).ok_or(WeatherError::InvalidApiKeyFile)?;
        self.api_key = key.to_owned();
        Ok(())
    }

    pub fn set_coordinates(&mut self, lat: f64, lon: f64) -> Result<(), WeatherError> {
        let coordinates = Coordinates::new(lat, lon);
        if !coordinates.in_range() {
            return Err(WeatherError::InvalidCoordinates { lat, lon });
        }
        self.coordinates = coordinates;
        Ok(())
    }

    pub fn set_limit(&mut self, limit: i32) -> Result<(), WeatherError> {
        self.limit = u32::try_from(limit)
            .ok()
            .filter(|&days| days > 0)
            .ok_or(WeatherError::InvalidLimit(limit))?;
        Ok(())
    }

    /// Request the forecast and keep the body if the service answers 200.
    #[instrument(skip(self))]
    pub async fn fetch_forecast(&mut self) -> Result<(), WeatherError> {
        let request = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("lat", format!("{:.5}", self.coordinates.latitude)),
                ("lon", format!("{:.5}", self.coordinates.longitude)),
                ("limit", self.limit.to_string()),
                ("hours", "false".to_owned()),
                ("extra", "false".to_owned()),
            ])
            .header(API_KEY_HEADER, &self.api_key)
            .build()?;

        debug!(url = %request.url(), "sending forecast request");

        let res = self.http.execute(request).await?;
        let status = res.status();
        let body = res.text().await?;

        debug!(%status, bytes = body.len(), "forecast response received");

        if status != StatusCode::OK {
            warn!(%status, "forecast request was not successful");
            return Err(WeatherError::Status { status, body: truncate_body(&body) });
        }

        info!("forecast response stored");
        self.last_response = Some(body);
        Ok(())
    }

    pub fn raw_last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    /// Indented JSON of the stored body, or the reason it can't be produced.
    pub fn pretty_last_response(&self) -> String {
        self.parsed_response()
            .and_then(|root| serde_json::to_string_pretty(&root).map_err(WeatherError::from))
            .unwrap_or_else(|err| err.to_string())
    }

    /// Current temperature from `fact.temp`.
    pub fn last_temperature(&self) -> Result<i64, WeatherError> {
        let root = self.parsed_response()?;
        int_at(&root, "/fact/temp").ok_or(WeatherError::MissingField("fact.temp"))
    }

    /// Mean of the per-day `(day + night) / 2` temperatures.
    ///
    /// Integer division at both steps, rounding toward zero. Sums are kept in
    /// `i128`, so extreme values in the response cannot overflow.
    pub fn average_forecast_temperature(&self) -> Result<i64, WeatherError> {
        let root = self.parsed_response()?;
        let forecasts = root
            .get("forecasts")
            .and_then(Value::as_array)
            .ok_or(WeatherError::MissingField("forecasts"))?;

        if forecasts.is_empty() {
            return Err(WeatherError::EmptyForecast);
        }

        let total = forecasts
            .iter()
            .map(|entry| -> Result<i128, WeatherError> {
                let day = int_at(entry, "/parts/day_short/temp")
                    .ok_or(WeatherError::MissingField("parts.day_short.temp"))?;
                let night = int_at(entry, "/parts/night_short/temp")
                    .ok_or(WeatherError::MissingField("parts.night_short.temp"))?;
                Ok((i128::from(day) + i128::from(night)) / 2)
            })
            .sum::<Result<i128, WeatherError>>()?;

        // The mean of values inside the i64 range stays inside it.
        Ok((total / forecasts.len() as i128) as i64)
    }

    /// Server time of the stored response, from its `now` unix timestamp.
    pub fn observation_time(&self) -> Result<DateTime<Utc>, WeatherError> {
        let root = self.parsed_response()?;
        root.get("now")
            .and_then(Value::as_i64)
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .ok_or(WeatherError::MissingField("now"))
    }

    pub fn summary(&self) -> Result<ForecastSummary, WeatherError> {
        Ok(ForecastSummary {
            current_temp: self.last_temperature()?,
            average_temp: self.average_forecast_temperature()?,
            observed_at: self.observation_time().ok(),
        })
    }

    pub fn save_raw_response_to_file(&self, path: impl AsRef<Path>) -> Result<(), WeatherError> {
        let raw = self.last_response.as_deref().ok_or(WeatherError::NoResponse)?;
        fs::write(path, raw.as_bytes())?;
        Ok(())
    }

    /// Replace the stored body with a previously saved one.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD rather than rejected.
    pub fn load_raw_response_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), WeatherError> {
        let bytes = fs::read(path)?;
        self.last_response = Some(String::from_utf8_lossy(&bytes).into_owned());
        Ok(())
    }

    fn parsed_response(&self) -> Result<Value, WeatherError> {
        let raw = self.last_response.as_deref().ok_or(WeatherError::NoResponse)?;
        Ok(serde_json::from_str(raw)?)
    }
}

fn single_line(contents: &str) -> Option<&str> {
    let mut lines = contents.lines();
    match (lines.next(), lines.next()) {
        (Some(line), None) if !line.trim().is_empty() => Some(line.trim()),
        _ => None,
    }
}

/// Integer at a JSON pointer; fractional values are truncated.
fn int_at(value: &Value, pointer: &str) -> Option<i64> {
    let field = value.pointer(pointer)?;
    field.as_i64().or_else(|| field.as_f64().map(|temp| temp as i64))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
