use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Latitude/longitude pair in degrees.
///
/// Parsing never range-checks; see [`Coordinates::in_range`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Both values inside their inclusive ranges. NaN is never in range.
    pub fn in_range(&self) -> bool {
        (-MAX_LATITUDE..=MAX_LATITUDE).contains(&self.latitude)
            && (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&self.longitude)
    }
}

/// Temperatures extracted from the last stored response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub current_temp: i64,
    pub average_temp: i64,
    pub observed_at: Option<DateTime<Utc>>,
}
