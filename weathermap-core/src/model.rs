use std::{fmt, sync::LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// US ZIP code, optionally with the +4 extension.
static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("postal code pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Unit system requested from the weather API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    pub fn from_celsius(use_celsius: bool) -> Self {
        if use_celsius {
            Units::Metric
        } else {
            Units::Imperial
        }
    }

    /// Value of the `units` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Units::Metric => "C",
            Units::Imperial => "F",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// A normalized current-weather reading.
///
/// Temperatures are expressed in `units`, the unit system that was active when the
/// reading was fetched. Use [`WeatherReading::temperature_in`] to display them in
/// another system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub location_name: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub condition: String,
    pub icon_id: String,
    pub coordinates: Coordinates,
    pub units: Units,
    pub observed_at: DateTime<Utc>,
}

impl WeatherReading {
    pub fn temperature_in(&self, units: Units) -> f64 {
        convert_temperature(self.temperature, self.units, units)
    }

    pub fn feels_like_in(&self, units: Units) -> f64 {
        convert_temperature(self.feels_like, self.units, units)
    }
}

/// What a free-form search box entry refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    PostalCode(String),
    PlaceName(String),
}

impl SearchQuery {
    /// Classify user input. Returns `None` for empty or whitespace-only input.
    pub fn classify(input: &str) -> Option<Self> {
        let term = input.trim();
        if term.is_empty() {
            return None;
        }

        if POSTAL_CODE.is_match(term) {
            Some(SearchQuery::PostalCode(term.to_string()))
        } else {
            Some(SearchQuery::PlaceName(term.to_string()))
        }
    }

    pub fn is_postal_code(&self) -> bool {
        matches!(self, SearchQuery::PostalCode(_))
    }
}

pub fn convert_temperature(value: f64, from: Units, to: Units) -> f64 {
    match (from, to) {
        (Units::Metric, Units::Imperial) => value * 9.0 / 5.0 + 32.0,
        (Units::Imperial, Units::Metric) => (value - 32.0) * 5.0 / 9.0,
        _ => value,
    }
}

/// Rounds to the nearest integer, with halves going towards positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
