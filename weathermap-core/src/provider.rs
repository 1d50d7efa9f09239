use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

use crate::{
    Config,
    model::{Coordinates, Units, WeatherReading},
    provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

/// Message used when the API gives no usable explanation.
pub const GENERIC_API_ERROR: &str = "Failed to fetch weather data";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered 404, e.g. an unknown city or postal code.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Any other unsuccessful or unreadable response.
    #[error("Weather API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl WeatherError {
    pub fn message(&self) -> &str {
        match self {
            WeatherError::Network(msg) => msg,
            WeatherError::NotFound { message } | WeatherError::Api { message, .. } => message,
        }
    }
}

/// Turns coordinates or search text into a normalized [`WeatherReading`].
///
/// Implementations make exactly one attempt per call; retrying is up to the caller.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_by_coordinates(
        &self,
        coords: Coordinates,
        units: Units,
    ) -> Result<WeatherReading, WeatherError>;

    /// Postal codes (`12345` or `12345-6789`) are looked up in the US, anything else
    /// is treated as a place name. The reading carries the resolved coordinates.
    async fn fetch_by_query(
        &self,
        search_term: &str,
        units: Units,
    ) -> Result<WeatherReading, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    let provider = OpenWeatherProvider::new(
        api_key.to_owned(),
        config.base_url().to_owned(),
        config.timeout(),
    )?;

    Ok(Box::new(provider))
}
