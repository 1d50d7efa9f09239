use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::model::{Coordinates, SearchQuery, Units, WeatherReading};

use super::{GENERIC_API_ERROR, WeatherError, WeatherProvider};

/// Client for the OpenWeather current-weather endpoint (`{base_url}/weather`).
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/weather", self.base_url)
    }

    /// Query parameters identifying the location, without key or units.
    fn location_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
        match query {
            SearchQuery::PostalCode(code) => vec![("zip", format!("{code},us"))],
            SearchQuery::PlaceName(name) => vec![("q", name.clone())],
        }
    }

    async fn fetch(
        &self,
        mut params: Vec<(&'static str, String)>,
        units: Units,
    ) -> Result<WeatherReading, WeatherError> {
        debug!(endpoint = %self.endpoint(), ?params, %units, "Fetching current weather");

        params.push(("appid", self.api_key.clone()));
        params.push(("units", units.as_query().to_string()));

        let res = self
            .http
            .get(self.endpoint())
            .query(&params)
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| WeatherError::Network(e.to_string()))?;

        debug!(%status, body = %truncate_body(&body), "OpenWeather response");

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|e| {
            debug!(error = %e, "Malformed OpenWeather body");
            WeatherError::Api {
                status: status.as_u16(),
                message: GENERIC_API_ERROR.to_string(),
            }
        })?;

        Ok(parsed.into_reading(units))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    dt: Option<i64>,
    coord: OwCoord,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

impl OwCurrentResponse {
    fn into_reading(self, units: Units) -> WeatherReading {
        let observed_at = self.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now);

        let (condition, icon_id) = self
            .weather
            .into_iter()
            .next()
            .map(|w| (w.description, w.icon))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

        WeatherReading {
            location_name: self.name,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity_pct: self.main.humidity.round().clamp(0.0, 100.0) as u8,
            condition,
            icon_id,
            coordinates: Coordinates::new(self.coord.lat, self.coord.lon),
            units,
            observed_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self), fields(lat = %coords.lat, lon = %coords.lon))]
    async fn fetch_by_coordinates(
        &self,
        coords: Coordinates,
        units: Units,
    ) -> Result<WeatherReading, WeatherError> {
        let params = vec![
            ("lat", coords.lat.to_string()),
            ("lon", coords.lon.to_string()),
        ];
        self.fetch(params, units).await
    }

    #[instrument(skip(self))]
    async fn fetch_by_query(
        &self,
        search_term: &str,
        units: Units,
    ) -> Result<WeatherReading, WeatherError> {
        let query = SearchQuery::classify(search_term).ok_or_else(|| WeatherError::NotFound {
            message: "Empty search term".to_string(),
        })?;

        self.fetch(Self::location_params(&query), units).await
    }
}

fn error_from_body(status: StatusCode, body: &str) -> WeatherError {
    let message = serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_API_ERROR.to_string());

    if status == StatusCode::NOT_FOUND {
        WeatherError::NotFound { message }
    } else {
        WeatherError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
