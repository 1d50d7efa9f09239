//! Weather tab: search box, current reading and the "use my location" action.
//!
//! A successful fetch replaces the reading and sends the map tab the new
//! coordinates. A failed fetch keeps the last good reading on screen and shows the
//! failure as a banner until the next request starts or it is dismissed.
//!
//! Every request gets an increasing id; a response only lands if its id is still
//! the newest one issued, so an older request finishing late cannot overwrite a
//! newer result.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    location::{LocationError, LocationResolver},
    model::{Coordinates, SearchQuery, Units, WeatherReading, round_half_up},
    navigation::{Navigator, RouteParams, Tab},
    preferences::PreferencesStore,
    provider::{WeatherError, WeatherProvider},
};

pub const PERMISSION_MESSAGE: &str = "Please enable location permissions in your settings";
pub const MOUNT_FAILURE_MESSAGE: &str = "Error getting weather for your location";
pub const LOCATION_FAILURE_MESSAGE: &str = "Error getting your location";
pub const FETCH_FAILURE_MESSAGE: &str = "Error fetching weather data";
pub const NOT_FOUND_MESSAGE: &str = "Location not found";
pub const PLACEHOLDER_MESSAGE: &str = "Enter a location to see weather";
pub const SEARCH_PLACEHOLDER: &str = "Enter city name or ZIP code";

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    Loading,
    Ready,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherScreenState {
    pub status: Status,
    /// Last good reading; survives errors.
    pub reading: Option<WeatherReading>,
    pub coordinates: Option<Coordinates>,
    pub search_text: String,
}

impl Default for WeatherScreenState {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            reading: None,
            coordinates: None,
            search_text: String::new(),
        }
    }
}

impl WeatherScreenState {
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Status::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }
}

/// Display strings for a reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingView {
    pub location_name: String,
    pub temperature: String,
    pub description: String,
    pub feels_like: String,
    pub humidity: String,
}

impl ReadingView {
    /// Temperatures are shown in `units`, converting if the reading was fetched in
    /// the other system.
    pub fn new(reading: &WeatherReading, units: Units) -> Self {
        let suffix = units.suffix();
        Self {
            location_name: reading.location_name.clone(),
            temperature: format!("{}°{suffix}", round_half_up(reading.temperature_in(units))),
            description: reading.condition.clone(),
            feels_like: format!(
                "Feels like: {}°{suffix}",
                round_half_up(reading.feels_like_in(units))
            ),
            humidity: format!("Humidity: {}%", reading.humidity_pct),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherBody {
    Loading,
    Reading(ReadingView),
    Placeholder(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherView {
    pub banner: Option<String>,
    pub body: WeatherBody,
}

/// Which action started a request; decides error wording and search-box handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Mount,
    MyLocation,
    Search,
}

#[derive(Debug)]
enum Failure {
    Location(LocationError),
    Weather(WeatherError),
}

impl Failure {
    fn user_message(&self, origin: Origin) -> &'static str {
        match (origin, self) {
            (Origin::Search, _) => NOT_FOUND_MESSAGE,
            (_, Failure::Location(LocationError::PermissionDenied)) => PERMISSION_MESSAGE,
            (Origin::Mount, Failure::Location(_)) => MOUNT_FAILURE_MESSAGE,
            (Origin::MyLocation, Failure::Location(_)) => LOCATION_FAILURE_MESSAGE,
            (_, Failure::Weather(_)) => FETCH_FAILURE_MESSAGE,
        }
    }
}

#[derive(Debug)]
pub struct WeatherScreen {
    provider: Arc<dyn WeatherProvider>,
    location: LocationResolver,
    preferences: Arc<PreferencesStore>,
    navigator: Arc<Navigator>,
    state: watch::Sender<WeatherScreenState>,
    latest_request: AtomicU64,
}

impl WeatherScreen {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        location: LocationResolver,
        preferences: Arc<PreferencesStore>,
        navigator: Arc<Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(WeatherScreenState::default());
        Self {
            provider,
            location,
            preferences,
            navigator,
            state,
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> WeatherScreenState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherScreenState> {
        self.state.subscribe()
    }

    /// Fetch weather for the device location once the screen is shown.
    pub async fn mount(&self) {
        let request = self.begin();
        let result = self.fetch_for_device().await;
        self.finish(request, Origin::Mount, result);
    }

    pub async fn use_my_location(&self) {
        let request = self.begin();
        let result = self.fetch_for_device().await;
        self.finish(request, Origin::MyLocation, result);
    }

    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|state| state.search_text = text);
    }

    /// Search for the text currently in the search box.
    pub async fn submit_search(&self) {
        let text = self.state.borrow().search_text.clone();
        self.submit_search_text(&text).await;
    }

    /// Blank input does nothing.
    pub async fn submit_search_text(&self, text: &str) {
        let Some(query) = SearchQuery::classify(text) else {
            return;
        };
        let term = match &query {
            SearchQuery::PostalCode(term) | SearchQuery::PlaceName(term) => term.as_str(),
        };

        let request = self.begin();
        let result = self
            .provider
            .fetch_by_query(term, self.preferences.units())
            .await
            .map(|reading| (reading.coordinates, reading))
            .map_err(Failure::Weather);
        self.finish(request, Origin::Search, result);
    }

    /// Hide the error banner, falling back to the last reading if there is one.
    pub fn dismiss_error(&self) {
        self.state.send_if_modified(|state| {
            if !matches!(state.status, Status::Error(_)) {
                return false;
            }
            state.status = if state.reading.is_some() {
                Status::Ready
            } else {
                Status::Idle
            };
            true
        });
    }

    /// Render the current state using the unit preference in effect right now.
    pub fn view(&self) -> WeatherView {
        let state = self.state.borrow();
        let units = self.preferences.units();

        let body = match (&state.status, &state.reading) {
            (Status::Loading, _) => WeatherBody::Loading,
            (_, Some(reading)) => WeatherBody::Reading(ReadingView::new(reading, units)),
            (_, None) => WeatherBody::Placeholder(PLACEHOLDER_MESSAGE),
        };

        WeatherView {
            banner: state.error().map(str::to_string),
            body,
        }
    }

    async fn fetch_for_device(&self) -> Result<(Coordinates, WeatherReading), Failure> {
        let coords = self.location.current_coordinates().await.map_err(Failure::Location)?;
        let reading = self
            .provider
            .fetch_by_coordinates(coords, self.preferences.units())
            .await
            .map_err(Failure::Weather)?;
        Ok((coords, reading))
    }

    /// Issue a new request id and show the loading state. Both happen under the
    /// state lock so `finish` never sees one without the other.
    fn begin(&self) -> u64 {
        let mut request = 0;
        self.state.send_modify(|state| {
            request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
            state.status = Status::Loading;
        });
        request
    }

    fn finish(
        &self,
        request: u64,
        origin: Origin,
        result: Result<(Coordinates, WeatherReading), Failure>,
    ) {
        let navigate_to = match result {
            Ok((coords, reading)) => {
                let location = reading.location_name.clone();
                let applied = self.apply_if_latest(request, origin, |state| {
                    state.status = Status::Ready;
                    state.reading = Some(reading);
                    state.coordinates = Some(coords);
                    if origin == Origin::Search {
                        state.search_text.clear();
                    }
                });
                if applied {
                    debug!(request, %location, %coords, "Weather updated");
                }
                applied.then_some(coords)
            }
            Err(failure) => {
                let message = failure.user_message(origin).to_string();
                let applied = self.apply_if_latest(request, origin, |state| {
                    state.status = Status::Error(message);
                });
                if applied {
                    warn!(request, ?origin, error = ?failure, "Weather request failed");
                }
                None
            }
        };

        if let Some(coords) = navigate_to {
            self.navigator.navigate(Tab::Map, RouteParams::coordinates(coords));
        }
    }

    /// Runs `update` only if `request` is still the newest request. The check and
    /// the write share one lock acquisition.
    fn apply_if_latest(
        &self,
        request: u64,
        origin: Origin,
        update: impl FnOnce(&mut WeatherScreenState),
    ) -> bool {
        self.state.send_if_modified(|state| {
            let latest = self.latest_request.load(Ordering::SeqCst);
            if request != latest {
                debug!(request, latest, ?origin, "Discarding stale weather response");
                return false;
            }
            update(state);
            true
        })
    }
}
