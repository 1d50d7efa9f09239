//! Core library for the `weathermap` app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and the device-location abstraction
//! - Preference and theme stores shared by all screens
//! - Tab navigation and the weather, map and settings screen controllers
//!
//! Rendering is left to the front end; screens expose their state and view models.

pub mod app;
pub mod config;
pub mod location;
pub mod model;
pub mod navigation;
pub mod preferences;
pub mod provider;
pub mod screens;
pub mod theme;

pub use app::App;
pub use config::Config;
pub use location::{FixedLocation, LocationError, LocationResolver, LocationService, Permission};
pub use model::{Coordinates, SearchQuery, Units, WeatherReading};
pub use navigation::{FocusEvent, Navigator, RouteParams, Tab};
pub use preferences::{DarkModeSource, Preferences, PreferencesStore};
pub use provider::{WeatherError, WeatherProvider, openweather::OpenWeatherProvider};
pub use theme::{Palette, Theme, ThemeStore};
