//! Wires stores, navigation and screens together.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    Config,
    location::{LocationResolver, LocationService},
    navigation::{Navigator, Tab},
    preferences::{Preferences, PreferencesStore},
    provider::{WeatherProvider, provider_from_config},
    screens::{MapScreen, MapWidget, SettingsScreen, WeatherScreen},
    theme::ThemeStore,
};

/// The running application. Must be created inside a tokio runtime: the map screen
/// listens for focus events on a background task for as long as the app lives.
#[derive(Debug)]
pub struct App {
    pub preferences: Arc<PreferencesStore>,
    pub theme: ThemeStore<PreferencesStore>,
    pub navigator: Arc<Navigator>,
    pub weather: Arc<WeatherScreen>,
    pub map: Arc<MapScreen>,
    pub settings: SettingsScreen,
    map_listener: JoinHandle<()>,
}

impl App {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        location: Arc<dyn LocationService>,
        widget: Arc<dyn MapWidget>,
        preferences: Preferences,
    ) -> Self {
        let preferences = Arc::new(PreferencesStore::new(preferences));
        let theme = ThemeStore::new(preferences.clone());
        let navigator = Arc::new(Navigator::new(Tab::Weather));

        let map = Arc::new(MapScreen::new(widget));
        let map_listener = tokio::spawn(map.clone().run(navigator.subscribe()));

        let weather = Arc::new(WeatherScreen::new(
            provider,
            LocationResolver::new(location),
            preferences.clone(),
            navigator.clone(),
        ));
        let settings = SettingsScreen::new(preferences.clone(), theme.clone());

        Self {
            preferences,
            theme,
            navigator,
            weather,
            map,
            settings,
            map_listener,
        }
    }

    pub fn from_config(
        config: &Config,
        location: Arc<dyn LocationService>,
        widget: Arc<dyn MapWidget>,
        preferences: Preferences,
    ) -> anyhow::Result<Self> {
        let provider: Arc<dyn WeatherProvider> = provider_from_config(config)?.into();
        Ok(Self::new(provider, location, widget, preferences))
    }

    /// Show the weather tab, which fetches weather for the device location.
    pub async fn start(&self) {
        debug!("Starting on the weather tab");
        self.navigator.switch_to(Tab::Weather);
        self.weather.mount().await;
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.map_listener.abort();
    }
}
