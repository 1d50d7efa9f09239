use std::{sync::Arc, time::Duration};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, Text};
use tracing::debug;
use weathermap_core::{
    App, Config, Coordinates, FixedLocation, Preferences, PreferencesStore, ThemeStore,
    config::DEFAULT_BASE_URL,
    screens::{SettingsScreen, Status, WeatherView},
};

use crate::{render, terminal_map::TerminalMap};

/// How long to wait for the map to settle after a successful fetch.
const MAP_TIMEOUT: Duration = Duration::from_secs(3);

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weathermap",
    version,
    about = "Current weather and its place on the map"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct DisplayArgs {
    /// Request and show temperatures in Fahrenheit.
    #[arg(long)]
    pub fahrenheit: bool,

    /// Use the dark theme.
    #[arg(long)]
    pub dark: bool,
}

impl DisplayArgs {
    fn preferences(&self) -> Preferences {
        Preferences {
            is_dark: self.dark,
            use_celsius: !self.fahrenheit,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key, base URL and home location.
    Configure,

    /// Show weather for a city name or US ZIP code.
    Show {
        /// City name or ZIP code, e.g. "Paris" or "94103".
        query: String,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Show weather for the current (or configured home) location.
    Locate {
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Show the settings screen.
    Settings {
        #[arg(long)]
        toggle_theme: bool,

        #[arg(long)]
        toggle_units: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { query, display } => {
                let config = Config::load()?;
                let (app, map) = build_app(&config, config.home, &display)?;

                app.weather.set_search_text(query);
                app.weather.submit_search().await;
                present(&app, &map).await
            }
            Command::Locate { lat, lon, display } => {
                let config = Config::load()?;
                let here = lat
                    .zip(lon)
                    .map(|(lat, lon)| Coordinates::new(lat, lon))
                    .or(config.home);
                let (app, map) = build_app(&config, here, &display)?;

                app.weather.use_my_location().await;
                present(&app, &map).await
            }
            Command::Settings {
                toggle_theme,
                toggle_units,
            } => {
                let preferences = Arc::new(PreferencesStore::default());
                let screen =
                    SettingsScreen::new(preferences.clone(), ThemeStore::new(preferences));

                if toggle_theme {
                    screen.toggle_theme();
                }
                if toggle_units {
                    screen.toggle_temperature_unit();
                }

                print!("{}", render::settings(&screen.view()));
                Ok(())
            }
        }
    }
}

fn build_app(
    config: &Config,
    here: Option<Coordinates>,
    display: &DisplayArgs,
) -> anyhow::Result<(App, Arc<TerminalMap>)> {
    let map = Arc::new(TerminalMap::default());
    let app = App::from_config(
        config,
        Arc::new(FixedLocation::new(here)),
        map.clone(),
        display.preferences(),
    )?;
    Ok((app, map))
}

async fn present(app: &App, map: &TerminalMap) -> anyhow::Result<()> {
    let state = app.weather.state();

    if state.status == Status::Ready && map.wait_for_animation(MAP_TIMEOUT).await.is_none() {
        debug!("Map did not animate in time");
    }

    let observed_at = state.reading.as_ref().map(|r| r.observed_at);
    let (view, error) = take_error(app.weather.view());

    print!("{}", render::weather(&view, observed_at));
    if let Some(message) = error {
        bail!(message);
    }

    println!();
    print!("{}", render::map(&app.map.state()));
    Ok(())
}

/// Move the error banner out of the view so it is reported once, as the exit error.
fn take_error(mut view: WeatherView) -> (WeatherView, Option<String>) {
    let error = view.banner.take();
    (view, error)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let current_url = if config.base_url.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else {
        config.base_url.clone()
    };
    config.base_url = Text::new("API base URL:")
        .with_default(&current_url)
        .prompt()
        .context("Failed to read base URL")?;

    let set_home = Confirm::new("Set a home location for `weathermap locate`?")
        .with_default(config.home.is_some())
        .prompt()
        .context("Failed to read answer")?;

    config.home = if set_home {
        let lat = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a number")
            .prompt()
            .context("Failed to read latitude")?;
        let lon = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a number")
            .prompt()
            .context("Failed to read longitude")?;
        Some(Coordinates::new(lat, lon))
    } else {
        None
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weathermap_core::screens::{WeatherBody, weather::ReadingView};

    #[test]
    fn failed_command_prints_error_only_once() {
        let view = WeatherView {
            banner: Some("Location not found".to_string()),
            body: WeatherBody::Reading(ReadingView {
                location_name: "Paris".to_string(),
                temperature: "18°C".to_string(),
                description: "clear sky".to_string(),
                feels_like: "Feels like: 17°C".to_string(),
                humidity: "Humidity: 40%".to_string(),
            }),
        };

        let (view, error) = take_error(view);
        let printed = render::weather(&view, None);

        assert_eq!(error.as_deref(), Some("Location not found"));
        assert!(!printed.contains("Location not found"));
        assert!(printed.starts_with("Paris\n"));

        let exit = anyhow::anyhow!(error.unwrap_or_default());
        assert_eq!(exit.to_string(), "Location not found");
    }

    #[test]
    fn successful_view_has_no_exit_error() {
        let view = WeatherView {
            banner: None,
            body: WeatherBody::Loading,
        };
        let (view, error) = take_error(view);
        assert!(error.is_none());
        assert_eq!(render::weather(&view, None), "Loading...\n");
    }
}
