//! Plain-text rendering of the screens.

use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use weathermap_core::screens::{SettingsView, WeatherBody, WeatherView, map::MapScreenState};

pub fn weather(view: &WeatherView, observed_at: Option<DateTime<Utc>>) -> String {
    let mut out = String::new();

    if let Some(banner) = &view.banner {
        let _ = writeln!(out, "! {banner}");
    }

    match &view.body {
        WeatherBody::Loading => out.push_str("Loading...\n"),
        WeatherBody::Placeholder(text) => {
            let _ = writeln!(out, "{text}");
        }
        WeatherBody::Reading(reading) => {
            let _ = writeln!(out, "{}", reading.location_name);
            let _ = writeln!(out, "  {}  {}", reading.temperature, reading.description);
            let _ = writeln!(out, "  {}", reading.feels_like);
            let _ = writeln!(out, "  {}", reading.humidity);
            if let Some(at) = observed_at {
                let local = at.with_timezone(&Local);
                let _ = writeln!(out, "  Observed: {}", local.format("%Y-%m-%d %H:%M"));
            }
        }
    }

    out
}

pub fn map(state: &MapScreenState) -> String {
    let viewport = state.viewport;
    let marker = state.marker();
    format!(
        "Map: centre {:.4}, {:.4} (span {} x {})\n  Marker at {marker}\n",
        viewport.latitude,
        viewport.longitude,
        viewport.latitude_delta,
        viewport.longitude_delta,
    )
}

pub fn settings(view: &SettingsView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} <{}>", view.profile.name, view.profile.email);
    let _ = writeln!(out);
    let _ = writeln!(out, "Appearance: {}", view.appearance);
    let _ = writeln!(out, "Units:      {}", view.units);
    let _ = writeln!(out, "About:      Version {}", view.version);
    let _ = writeln!(
        out,
        "Palette:    text {} on {}, accent {}",
        view.palette.text, view.palette.background, view.palette.primary
    );
    out
}
