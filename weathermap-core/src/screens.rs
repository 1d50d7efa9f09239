pub mod map;
pub mod settings;
pub mod weather;

pub use map::{MapScreen, MapViewport, MapWidget};
pub use settings::{SettingsScreen, SettingsView};
pub use weather::{Status, WeatherBody, WeatherScreen, WeatherScreenState, WeatherView};
