use std::sync::Arc;

use crate::{
    preferences::PreferencesStore,
    theme::{Palette, ThemeStore},
};

pub const APP_VERSION: &str = "1.0.0";

/// Placeholder profile; there are no user accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub name: &'static str,
    pub email: &'static str,
    pub avatar_url: &'static str,
}

pub const PROFILE: Profile = Profile {
    name: "John Doe",
    email: "john.doe@example.com",
    avatar_url: "https://ui-avatars.com/api/?name=User&background=random",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    pub profile: Profile,
    pub appearance: &'static str,
    pub units: &'static str,
    pub version: &'static str,
    pub palette: Palette,
}

#[derive(Debug, Clone)]
pub struct SettingsScreen {
    preferences: Arc<PreferencesStore>,
    theme: ThemeStore<PreferencesStore>,
}

impl SettingsScreen {
    pub fn new(preferences: Arc<PreferencesStore>, theme: ThemeStore<PreferencesStore>) -> Self {
        Self { preferences, theme }
    }

    pub fn view(&self) -> SettingsView {
        let prefs = self.preferences.preferences();
        SettingsView {
            profile: PROFILE,
            appearance: if prefs.is_dark {
                "Dark Mode"
            } else {
                "Light Mode"
            },
            units: if prefs.use_celsius {
                "Celsius"
            } else {
                "Fahrenheit"
            },
            version: APP_VERSION,
            palette: self.theme.palette(),
        }
    }

    pub fn toggle_theme(&self) {
        self.theme.toggle_theme();
    }

    pub fn toggle_temperature_unit(&self) {
        self.preferences.toggle_temperature_unit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{DARK, LIGHT};

    fn screen() -> SettingsScreen {
        let prefs = Arc::new(PreferencesStore::default());
        SettingsScreen::new(prefs.clone(), ThemeStore::new(prefs))
    }

    #[test]
    fn labels_follow_preferences() {
        let screen = screen();

        let view = screen.view();
        assert_eq!(view.appearance, "Light Mode");
        assert_eq!(view.units, "Celsius");
        assert_eq!(view.palette, LIGHT.colors);
        assert_eq!(view.profile.name, "John Doe");
        assert_eq!(view.version, "1.0.0");

        screen.toggle_theme();
        screen.toggle_temperature_unit();

        let view = screen.view();
        assert_eq!(view.appearance, "Dark Mode");
        assert_eq!(view.units, "Fahrenheit");
        assert_eq!(view.palette, DARK.colors);
    }
}
