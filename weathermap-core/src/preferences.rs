//! User preferences shared by every screen.
//!
//! [`PreferencesStore`] is the single owner of the dark-mode flag. The theme store
//! reads it through [`DarkModeSource`] instead of keeping its own copy.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::model::Units;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub is_dark: bool,
    pub use_celsius: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            is_dark: false,
            use_celsius: true,
        }
    }
}

impl Preferences {
    pub fn units(&self) -> Units {
        Units::from_celsius(self.use_celsius)
    }

    fn with_dark(self, is_dark: bool) -> Self {
        Self { is_dark, ..self }
    }

    fn with_celsius(self, use_celsius: bool) -> Self {
        Self {
            use_celsius,
            ..self
        }
    }
}

/// Read/flip access to the dark-mode flag.
pub trait DarkModeSource: Send + Sync {
    fn is_dark(&self) -> bool;

    fn toggle_dark(&self);
}

/// Process-wide preferences with change notification.
///
/// Every toggle replaces the whole [`Preferences`] value and is visible to all
/// subscribers as soon as the call returns.
#[derive(Debug)]
pub struct PreferencesStore {
    tx: watch::Sender<Preferences>,
}

impl Default for PreferencesStore {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

impl PreferencesStore {
    pub fn new(initial: Preferences) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn preferences(&self) -> Preferences {
        *self.tx.borrow()
    }

    /// Unit system to request from the weather API.
    pub fn units(&self) -> Units {
        self.preferences().units()
    }

    pub fn toggle_theme(&self) {
        self.replace(|prefs| prefs.with_dark(!prefs.is_dark));
    }

    pub fn toggle_temperature_unit(&self) {
        self.replace(|prefs| prefs.with_celsius(!prefs.use_celsius));
    }

    pub fn subscribe(&self) -> watch::Receiver<Preferences> {
        self.tx.subscribe()
    }

    fn replace(&self, update: impl FnOnce(Preferences) -> Preferences) {
        let next = update(self.preferences());
        debug!(?next, "Preferences changed");
        self.tx.send_replace(next);
    }
}

impl DarkModeSource for PreferencesStore {
    fn is_dark(&self) -> bool {
        self.preferences().is_dark
    }

    fn toggle_dark(&self) {
        self.toggle_theme();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_light_and_celsius() {
        let store = PreferencesStore::default();
        assert_eq!(store.preferences(), Preferences::default());
        assert!(!store.preferences().is_dark);
        assert!(store.preferences().use_celsius);
        assert_eq!(store.units(), Units::Metric);
    }

    #[test]
    fn unit_toggle_flips_and_double_toggle_restores() {
        let store = PreferencesStore::default();
        let original = store.preferences();

        store.toggle_temperature_unit();
        assert!(!store.preferences().use_celsius);
        assert_eq!(store.units(), Units::Imperial);
        assert_eq!(store.preferences().is_dark, original.is_dark);

        store.toggle_temperature_unit();
        assert_eq!(store.preferences(), original);
    }

    #[test]
    fn theme_toggle_leaves_units_alone() {
        let store = PreferencesStore::default();

        store.toggle_theme();

        assert!(store.preferences().is_dark);
        assert!(store.preferences().use_celsius);
    }

    #[test]
    fn subscribers_see_changes_immediately() {
        let store = PreferencesStore::default();
        let mut rx = store.subscribe();

        store.toggle_theme();

        assert!(rx.has_changed().expect("sender alive"));
        assert!(rx.borrow_and_update().is_dark);
    }
}
