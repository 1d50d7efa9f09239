//! Tab navigation with per-tab route parameters and focus events.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use tokio::sync::{broadcast, watch};
use tracing::debug;

use crate::model::Coordinates;

const FOCUS_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Map,
    Weather,
    Settings,
}

impl Tab {
    /// Tabs in display order.
    pub const fn all() -> &'static [Tab] {
        &[Tab::Map, Tab::Weather, Tab::Settings]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Map => "Map",
            Tab::Weather => "Weather",
            Tab::Settings => "Settings",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Route parameters as the router delivers them: string keys, string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(BTreeMap<String, String>);

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{lat, lon}` parameters for the map tab.
    pub fn coordinates(coords: Coordinates) -> Self {
        Self::new()
            .with("lat", coords.lat.to_string())
            .with("lon", coords.lon.to_string())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Emitted each time a tab becomes the focused tab, re-navigation included.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusEvent {
    pub tab: Tab,
    pub params: RouteParams,
}

#[derive(Debug, Clone)]
struct NavState {
    current: Tab,
    params: HashMap<Tab, RouteParams>,
}

#[derive(Debug)]
pub struct Navigator {
    state: watch::Sender<NavState>,
    focus: broadcast::Sender<FocusEvent>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Tab::Weather)
    }
}

impl Navigator {
    pub fn new(initial: Tab) -> Self {
        let (state, _) = watch::channel(NavState {
            current: initial,
            params: HashMap::new(),
        });
        let (focus, _) = broadcast::channel(FOCUS_CHANNEL_CAPACITY);
        Self { state, focus }
    }

    pub fn current(&self) -> Tab {
        self.state.borrow().current
    }

    /// Last parameters passed to `tab`.
    pub fn params(&self, tab: Tab) -> RouteParams {
        self.state.borrow().params.get(&tab).cloned().unwrap_or_default()
    }

    /// Focus `tab` with new parameters.
    pub fn navigate(&self, tab: Tab, params: RouteParams) {
        self.state.send_modify(|state| {
            state.current = tab;
            state.params.insert(tab, params.clone());
        });
        self.emit_focus(tab, params);
    }

    /// Focus `tab`, keeping whatever parameters it was last given.
    pub fn switch_to(&self, tab: Tab) {
        self.state.send_modify(|state| state.current = tab);
        self.emit_focus(tab, self.params(tab));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FocusEvent> {
        self.focus.subscribe()
    }

    fn emit_focus(&self, tab: Tab, params: RouteParams) {
        debug!(%tab, ?params, "Tab focused");
        if self.focus.send(FocusEvent { tab, params }).is_err() {
            debug!(%tab, "No focus listeners");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_weather_tab() {
        let nav = Navigator::default();
        assert_eq!(nav.current(), Tab::Weather);
        assert!(nav.params(Tab::Map).is_empty());
    }

    #[test]
    fn navigate_stores_params_and_emits_focus() {
        let nav = Navigator::default();
        let mut rx = nav.subscribe();

        let params = RouteParams::coordinates(Coordinates::new(51.5074, -0.1278));
        nav.navigate(Tab::Map, params.clone());

        assert_eq!(nav.current(), Tab::Map);
        assert_eq!(nav.params(Tab::Map), params);

        let event = rx.try_recv().expect("focus event");
        assert_eq!(
            event,
            FocusEvent {
                tab: Tab::Map,
                params
            }
        );
    }

    #[test]
    fn navigating_to_active_tab_refocuses_it() {
        let nav = Navigator::default();
        let mut rx = nav.subscribe();

        nav.navigate(Tab::Map, RouteParams::coordinates(Coordinates::new(1.0, 2.0)));
        nav.navigate(Tab::Map, RouteParams::coordinates(Coordinates::new(3.0, 4.0)));

        assert_eq!(rx.try_recv().expect("first").params.get("lat"), Some("1"));
        assert_eq!(rx.try_recv().expect("second").params.get("lat"), Some("3"));
    }

    #[test]
    fn switch_to_keeps_last_params() {
        let nav = Navigator::default();
        nav.navigate(Tab::Map, RouteParams::coordinates(Coordinates::new(1.5, 2.5)));
        nav.switch_to(Tab::Settings);

        let mut rx = nav.subscribe();
        nav.switch_to(Tab::Map);

        let event = rx.try_recv().expect("focus event");
        assert_eq!(event.tab, Tab::Map);
        assert_eq!(event.params.get("lon"), Some("2.5"));
    }

    #[test]
    fn tab_order_is_map_weather_settings() {
        let titles: Vec<_> = Tab::all().iter().map(Tab::title).collect();
        assert_eq!(titles, ["Map", "Weather", "Settings"]);
    }
}
