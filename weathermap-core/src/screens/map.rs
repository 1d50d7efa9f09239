//! Map tab: keeps the viewport centred on the last coordinates it was sent.

use std::{fmt::Debug, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::{
    model::Coordinates,
    navigation::{FocusEvent, RouteParams, Tab},
};

pub const LATITUDE_DELTA: f64 = 0.0922;
pub const LONGITUDE_DELTA: f64 = 0.0421;

/// Wait before animating so the widget has applied the new region.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);
pub const ANIMATION_DURATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapViewport {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapViewport {
    pub fn centered_on(coords: Coordinates) -> Self {
        Self {
            latitude: coords.lat,
            longitude: coords.lon,
            latitude_delta: LATITUDE_DELTA,
            longitude_delta: LONGITUDE_DELTA,
        }
    }

    pub fn center(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

impl Default for MapViewport {
    /// New York City.
    fn default() -> Self {
        Self::centered_on(Coordinates::new(40.7128, -74.0060))
    }
}

/// The map rendering widget.
pub trait MapWidget: Send + Sync + Debug {
    fn animate_to_region(&self, region: MapViewport, duration: Duration);
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MapScreenState {
    pub viewport: MapViewport,
    /// Last valid coordinates received.
    pub last_coordinates: Option<Coordinates>,
}

impl MapScreenState {
    pub fn marker(&self) -> Coordinates {
        self.last_coordinates.unwrap_or_else(|| self.viewport.center())
    }
}

#[derive(Debug)]
pub struct MapScreen {
    state: watch::Sender<MapScreenState>,
    widget: Arc<dyn MapWidget>,
}

impl MapScreen {
    pub fn new(widget: Arc<dyn MapWidget>) -> Self {
        let (state, _) = watch::channel(MapScreenState::default());
        Self { state, widget }
    }

    pub fn state(&self) -> MapScreenState {
        *self.state.borrow()
    }

    pub fn viewport(&self) -> MapViewport {
        self.state().viewport
    }

    pub fn marker(&self) -> Coordinates {
        self.state().marker()
    }

    pub fn subscribe(&self) -> watch::Receiver<MapScreenState> {
        self.state.subscribe()
    }

    /// Handle the map tab gaining focus.
    ///
    /// Returns `false` and leaves the viewport alone unless both `lat` and `lon`
    /// parse as finite numbers.
    pub async fn on_focus(&self, params: &RouteParams) -> bool {
        let Some(coords) = parse_coordinates(params) else {
            debug!(?params, "Map focused without usable coordinates");
            return false;
        };

        let region = MapViewport::centered_on(coords);
        self.state.send_replace(MapScreenState {
            viewport: region,
            last_coordinates: Some(coords),
        });
        debug!(%coords, "Map recentered");

        tokio::time::sleep(SETTLE_DELAY).await;
        self.widget.animate_to_region(region, ANIMATION_DURATION);
        true
    }

    /// Process focus events for the map tab until the navigator goes away.
    pub async fn run(self: Arc<Self>, mut events: broadcast::Receiver<FocusEvent>) {
        loop {
            match events.recv().await {
                Ok(FocusEvent {
                    tab: Tab::Map,
                    params,
                }) => {
                    self.on_focus(&params).await;
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Map screen missed focus events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

fn parse_coordinates(params: &RouteParams) -> Option<Coordinates> {
    let lat = parse_number(params.get("lat")?)?;
    let lon = parse_number(params.get("lon")?)?;
    Some(Coordinates::new(lat, lon))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
