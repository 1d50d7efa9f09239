use std::{sync::Mutex, time::Duration};

use tokio::sync::Notify;
use tracing::info;
use weathermap_core::screens::{MapViewport, MapWidget};

/// Map "widget" for the terminal: records the region it was asked to show.
#[derive(Debug, Default)]
pub struct TerminalMap {
    region: Mutex<Option<MapViewport>>,
    animated: Notify,
}

impl TerminalMap {
    /// Wait for the next animation, or give up after `timeout`.
    pub async fn wait_for_animation(&self, timeout: Duration) -> Option<MapViewport> {
        tokio::time::timeout(timeout, self.animated.notified()).await.ok()?;
        self.region()
    }

    pub fn region(&self) -> Option<MapViewport> {
        self.region.lock().ok().and_then(|guard| *guard)
    }
}

impl MapWidget for TerminalMap {
    fn animate_to_region(&self, region: MapViewport, duration: Duration) {
        info!(lat = region.latitude, lon = region.longitude, ?duration, "Animating map");
        if let Ok(mut guard) = self.region.lock() {
            *guard = Some(region);
        }
        self.animated.notify_one();
    }
}
