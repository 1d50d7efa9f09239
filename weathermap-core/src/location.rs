//! Device location behind a permission gate.

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;
use tracing::debug;

use crate::model::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Platform geolocation capability.
#[async_trait]
pub trait LocationService: Send + Sync + Debug {
    async fn request_permission(&self) -> Permission;

    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Resolves the current device coordinates.
///
/// Permission is requested again before every lookup; a grant is never remembered.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    service: Arc<dyn LocationService>,
}

impl LocationResolver {
    pub fn new(service: Arc<dyn LocationService>) -> Self {
        Self { service }
    }

    pub async fn request_permission(&self) -> Permission {
        self.service.request_permission().await
    }

    pub async fn current_coordinates(&self) -> Result<Coordinates, LocationError> {
        if self.request_permission().await == Permission::Denied {
            debug!("Location permission denied");
            return Err(LocationError::PermissionDenied);
        }

        let coords = self.service.current_position().await?;
        debug!(%coords, "Resolved device location");
        Ok(coords)
    }
}

/// A location service reporting fixed coordinates, e.g. a configured home location.
#[derive(Debug, Clone, Default)]
pub struct FixedLocation {
    coords: Option<Coordinates>,
}

impl FixedLocation {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl LocationService for FixedLocation {
    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.coords.ok_or_else(|| {
            LocationError::Unavailable("no home coordinates configured".to_string())
        })
    }
}
