//! Geolocation providers.
//!
//! A [`LocationProvider`] yields coordinates. [`Geolocator`] wraps one with a
//! timeout and reuses a recent fix while it is younger than the max age.

use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::types::{Coordinates, LocationError};

pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> impl Future<Output = Result<Coordinates, LocationError>> + Send;

    fn is_available(&self) -> bool {
        true
    }
}

/// Always reports the same position
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// No location source on this host
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::ServiceUnavailable)
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Either a fixed position or nothing, picked from configuration.
#[derive(Debug, Clone, Copy)]
pub enum ConfiguredLocation {
    Fixed(FixedLocation),
    Unavailable(NoLocation),
}

impl ConfiguredLocation {
    pub fn from_position(position: Option<Coordinates>) -> Self {
        match position {
            Some(c) => Self::Fixed(FixedLocation(c)),
            None => Self::Unavailable(NoLocation),
        }
    }
}

impl LocationProvider for ConfiguredLocation {
    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        match self {
            Self::Fixed(p) => p.current_location().await,
            Self::Unavailable(p) => p.current_location().await,
        }
    }

    fn is_available(&self) -> bool {
        match self {
            Self::Fixed(p) => p.is_available(),
            Self::Unavailable(p) => p.is_available(),
        }
    }
}

pub struct Geolocator<P> {
    provider: P,
    timeout: Duration,
    max_age: Duration,
    last_fix: Mutex<Option<(Instant, Coordinates)>>,
}

impl<P: LocationProvider> Geolocator<P> {
    pub fn new(provider: P, timeout: Duration, max_age: Duration) -> Self {
        Self {
            provider,
            timeout,
            max_age,
            last_fix: Mutex::new(None),
        }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }

    /// Current position: a cached fix when fresh enough, otherwise a new
    /// provider call bounded by the timeout.
    pub async fn locate(&self) -> Result<Coordinates, LocationError> {
        if let Some(coords) = self.cached_fix() {
            tracing::debug!("Reusing cached position");
            return Ok(coords);
        }

        let coords = tokio::time::timeout(self.timeout, self.provider.current_location())
            .await
            .map_err(|_| {
                tracing::warn!("Geolocation timed out after {:?}", self.timeout);
                LocationError::Timeout
            })??;

        *self.last_fix.lock() = Some((Instant::now(), coords));
        tracing::info!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            "Position acquired"
        );
        Ok(coords)
    }

    fn cached_fix(&self) -> Option<Coordinates> {
        let guard = self.last_fix.lock();
        let (at, coords) = (*guard)?;
        (at.elapsed() <= self.max_age).then_some(coords)
    }
}
