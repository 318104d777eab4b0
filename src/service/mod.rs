//! Weather resolution: cache first, upstream on a miss, then persist
//!
//! Snapshots resolved through a city search carry both the city and its
//! coordinates, so they later answer coordinate lookups for that exact pair
//! too. A city lookup only hits on the exact stored spelling.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::cache::WeatherCache;
use crate::models::WeatherSnapshot;
use crate::weather::UpstreamWeatherClient;

pub mod normalize;

/// Shared by all requests; holds no mutable state of its own.
pub struct WeatherService {
    cache: Arc<dyn WeatherCache>,
    upstream: Arc<dyn UpstreamWeatherClient>,
}

impl WeatherService {
    pub fn new(cache: Arc<dyn WeatherCache>, upstream: Arc<dyn UpstreamWeatherClient>) -> Self {
        Self { cache, upstream }
    }

    /// Resolve weather for an exact coordinate pair.
    ///
    /// Errors from the store or the provider are returned unchanged.
    #[instrument(skip(self))]
    pub async fn resolve_by_location(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot> {
        if let Some(cached) = self.cache.find_by_location(latitude, longitude).await? {
            debug!("Cache hit for ({}, {})", latitude, longitude);
            return Ok(cached);
        }

        debug!("Cache miss for ({}, {}), calling provider", latitude, longitude);
        let fetched = self
            .upstream
            .fetch_weather(latitude, longitude, None)
            .await
            .inspect_err(|e| warn!("Weather fetch failed: {e}"))?;

        let snapshot = self.persist(fetched).await?;
        info!("Stored new snapshot for ({}, {})", latitude, longitude);
        Ok(snapshot)
    }

    /// Cache-only lookup by city name. A miss is `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn lookup_cached_by_city(&self, city: &str) -> Result<Option<WeatherSnapshot>> {
        self.cache.find_by_city(city).await
    }

    /// Resolve weather for a city name, geocoding it on a cache miss.
    #[instrument(skip(self))]
    pub async fn resolve_by_city(&self, city: &str) -> Result<WeatherSnapshot> {
        if let Some(cached) = self.cache.find_by_city(city).await? {
            debug!("Cache hit for city '{}'", city);
            return Ok(cached);
        }

        self.resolve_uncached_city(city).await
    }

    /// Geocode, fetch and persist for a city already known to be uncached.
    #[instrument(skip(self))]
    pub(crate) async fn resolve_uncached_city(&self, city: &str) -> Result<WeatherSnapshot> {
        debug!("Cache miss for city '{}', geocoding", city);
        let location = self
            .upstream
            .geocode_city(city)
            .await
            .inspect_err(|e| warn!("Geocoding '{city}' failed: {e}"))?;

        let fetched = self
            .upstream
            .fetch_weather(location.latitude, location.longitude, Some(city))
            .await
            .inspect_err(|e| warn!("Weather fetch for '{city}' failed: {e}"))?;

        let snapshot = self.persist(fetched).await?;
        info!(
            "Stored new snapshot for '{}' at ({})",
            city,
            location.format_coordinates()
        );
        Ok(snapshot)
    }

    /// Stamps the snapshot with the persistence instant and stores it.
    async fn persist(&self, mut snapshot: WeatherSnapshot) -> Result<WeatherSnapshot> {
        snapshot.fetched_at = Utc::now();
        self.cache.insert(&snapshot).await?;
        Ok(snapshot)
    }
}
