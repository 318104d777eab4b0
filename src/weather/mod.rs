//! Outbound calls to the weather and geocoding providers

use async_trait::async_trait;

use crate::Result;
use crate::models::{GeoLocation, WeatherSnapshot};

pub mod client;
pub mod geocode;
pub mod open_meteo;

pub use client::HttpWeatherClient;

/// Access to the external providers. Implementations must be safe to share
/// across concurrently running requests.
#[async_trait]
pub trait UpstreamWeatherClient: Send + Sync {
    /// Fetch current conditions plus the first daily sunrise for a coordinate.
    /// The returned snapshot is not persisted.
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
        city: Option<&str>,
    ) -> Result<WeatherSnapshot>;

    /// Resolve a city name to coordinates.
    async fn geocode_city(&self, city: &str) -> Result<GeoLocation>;
}
