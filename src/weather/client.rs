//! HTTP client for the weather forecast and geocoding providers
//!
//! No retries are attempted: the first failed call is reported to the caller.
//! Every call is bounded by the timeout configured for its provider.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::UpstreamWeatherClient;
use super::geocode::GeocodePayload;
use super::open_meteo::{CURRENT_FIELDS, DAILY_FIELDS, ForecastPayload};
use crate::config::{GeocodingConfig, WeatherProviderConfig};
use crate::models::{GeoLocation, WeatherSnapshot};
use crate::service::normalize;
use crate::{Result, WeatherError};

const USER_AGENT: &str = concat!("weather-lookup/", env!("CARGO_PKG_VERSION"));

/// Client for both providers; cheap to clone and safe to share.
#[derive(Debug, Clone)]
pub struct HttpWeatherClient {
    client: Client,
    weather_url: String,
    weather_timeout: Duration,
    geocoding_url: String,
    geocoding_api_key: Option<String>,
    geocoding_timeout: Duration,
}

impl HttpWeatherClient {
    /// Create a new client from provider settings
    pub fn new(weather: &WeatherProviderConfig, geocoding: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            weather_url: weather.base_url.clone(),
            weather_timeout: weather.timeout(),
            geocoding_url: geocoding.base_url.trim_end_matches('/').to_string(),
            geocoding_api_key: geocoding.api_key.clone(),
            geocoding_timeout: geocoding.timeout(),
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response, provider: &str) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            warn!("{provider} provider returned HTTP {status}");
            return Err(WeatherError::upstream(format!(
                "{provider} provider request failed with status: {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            WeatherError::upstream(format!("Failed to read {provider} provider response: {e}"))
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            WeatherError::parse(format!("Failed to parse {provider} provider response: {e}"))
        })
    }
}

#[async_trait]
impl UpstreamWeatherClient for HttpWeatherClient {
    #[instrument(skip(self), fields(lat = latitude, lon = longitude))]
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
        city: Option<&str>,
    ) -> Result<WeatherSnapshot> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(&self.weather_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
            ])
            .timeout(self.weather_timeout)
            .send()
            .await
            .map_err(|e| WeatherError::upstream(format!("Weather provider request failed: {e}")))?;

        let payload: ForecastPayload = Self::read_json(response, "Weather").await?;
        debug!(
            "Weather payload received in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        let snapshot =
            normalize::snapshot_from_forecast(&payload, latitude, longitude, city, Utc::now())?;

        info!(
            "Fetched weather for ({:.4}, {:.4}) in {:.3}s",
            latitude,
            longitude,
            start_time.elapsed().as_secs_f64()
        );
        Ok(snapshot)
    }

    #[instrument(skip(self))]
    async fn geocode_city(&self, city: &str) -> Result<GeoLocation> {
        let start_time = Instant::now();
        let url = format!("{}/{}", self.geocoding_url, urlencoding::encode(city));

        let mut request = self
            .client
            .get(url)
            .query(&[("json", "1")])
            .timeout(self.geocoding_timeout);
        if let Some(api_key) = &self.geocoding_api_key {
            request = request.query(&[("auth", api_key)]);
        }

        let response = request.send().await.map_err(|e| {
            WeatherError::upstream(format!("Geocoding provider request failed: {e}"))
        })?;

        let payload: GeocodePayload = Self::read_json(response, "Geocoding").await?;
        let location = payload.into_location(city)?;

        info!(
            "Geocoded '{}' to ({}) in {:.3}s",
            city,
            location.format_coordinates(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(location)
    }
}
