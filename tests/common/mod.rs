//! In-memory collaborators for driving the service and router in tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use tower::ServiceExt;

use weather_lookup::{
    GeoLocation, UpstreamWeatherClient, WeatherCache, WeatherError, WeatherSnapshot,
};

pub fn snapshot(latitude: f64, longitude: f64, city: Option<&str>, temperature: f64) -> WeatherSnapshot {
    WeatherSnapshot {
        latitude,
        longitude,
        city: city.map(String::from),
        temperature: Some(temperature),
        wind_speed: Some(7.2),
        wind_direction: Some(135),
        sunrise: Utc.with_ymd_and_hms(2024, 5, 10, 5, 31, 0).single(),
        fetched_at: Utc.with_ymd_and_hms(2024, 5, 10, 9, 15, 42).unwrap(),
    }
}

/// Vec-backed cache; lookups return the first matching record
#[derive(Default)]
pub struct MemoryCache {
    records: Mutex<Vec<WeatherSnapshot>>,
    read_error: Mutex<Option<String>>,
    healthy_reads: Option<usize>,
    pub reads: AtomicUsize,
    pub inserts: AtomicUsize,
}

impl MemoryCache {
    pub fn with_records(records: Vec<WeatherSnapshot>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn failing_reads(message: &str) -> Self {
        Self {
            read_error: Mutex::new(Some(message.to_string())),
            ..Self::default()
        }
    }

    /// Serves `healthy` reads normally, then fails every read after that
    pub fn failing_reads_after(healthy: usize, message: &str) -> Self {
        Self {
            read_error: Mutex::new(Some(message.to_string())),
            healthy_reads: Some(healthy),
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<WeatherSnapshot> {
        self.records.lock().unwrap().clone()
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> Result<(), WeatherError> {
        let previous = self.reads.fetch_add(1, Ordering::SeqCst);
        if self.healthy_reads.is_some_and(|healthy| previous < healthy) {
            return Ok(());
        }
        match self.read_error.lock().unwrap().as_ref() {
            Some(message) => Err(WeatherError::store(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl WeatherCache for MemoryCache {
    async fn find_by_location(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<WeatherSnapshot>, WeatherError> {
        self.check_read()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.matches_location(latitude, longitude))
            .cloned())
    }

    async fn find_by_city(&self, city: &str) -> Result<Option<WeatherSnapshot>, WeatherError> {
        self.check_read()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.matches_city(city))
            .cloned())
    }

    async fn insert(&self, snapshot: &WeatherSnapshot) -> Result<(), WeatherError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().push(snapshot.clone());
        Ok(())
    }
}

/// Scripted upstream; counts every call
#[derive(Default)]
pub struct MockUpstream {
    weather_error: Option<WeatherError>,
    locations: HashMap<String, Result<GeoLocation, WeatherError>>,
    pub fetch_calls: AtomicUsize,
    pub geocode_calls: AtomicUsize,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_weather(mut self, error: WeatherError) -> Self {
        self.weather_error = Some(error);
        self
    }

    pub fn with_city(mut self, city: &str, result: Result<GeoLocation, WeatherError>) -> Self {
        self.locations.insert(city.to_string(), result);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn geocodes(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamWeatherClient for MockUpstream {
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
        city: Option<&str>,
    ) -> Result<WeatherSnapshot, WeatherError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        // lets concurrently started resolutions interleave like real network calls
        tokio::task::yield_now().await;
        if let Some(error) = &self.weather_error {
            return Err(error.clone());
        }
        Ok(snapshot(latitude, longitude, city, 20.0))
    }

    async fn geocode_city(&self, city: &str) -> Result<GeoLocation, WeatherError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        self.locations.get(city).cloned().unwrap_or_else(|| {
            Err(WeatherError::geocode_incomplete(format!(
                "Geocoding response for '{city}' is missing coordinates"
            )))
        })
    }
}

/// Sends a GET through the router and returns status, headers and JSON body
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, HeaderMap, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, headers, json)
}
