use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::WeatherSnapshot;
use crate::service::WeatherService;

pub mod response;

pub use response::{
    ApiError, CityNotFoundBody, InvalidCityBody, InvalidLocationBody, OffendingCoordinate,
    ProblemBody,
};

const MIN_CITY_LENGTH: usize = 2;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WeatherService>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CityQuery {
    pub city: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub fn router(service: Arc<WeatherService>) -> Router {
    Router::new()
        .route("/weather/location", get(weather_by_location))
        .route("/weather/city", get(weather_by_city))
        .route("/health", get(health))
        .with_state(AppState { service })
}

/// Checks presence and range of both coordinates, latitude first.
pub fn validate_location(query: &LocationQuery) -> Result<(f64, f64), InvalidLocationBody> {
    let Some(latitude) = query.latitude else {
        return Err(InvalidLocationBody::new(
            "Latitude is required",
            Some(OffendingCoordinate::Latitude(None)),
        ));
    };
    let Some(longitude) = query.longitude else {
        return Err(InvalidLocationBody::new(
            "Longitude is required",
            Some(OffendingCoordinate::Longitude(None)),
        ));
    };

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(InvalidLocationBody::new(
            "Latitude must be between -90 and 90",
            Some(OffendingCoordinate::Latitude(Some(latitude))),
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(InvalidLocationBody::new(
            "Longitude must be between -180 and 180",
            Some(OffendingCoordinate::Longitude(Some(longitude))),
        ));
    }

    Ok((latitude, longitude))
}

/// Checks the city is present and at least two characters long.
pub fn validate_city(query: CityQuery) -> Result<String, InvalidCityBody> {
    match query.city {
        None => Err(InvalidCityBody::new("City is required", None)),
        Some(city) if city.chars().count() < MIN_CITY_LENGTH => Err(InvalidCityBody::new(
            "City must contain at least 2 letters",
            Some(city),
        )),
        Some(city) => Ok(city),
    }
}

async fn weather_by_location(
    State(state): State<AppState>,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<WeatherSnapshot>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        InvalidLocationBody::new(
            format!("Invalid query parameters: {}", rejection.body_text()),
            None,
        )
    })?;
    let (latitude, longitude) = validate_location(&query)?;

    let snapshot = state
        .service
        .resolve_by_location(latitude, longitude)
        .await
        .map_err(|e| ApiError::Internal(ProblemBody::internal(e.to_string())))?;

    Ok(Json(snapshot))
}

async fn weather_by_city(
    State(state): State<AppState>,
    query: Result<Query<CityQuery>, QueryRejection>,
) -> Result<Json<WeatherSnapshot>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        InvalidCityBody::new(
            format!("Invalid query parameters: {}", rejection.body_text()),
            None,
        )
    })?;
    let city = validate_city(query)?;

    // a failing cache read is a server error, not a miss
    let cached = state
        .service
        .lookup_cached_by_city(&city)
        .await
        .map_err(|e| ApiError::Internal(ProblemBody::internal(e.to_string())))?;
    if let Some(snapshot) = cached {
        debug!("Serving cached snapshot for '{}'", city);
        return Ok(Json(snapshot));
    }

    // every resolution failure, transient or not, is reported as not found
    let snapshot = state
        .service
        .resolve_uncached_city(&city)
        .await
        .map_err(|e| ApiError::CityNotFound(CityNotFoundBody::new(&city, e.to_string())))?;

    Ok(Json(snapshot))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}
