//! Response bodies for every failure the HTTP surface can return

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, warn};

pub const CITY_NOT_FOUND_MESSAGE: &str = "Weather or city data not found";
const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// The coordinate that failed validation, echoed as `latitude` or `longitude`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OffendingCoordinate {
    Latitude(Option<f64>),
    Longitude(Option<f64>),
}

/// 400 body for `/weather/location`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidLocationBody {
    pub message: String,
    #[serde(flatten)]
    pub offending: Option<OffendingCoordinate>,
    pub timestamp: DateTime<Utc>,
}

/// 400 body for `/weather/city`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidCityBody {
    pub message: String,
    pub city: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// 404 body for `/weather/city` when resolution fails
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityNotFoundBody {
    pub message: String,
    pub city: String,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

/// 500 problem document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemBody {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
}

impl InvalidLocationBody {
    pub fn new<S: Into<String>>(message: S, offending: Option<OffendingCoordinate>) -> Self {
        Self {
            message: message.into(),
            offending,
            timestamp: Utc::now(),
        }
    }
}

impl InvalidCityBody {
    pub fn new<S: Into<String>>(message: S, city: Option<String>) -> Self {
        Self {
            message: message.into(),
            city,
            timestamp: Utc::now(),
        }
    }
}

impl CityNotFoundBody {
    pub fn new<S: Into<String>>(city: &str, detail: S) -> Self {
        Self {
            message: CITY_NOT_FOUND_MESSAGE.to_string(),
            city: city.to_string(),
            detail: detail.into(),
            timestamp: Utc::now(),
        }
    }
}

impl ProblemBody {
    pub fn internal<S: Into<String>>(detail: S) -> Self {
        Self {
            problem_type: "about:blank".to_string(),
            title: "Internal Server Error".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: detail.into(),
        }
    }
}

/// Handler failure, one variant per error row of the HTTP surface
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    InvalidLocation(InvalidLocationBody),
    InvalidCity(InvalidCityBody),
    CityNotFound(CityNotFoundBody),
    Internal(ProblemBody),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidLocation(_) | ApiError::InvalidCity(_) => StatusCode::BAD_REQUEST,
            ApiError::CityNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InvalidLocationBody> for ApiError {
    fn from(body: InvalidLocationBody) -> Self {
        ApiError::InvalidLocation(body)
    }
}

impl From<InvalidCityBody> for ApiError {
    fn from(body: InvalidCityBody) -> Self {
        ApiError::InvalidCity(body)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::InvalidLocation(body) => {
                warn!("rejected location request: {}", body.message);
                (status, Json(body)).into_response()
            }
            ApiError::InvalidCity(body) => {
                warn!("rejected city request: {}", body.message);
                (status, Json(body)).into_response()
            }
            ApiError::CityNotFound(body) => {
                warn!("city '{}' could not be resolved: {}", body.city, body.detail);
                (status, Json(body)).into_response()
            }
            ApiError::Internal(body) => {
                error!("error handling request: {}", body.detail);
                (
                    status,
                    [(header::CONTENT_TYPE, PROBLEM_CONTENT_TYPE)],
                    Json(body),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_offending_coordinate_is_flattened() {
        let body = InvalidLocationBody::new(
            "Latitude must be between -90 and 90",
            Some(OffendingCoordinate::Latitude(Some(91.0))),
        );
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["latitude"], json!(91.0));
        assert!(value.get("longitude").is_none());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_missing_coordinate_is_echoed_as_null() {
        let body = InvalidLocationBody::new(
            "Longitude is required",
            Some(OffendingCoordinate::Longitude(None)),
        );
        let value = serde_json::to_value(&body).unwrap();
        assert!(value["longitude"].is_null());
        assert!(value.as_object().unwrap().contains_key("longitude"));
    }

    #[test]
    fn test_problem_body_shape() {
        let value = serde_json::to_value(ProblemBody::internal("provider down")).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "about:blank",
                "title": "Internal Server Error",
                "status": 500,
                "detail": "provider down"
            })
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(InvalidCityBody::new("City is required", None)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::CityNotFound(CityNotFoundBody::new("Atlantis", "not found")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal(ProblemBody::internal("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
