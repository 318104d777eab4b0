//! Weather snapshot model, the unit stored in and served from the cache

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One weather observation tied to a coordinate pair and, when it was
/// resolved through a city search, the city name as typed by the caller.
///
/// Snapshots are immutable once built. Absent optional fields are emitted as
/// `null` rather than skipped because the same encoding is used for the
/// binary store format, which is not self-describing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Wind speed in km/h
    pub wind_speed: Option<f64>,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: Option<i32>,
    /// First sunrise of the daily series
    #[serde(rename = "sunriseDateTime")]
    pub sunrise: Option<DateTime<Utc>>,
    /// When the snapshot was persisted; set by the service right before the
    /// store insert, so a cache hit reports the original persistence time
    #[serde(rename = "timestamp")]
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Whether this snapshot answers a lookup for exactly these coordinates
    #[must_use]
    pub fn matches_location(&self, latitude: f64, longitude: f64) -> bool {
        self.latitude == latitude && self.longitude == longitude
    }

    /// Whether this snapshot answers a lookup for exactly this city name
    #[must_use]
    pub fn matches_city(&self, city: &str) -> bool {
        self.city.as_deref() == Some(city)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            latitude: 40.7,
            longitude: -74.0,
            city: Some("New York".to_string()),
            temperature: Some(21.5),
            wind_speed: Some(12.0),
            wind_direction: Some(270),
            sunrise: Utc.with_ymd_and_hms(2024, 6, 1, 9, 25, 0).single(),
            fetched_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(snapshot()).unwrap();
        assert_eq!(json["latitude"], 40.7);
        assert_eq!(json["city"], "New York");
        assert_eq!(json["windSpeed"], 12.0);
        assert_eq!(json["windDirection"], 270);
        assert_eq!(json["sunriseDateTime"], "2024-06-01T09:25:00Z");
        assert_eq!(json["timestamp"], "2024-06-01T12:00:00Z");
    }

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let mut snapshot = snapshot();
        snapshot.city = None;
        snapshot.temperature = None;
        let json = serde_json::to_value(snapshot).unwrap();
        assert!(json["city"].is_null());
        assert!(json["temperature"].is_null());
    }

    #[test]
    fn test_postcard_round_trip() {
        let original = snapshot();
        let bytes = postcard::to_stdvec(&original).unwrap();
        let decoded: WeatherSnapshot = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_matching_is_exact() {
        let snapshot = snapshot();
        assert!(snapshot.matches_location(40.7, -74.0));
        assert!(!snapshot.matches_location(40.70001, -74.0));
        assert!(snapshot.matches_city("New York"));
        assert!(!snapshot.matches_city("new york"));
    }
}
