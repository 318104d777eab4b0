//! Forecast payload returned by the Open-Meteo compatible provider
//!
//! Only the fields the service reads are modelled; everything else in the
//! response (hourly series, units, timezone) is ignored on deserialization.

use serde::Deserialize;

/// Query value for the `current` parameter
pub const CURRENT_FIELDS: &str = "temperature_2m,wind_speed_10m,wind_direction_10m";
/// Query value for the `daily` parameter
pub const DAILY_FIELDS: &str = "sunrise";

/// Top-level forecast response
#[derive(Debug, Deserialize, Default)]
pub struct ForecastPayload {
    pub current: Option<CurrentData>,
    pub daily: Option<DailyData>,
}

/// Current conditions block. Accepts both the `_2m`/`_10m` variable names and
/// the legacy short names.
#[derive(Debug, Deserialize, Default)]
pub struct CurrentData {
    #[serde(rename = "temperature_2m", alias = "temperature")]
    pub temperature: Option<f64>,
    #[serde(rename = "wind_speed_10m", alias = "windspeed", alias = "windspeed_10m")]
    pub wind_speed: Option<f64>,
    #[serde(
        rename = "wind_direction_10m",
        alias = "winddirection",
        alias = "winddirection_10m"
    )]
    pub wind_direction: Option<f64>,
}

/// Daily series block
#[derive(Debug, Deserialize, Default)]
pub struct DailyData {
    #[serde(default)]
    pub sunrise: Vec<String>,
}

impl ForecastPayload {
    /// First sunrise entry of the daily series, if any
    #[must_use]
    pub fn first_sunrise(&self) -> Option<&str> {
        self.daily
            .as_ref()
            .and_then(|daily| daily.sunrise.first())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modern_names() {
        let payload: ForecastPayload = serde_json::from_str(
            r#"{
                "latitude": 52.52,
                "longitude": 13.41,
                "current": {"time": "2024-06-01T12:00", "temperature_2m": 21.3, "wind_speed_10m": 9.4, "wind_direction_10m": 245},
                "hourly": {"time": []},
                "daily": {"time": ["2024-06-01"], "sunrise": ["2024-06-01T02:48"]}
            }"#,
        )
        .unwrap();

        let current = payload.current.as_ref().unwrap();
        assert_eq!(current.temperature, Some(21.3));
        assert_eq!(current.wind_speed, Some(9.4));
        assert_eq!(current.wind_direction, Some(245.0));
        assert_eq!(payload.first_sunrise(), Some("2024-06-01T02:48"));
    }

    #[test]
    fn test_parse_legacy_names() {
        let payload: ForecastPayload = serde_json::from_str(
            r#"{"current": {"temperature": 25.0, "windspeed": 3.2, "winddirection": 90}}"#,
        )
        .unwrap();

        let current = payload.current.unwrap();
        assert_eq!(current.temperature, Some(25.0));
        assert_eq!(current.wind_speed, Some(3.2));
        assert_eq!(current.wind_direction, Some(90.0));
    }

    #[test]
    fn test_missing_blocks() {
        let payload: ForecastPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.current.is_none());
        assert_eq!(payload.first_sunrise(), None);

        let payload: ForecastPayload =
            serde_json::from_str(r#"{"daily": {"sunrise": []}}"#).unwrap();
        assert_eq!(payload.first_sunrise(), None);
    }
}
