//! Geocoding payload returned by the geocode.xyz compatible provider

use serde::Deserialize;

use crate::models::GeoLocation;
use crate::{Result, WeatherError};

#[derive(Debug, Deserialize, Default)]
pub struct GeocodePayload {
    pub latt: Option<CoordinateText>,
    pub longt: Option<CoordinateText>,
    pub error: Option<GeocodeErrorBody>,
}

/// The provider sends coordinates as strings, occasionally as bare numbers
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum CoordinateText {
    Text(String),
    Number(f64),
}

#[derive(Debug, Deserialize, Default)]
pub struct GeocodeErrorBody {
    pub description: Option<String>,
}

impl GeocodePayload {
    /// Converts the payload into coordinates for `city`.
    pub fn into_location(self, city: &str) -> Result<GeoLocation> {
        let (Some(latt), Some(longt)) = (self.latt, self.longt) else {
            let reason = self
                .error
                .and_then(|e| e.description)
                .map(|d| format!(": {d}"))
                .unwrap_or_default();
            return Err(WeatherError::geocode_incomplete(format!(
                "Geocoding response for '{city}' is missing coordinates{reason}"
            )));
        };

        Ok(GeoLocation::new(
            parse_coordinate(&latt, "latt")?,
            parse_coordinate(&longt, "longt")?,
        ))
    }
}

/// Parses a decimal coordinate. `f64::from_str` only accepts `.` as the
/// decimal separator, so the result never depends on the host locale.
pub fn parse_coordinate(value: &CoordinateText, field: &str) -> Result<f64> {
    let parsed = match value {
        CoordinateText::Number(n) => *n,
        CoordinateText::Text(text) => text.trim().parse::<f64>().map_err(|e| {
            WeatherError::parse(format!("Invalid {field} value '{text}' from geocoder: {e}"))
        })?,
    };

    if !parsed.is_finite() {
        return Err(WeatherError::parse(format!(
            "Invalid {field} value '{parsed}' from geocoder: not a finite number"
        )));
    }
    Ok(parsed)
}
