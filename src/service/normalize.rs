//! Conversion of provider payloads into weather snapshots

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::models::WeatherSnapshot;
use crate::weather::open_meteo::ForecastPayload;
use crate::{Result, WeatherError};

/// Provider sunrise format, `yyyy-MM-ddTHH:mm` in GMT
pub const SUNRISE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parses a sunrise entry. Anything other than the exact provider format,
/// including a trailing seconds component, is rejected.
pub fn parse_sunrise(text: &str) -> Result<DateTime<Utc>> {
    let parsed = NaiveDateTime::parse_from_str(text, SUNRISE_FORMAT).map_err(|e| {
        WeatherError::parse(format!(
            "Invalid sunrise '{text}', expected yyyy-MM-ddTHH:mm: {e}"
        ))
    })?;

    // chrono tolerates single digits, padding and signs; only the canonical text is accepted
    if parsed.format(SUNRISE_FORMAT).to_string() != text {
        return Err(WeatherError::parse(format!(
            "Invalid sunrise '{text}', expected yyyy-MM-ddTHH:mm"
        )));
    }

    Ok(parsed.and_utc())
}

/// Builds the snapshot for one forecast response.
///
/// When the daily series carries no sunrise the current instant, formatted
/// the same way, stands in for it.
pub fn snapshot_from_forecast(
    payload: &ForecastPayload,
    latitude: f64,
    longitude: f64,
    city: Option<&str>,
    now: DateTime<Utc>,
) -> Result<WeatherSnapshot> {
    let sunrise_text = payload
        .first_sunrise()
        .map(str::to_owned)
        .unwrap_or_else(|| now.format(SUNRISE_FORMAT).to_string());
    let sunrise = parse_sunrise(&sunrise_text)?;

    let current = payload.current.as_ref();

    Ok(WeatherSnapshot {
        latitude,
        longitude,
        city: city.map(str::to_owned),
        temperature: current.and_then(|c| c.temperature),
        wind_speed: current.and_then(|c| c.wind_speed),
        wind_direction: current
            .and_then(|c| c.wind_direction)
            .map(|degrees| degrees.round() as i32),
        sunrise: Some(sunrise),
        fetched_at: now,
    })
}
