//! Data models for the weather lookup service
//!
//! - Location: geocoded coordinates driving a weather fetch
//! - Snapshot: the cached, immutable weather observation

pub mod location;
pub mod snapshot;

pub use location::GeoLocation;
pub use snapshot::WeatherSnapshot;
