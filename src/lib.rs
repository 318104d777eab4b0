//! Weather lookup service
//!
//! Answers "what is the weather here?" for a coordinate pair or a city name.
//! Results come from a local snapshot store when possible and from the
//! upstream weather and geocoding providers otherwise.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use cache::{FjallWeatherCache, WeatherCache};
pub use config::AppConfig;
pub use error::{ErrorKind, WeatherError};
pub use models::{GeoLocation, WeatherSnapshot};
pub use service::WeatherService;
pub use weather::{HttpWeatherClient, UpstreamWeatherClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherError>;
