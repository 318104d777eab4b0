//! Error types for the weather lookup service

use thiserror::Error;

/// Main error type raised below the HTTP handler layer.
///
/// The `Display` output is the bare message so it can be echoed as the
/// `detail` of an HTTP error body without leaking the variant name.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    /// The provider HTTP call failed or returned a non-success status
    #[error("{message}")]
    UpstreamUnavailable { message: String },

    /// The provider payload did not match the expected shape or format
    #[error("{message}")]
    Parse { message: String },

    /// The geocoder answered but without both coordinates
    #[error("{message}")]
    GeocodeIncomplete { message: String },

    /// The snapshot store failed while reading or writing
    #[error("{message}")]
    Store { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Coarse classification handlers switch on instead of matching messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UpstreamUnavailable,
    Parse,
    GeocodeIncomplete,
    Store,
    Config,
}

impl WeatherError {
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn geocode_incomplete<S: Into<String>>(message: S) -> Self {
        Self::GeocodeIncomplete {
            message: message.into(),
        }
    }

    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            WeatherError::Parse { .. } => ErrorKind::Parse,
            WeatherError::GeocodeIncomplete { .. } => ErrorKind::GeocodeIncomplete,
            WeatherError::Store { .. } => ErrorKind::Store,
            WeatherError::Config { .. } => ErrorKind::Config,
        }
    }

    /// Whether the failure came from one of the external providers
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::UpstreamUnavailable | ErrorKind::Parse | ErrorKind::GeocodeIncomplete
        )
    }
}

impl From<anyhow::Error> for WeatherError {
    fn from(err: anyhow::Error) -> Self {
        WeatherError::store(err.to_string())
    }
}
