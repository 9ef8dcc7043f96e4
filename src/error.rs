//! Error types for the screening bot

use thiserror::Error;

/// Result type alias using our custom Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the screening bot
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Token source errors
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Source returned malformed payload: {0}")]
    SourceMalformed(String),

    // Gate errors
    #[error("Gate could not decide: {0}")]
    GateIndeterminate(String),

    // Notification errors
    #[error("Alert delivery failed: {0}")]
    ChannelDelivery(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Errors the poll loop absorbs instead of propagating. Everything except
    /// startup configuration problems is absorbed at its component boundary.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::SourceUnavailable(_)
                | Error::SourceMalformed(_)
                | Error::GateIndeterminate(_)
                | Error::ChannelDelivery(_)
        )
    }
}

// Conversion from reqwest errors: a decode failure means the provider spoke
// the wrong shape, anything else means we never got a usable response.
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::SourceMalformed(e.to_string())
        } else {
            Error::SourceUnavailable(e.to_string())
        }
    }
}

// Conversion from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SourceMalformed(e.to_string())
    }
}

// Conversion from I/O errors
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
