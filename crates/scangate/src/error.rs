//! Error types for Scangate.
//!
//! All fallible operations return [`ScangateError`]. The variants map onto
//! the gateway's error taxonomy:
//!
//! - `Transport` - the backend could not be reached at all (connection
//!   refused, DNS failure, reset mid-body)
//! - `ProtocolViolation` - the backend answered 2xx but broke its contract,
//!   e.g. omitted the mandatory `Content-Type` header; treated as a defect in
//!   the external collaborator, never recovered from
//! - `Validation` - invalid input or configuration
//! - `Io` / `Serialization` - system and encoding errors, bubbled up with
//!   their sources preserved
//!
//! Note that a backend that *responded* with a failure status is not an error
//! at this level: the gateway relays it verbatim, so it travels as data (see
//! [`crate::backend::BackendReply::Failure`]).
use thiserror::Error;

/// Result type alias using `ScangateError`.
pub type Result<T> = std::result::Result<T, ScangateError>;

/// Main error type for all Scangate operations.
#[derive(Debug, Error)]
pub enum ScangateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Backend protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ScangateError {
    fn from(err: serde_json::Error) -> Self {
        ScangateError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for ScangateError {
    fn from(err: toml::de::Error) -> Self {
        ScangateError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<reqwest::Error> for ScangateError {
    fn from(err: reqwest::Error) -> Self {
        ScangateError::Transport {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl ScangateError {
    /// Create a Transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Transport error with source
    pub fn transport_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Validation error with source
    pub fn validation_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization {
            message: message.into(),
            source: None,
        }
    }
}
