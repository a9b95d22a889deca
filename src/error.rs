//! Error types and handling for the house finder service

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for the house finder service
#[derive(Error, Debug)]
pub enum HouseFinderError {
    /// Malformed or missing request fields
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Request body over the configured size limit
    #[error("Payload too large: {message}")]
    PayloadTooLarge { message: String },

    /// Listing store unreachable or a query failed
    #[error("Store error: {message}")]
    Store { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl HouseFinderError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a message that is safe to hand to an API caller
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            HouseFinderError::Validation { message }
            | HouseFinderError::PayloadTooLarge { message } => message.clone(),
            HouseFinderError::Store { .. }
            | HouseFinderError::Config { .. }
            | HouseFinderError::Io { .. }
            | HouseFinderError::General { .. } => "Server Error".to_string(),
        }
    }

    /// HTTP status used when this error reaches the API boundary
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            HouseFinderError::Validation { .. } => StatusCode::BAD_REQUEST,
            HouseFinderError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for HouseFinderError {
    fn from(err: rusqlite::Error) -> Self {
        HouseFinderError::store(err.to_string())
    }
}
