use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of characters of raw model text kept for diagnostics.
pub const RAW_EXCERPT_CHARS: usize = 500;

/// Main error type for the itinerary system
#[derive(Error, Debug)]
pub enum ItineraryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid trip request: {0}")]
    InvalidRequest(String),

    #[error("Generation service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Normalization error: {0}")]
    Normalization(#[from] NormalizationError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ItineraryError>;

impl ItineraryError {
    /// Check if this error is worth retrying in a later run
    pub fn is_retryable(&self) -> bool {
        match self {
            ItineraryError::Service(err) => err.is_transient(),
            ItineraryError::Normalization(_) => true,
            ItineraryError::Validation(_) => true,
            _ => false,
        }
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ItineraryError::Config(_) => "CONFIG_ERROR",
            ItineraryError::InvalidRequest(_) => "INVALID_REQUEST",
            ItineraryError::Service(_) => "SERVICE_ERROR",
            ItineraryError::Normalization(err) => match err.kind {
                NormalizationErrorKind::NoJsonFound => "NO_JSON_FOUND",
                NormalizationErrorKind::InvalidJson => "INVALID_JSON",
            },
            ItineraryError::Validation(_) => "VALIDATION_ERROR",
            ItineraryError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Raw model text retained by a normalization failure, if any
    pub fn raw_excerpt(&self) -> Option<&str> {
        match self {
            ItineraryError::Normalization(err) => Some(&err.raw_excerpt),
            _ => None,
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        })
    }
}

/// Failure of a single call to the text-generation service.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ServiceError {
    message: String,
    status: Option<u16>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        Self::new(format!(
            "generation call timed out after {:.1}s",
            after.as_secs_f64()
        ))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status returned by the service, when the failure came from one
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(429)
    }

    fn is_transient(&self) -> bool {
        match self.status {
            Some(status) => status == 429 || status >= 500,
            None => true,
        }
    }
}

/// Why raw model text could not be turned into a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationErrorKind {
    NoJsonFound,
    InvalidJson,
}

impl fmt::Display for NormalizationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationErrorKind::NoJsonFound => f.write_str("no_json_found"),
            NormalizationErrorKind::InvalidJson => f.write_str("invalid_json"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {detail}")]
pub struct NormalizationError {
    pub kind: NormalizationErrorKind,
    pub detail: String,
    /// Leading slice of the raw response text
    pub raw_excerpt: String,
}

impl NormalizationError {
    pub fn new(kind: NormalizationErrorKind, detail: impl Into<String>, raw_text: &str) -> Self {
        Self {
            kind,
            detail: detail.into(),
            raw_excerpt: excerpt(raw_text),
        }
    }
}

/// First [`RAW_EXCERPT_CHARS`] characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str) -> String {
    text.chars().take(RAW_EXCERPT_CHARS).collect()
}
