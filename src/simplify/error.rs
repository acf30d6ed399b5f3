//! Failure taxonomy for simplify/speak calls.
//!
//! Errors are surfaced once and never cached or retried.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during a simplify/speak call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimplifyError {
    #[error(
        "Request timed out after {}s. The text-to-speech service is taking too long to respond.",
        .0.as_secs()
    )]
    Timeout(Duration),

    #[error("Network error: {0}. Check the connection and make sure the backend server is running.")]
    Network(String),

    #[error("Backend returned HTTP status {status}")]
    Server { status: u16 },

    #[error("Failed to simplify and convert text to speech: {message}")]
    Unknown { message: String },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Input validation failed: {0}")]
    InputValidation(String),
}

impl SimplifyError {
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Stable label for logs and metrics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Network(_) => "network_error",
            Self::Server { .. } => "server_error",
            Self::Unknown { .. } => "unknown_error",
            Self::Cancelled => "cancelled",
            Self::InputValidation(_) => "input_validation",
        }
    }

    /// Returns true if this error should be logged as a warning rather than an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Cancelled | Self::InputValidation(_))
    }
}

impl From<reqwest::Error> for SimplifyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            // reqwest does not expose the configured limit on the error
            Self::Timeout(Duration::ZERO)
        } else if let Some(status) = e.status() {
            Self::Server {
                status: status.as_u16(),
            }
        } else if e.is_connect() || e.is_request() || e.is_body() || e.is_decode() {
            // Payload parsing happens outside reqwest, so body/decode here
            // means the stream broke.
            Self::Network(e.to_string())
        } else {
            Self::unknown(e.to_string())
        }
    }
}
