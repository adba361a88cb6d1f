//! Error types for the adapters module

use thiserror::Error;
use types::VenueId;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Main error type for adapter operations
///
/// Every variant is a fetch failure from the caller's point of view; the
/// polling loop decides whether and when to try again.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Connection-related errors
    #[error("Connection failed for venue {venue}: {reason}")]
    ConnectionFailed {
        /// The venue that failed to connect
        venue: VenueId,
        /// Reason for the failure
        reason: String,
    },

    /// Request did not complete within the configured timeout
    #[error("Connection timeout for venue {venue} after {timeout_ms}ms")]
    ConnectionTimeout {
        /// The venue that timed out
        venue: VenueId,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Authentication failure with exchange credentials
    #[error("Authentication failed for venue {venue}")]
    AuthenticationFailed {
        /// The venue where auth failed
        venue: VenueId,
    },

    /// Rate limit exceeded on exchange API
    #[error("Rate limit exceeded for venue {venue}")]
    RateLimitExceeded {
        /// The venue that rate limited us
        venue: VenueId,
    },

    /// Exchange answered with a non-success status
    #[error("Venue {venue} rejected request with HTTP {status}: {message}")]
    ExchangeRejected {
        /// The venue that rejected the request
        venue: VenueId,
        /// HTTP status code
        status: u16,
        /// Exchange-provided message, if any
        message: String,
    },

    /// Parse error from exchange data
    #[error("Parse error for venue {venue}: {message} - {error}")]
    ParseError {
        /// The venue that provided the unparseable data
        venue: VenueId,
        /// Description of what was being parsed
        message: String,
        /// Underlying error message
        error: String,
    },

    /// JSON parsing error from exchange response
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Request arguments rejected before reaching the network
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error in adapter settings
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AdapterError {
    /// Whether waiting and trying again can plausibly succeed
    ///
    /// Retry behavior does not depend on this; it only drives log severity.
    pub fn is_transient(&self) -> bool {
        match self {
            AdapterError::ConnectionFailed { .. }
            | AdapterError::ConnectionTimeout { .. }
            | AdapterError::RateLimitExceeded { .. } => true,
            AdapterError::ExchangeRejected { status, .. } => *status >= 500,
            AdapterError::AuthenticationFailed { .. }
            | AdapterError::ParseError { .. }
            | AdapterError::JsonParse(_)
            | AdapterError::InvalidRequest(_)
            | AdapterError::Configuration(_) => false,
        }
    }

    /// Create a parse error for a venue
    pub fn parse(venue: VenueId, message: impl Into<String>, error: impl ToString) -> Self {
        AdapterError::ParseError {
            venue,
            message: message.into(),
            error: error.to_string(),
        }
    }
}
