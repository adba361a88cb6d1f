//! Error types for the EMA signals strategy

use adapter_service::AdapterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] AdapterError),

    #[error("Insufficient data: need at least {required} bars, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Giving up on {pair} after {attempts} consecutive failures: {last_error}")]
    RetriesExhausted {
        pair: String,
        attempts: u32,
        last_error: String,
    },
}

impl StrategyError {
    pub fn persistence(message: impl Into<String>) -> Self {
        StrategyError::Persistence {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        StrategyError::Configuration {
            message: message.into(),
        }
    }

    /// Whether the same cycle could succeed later without operator action
    ///
    /// Only used to pick a log level; the retry policy treats every error alike.
    pub fn is_transient(&self) -> bool {
        match self {
            StrategyError::Fetch(e) => e.is_transient(),
            StrategyError::Persistence { .. } | StrategyError::InsufficientData { .. } => true,
            StrategyError::Configuration { .. } | StrategyError::RetriesExhausted { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, StrategyError>;
