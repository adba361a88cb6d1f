//! Error types for market data validation
//!
//! Raised when parsing identifiers (pairs, timeframes, venues) from configuration
//! strings and when assembling bars into an ordered series.

use thiserror::Error;

/// Errors that can occur while validating market data types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Trading pair string is not of the form `BASE/QUOTE`
    #[error("Invalid trading pair '{input}': expected BASE/QUOTE (e.g. BTC/USDT)")]
    InvalidPair { input: String },

    /// Timeframe string is not one of the supported candle intervals
    #[error("Invalid timeframe '{input}': expected one of 1m 3m 5m 15m 30m 1h 2h 4h 6h 8h 12h 1d 3d 1w 1M")]
    InvalidTimeframe { input: String },

    /// Venue name is not supported
    #[error("Unknown venue '{input}'")]
    UnknownVenue { input: String },

    /// Bars are not strictly ascending by timestamp
    #[error("Bar {index} has timestamp {current_ms} which does not follow {previous_ms}")]
    OutOfOrder {
        index: usize,
        previous_ms: i64,
        current_ms: i64,
    },

    /// Bar prices or volume violate OHLCV invariants
    #[error("Malformed bar at {timestamp_ms}: {reason}")]
    MalformedBar { timestamp_ms: i64, reason: String },
}
