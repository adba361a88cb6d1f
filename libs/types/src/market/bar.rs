//! OHLCV candlestick bar

use crate::common::errors::ValidationError;
use serde::{Deserialize, Serialize};

/// One candlestick as returned by an exchange
///
/// Prices and volume are plain `f64`; the indicator maths downstream works in
/// floating point and exchanges publish these as decimal strings anyway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Candle open time, milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(timestamp_ms: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp_ms,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// True when `low <= value <= high`
    pub fn spans(&self, value: f64) -> bool {
        self.low <= value && self.high >= value
    }

    /// Check OHLCV invariants: finite values, non-negative volume,
    /// and open/close inside the high-low range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let malformed = |reason: &str| ValidationError::MalformedBar {
            timestamp_ms: self.timestamp_ms,
            reason: reason.to_string(),
        };

        let fields = [self.open, self.high, self.low, self.close, self.volume];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(malformed("non-finite value"));
        }
        if self.volume < 0.0 {
            return Err(malformed("negative volume"));
        }
        if self.low > self.high {
            return Err(malformed("low above high"));
        }
        if !self.spans(self.open) || !self.spans(self.close) {
            return Err(malformed("open/close outside high-low range"));
        }

        Ok(())
    }
}
