//! Ordered bar series for one (pair, timeframe)

use super::{Bar, Timeframe};
use crate::common::errors::ValidationError;
use crate::common::identifiers::TradingPair;

/// Bars for a single pair and timeframe, strictly ascending by timestamp
///
/// Read-only once built; every fetch cycle produces a fresh `Series`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pair: TradingPair,
    timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl Series {
    /// Build a series, rejecting duplicate or descending timestamps
    pub fn new(
        pair: TradingPair,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Result<Self, ValidationError> {
        for (index, window) in bars.windows(2).enumerate() {
            if window[1].timestamp_ms <= window[0].timestamp_ms {
                return Err(ValidationError::OutOfOrder {
                    index: index + 1,
                    previous_ms: window[0].timestamp_ms,
                    current_ms: window[1].timestamp_ms,
                });
            }
        }

        Ok(Self {
            pair,
            timeframe,
            bars,
        })
    }

    pub fn pair(&self) -> &TradingPair {
        &self.pair
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Close prices in bar order
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// Most recent bar
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
