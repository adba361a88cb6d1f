//! Input adapters for collecting market data from external sources

pub mod collectors;
pub mod components;

use crate::Result;
use async_trait::async_trait;
use types::{Series, Timeframe, TradingPair, VenueId};

/// Largest number of candles a single fetch may request
pub const MAX_FETCH_LIMIT: u32 = 1000;

/// Core trait for candle data sources
///
/// Implementations perform exactly one request per call; retrying is the
/// caller's business.
#[async_trait]
pub trait CandleFetcher: Send + Sync {
    /// Get the venue this fetcher talks to
    fn venue(&self) -> VenueId;

    /// Fetch the most recent `limit` bars, oldest first
    async fn fetch(&self, pair: &TradingPair, timeframe: Timeframe, limit: u32) -> Result<Series>;
}

/// Reject limits outside `1..=MAX_FETCH_LIMIT`
pub fn check_limit(limit: u32) -> Result<()> {
    if limit == 0 || limit > MAX_FETCH_LIMIT {
        return Err(crate::AdapterError::InvalidRequest(format!(
            "limit {} out of range 1..={}",
            limit, MAX_FETCH_LIMIT
        )));
    }
    Ok(())
}
