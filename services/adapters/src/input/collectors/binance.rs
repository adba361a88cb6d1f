//! Binance REST kline collector
//!
//! Pulls recent OHLCV candles from the public klines endpoint. No
//! credentials are needed; the public endpoint only enforces request weight.
//!
//! ## Data Format Reference
//!
//! `GET /api/v3/klines?symbol=BTCUSDT&interval=1d&limit=500`
//!
//! ```json
//! [
//!   [
//!     1499040000000,      // Open time (ms)
//!     "0.01634790",       // Open
//!     "0.80000000",       // High
//!     "0.01575800",       // Low
//!     "0.01577100",       // Close
//!     "148976.11427815",  // Volume
//!     1499644799999,      // Close time
//!     "2434.19055334",    // Quote asset volume
//!     308,                // Number of trades
//!     "1756.87402397",    // Taker buy base asset volume
//!     "28.46694368",      // Taker buy quote asset volume
//!     "0"                 // Ignore
//!   ]
//! ]
//! ```
//!
//! Errors come back as `{"code": -1121, "msg": "Invalid symbol."}` with a
//! non-2xx status.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use types::{Bar, Series, Timeframe, TradingPair, VenueId};

use crate::input::components::parsing_utils::{parse_f64_field, parse_i64_field};
use crate::input::{check_limit, CandleFetcher};
use crate::{AdapterError, RateLimiter, Result};

/// Minimum number of columns a kline row must carry (open time .. volume)
const KLINE_MIN_COLUMNS: usize = 6;

/// Connection settings for the Binance REST API
#[derive(Debug, Clone)]
pub struct BinanceRestConfig {
    /// Venue identity (binance.com or binance.us)
    pub venue: VenueId,
    /// Base URL, e.g. `https://api.binance.com`
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Client-side request budget
    pub requests_per_minute: u32,
}

impl Default for BinanceRestConfig {
    fn default() -> Self {
        Self {
            venue: VenueId::Binance,
            base_url: VenueId::Binance.default_rest_url().to_string(),
            request_timeout: Duration::from_secs(10),
            requests_per_minute: 50,
        }
    }
}

/// Error body returned by Binance on rejected requests
#[derive(Debug, Deserialize)]
struct BinanceErrorBody {
    #[allow(dead_code)]
    code: i64,
    msg: String,
}

/// Candle collector backed by the Binance klines endpoint
pub struct BinanceKlineCollector {
    config: BinanceRestConfig,
    client: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl BinanceKlineCollector {
    /// Create a collector with its own HTTP client and rate limiter
    pub fn new(config: BinanceRestConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("ema-signals/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AdapterError::Configuration(format!("HTTP client: {}", e)))?;

        let rate_limiter = RateLimiter::for_venue(config.venue, config.requests_per_minute);

        Ok(Self {
            config,
            client,
            rate_limiter,
        })
    }

    fn klines_url(&self) -> String {
        format!("{}/api/v3/klines", self.config.base_url.trim_end_matches('/'))
    }

    fn map_transport_error(&self, error: reqwest::Error) -> AdapterError {
        if error.is_timeout() {
            AdapterError::ConnectionTimeout {
                venue: self.config.venue,
                timeout_ms: self.config.request_timeout.as_millis() as u64,
            }
        } else {
            AdapterError::ConnectionFailed {
                venue: self.config.venue,
                reason: error.to_string(),
            }
        }
    }

    fn map_status(&self, status: reqwest::StatusCode, body: &str) -> AdapterError {
        let venue = self.config.venue;
        match status.as_u16() {
            429 | 418 => AdapterError::RateLimitExceeded { venue },
            401 | 403 => AdapterError::AuthenticationFailed { venue },
            code => {
                let message = serde_json::from_str::<BinanceErrorBody>(body)
                    .map(|b| b.msg)
                    .unwrap_or_else(|_| body.chars().take(200).collect());
                AdapterError::ExchangeRejected {
                    venue,
                    status: code,
                    message,
                }
            }
        }
    }
}

/// Convert a klines JSON array into bars, validating each row
pub fn parse_kline_rows(venue: VenueId, payload: &Value) -> Result<Vec<Bar>> {
    let rows = payload
        .as_array()
        .ok_or_else(|| AdapterError::parse(venue, "klines payload", "expected array"))?;

    let mut bars = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let columns = row.as_array().ok_or_else(|| {
            AdapterError::parse(venue, format!("kline row {}", index), "expected array")
        })?;
        if columns.len() < KLINE_MIN_COLUMNS {
            return Err(AdapterError::parse(
                venue,
                format!("kline row {}", index),
                format!("expected at least {} columns, got {}", KLINE_MIN_COLUMNS, columns.len()),
            ));
        }

        let bar = Bar::new(
            parse_i64_field(&columns[0], venue, "open_time")?,
            parse_f64_field(&columns[1], venue, "open")?,
            parse_f64_field(&columns[2], venue, "high")?,
            parse_f64_field(&columns[3], venue, "low")?,
            parse_f64_field(&columns[4], venue, "close")?,
            parse_f64_field(&columns[5], venue, "volume")?,
        );
        bar.validate()
            .map_err(|e| AdapterError::parse(venue, format!("kline row {}", index), e))?;
        bars.push(bar);
    }

    Ok(bars)
}

#[async_trait]
impl CandleFetcher for BinanceKlineCollector {
    fn venue(&self) -> VenueId {
        self.config.venue
    }

    async fn fetch(&self, pair: &TradingPair, timeframe: Timeframe, limit: u32) -> Result<Series> {
        check_limit(limit)?;

        self.rate_limiter.wait(self.config.venue).await;

        let symbol = pair.exchange_symbol();
        let limit_param = limit.to_string();
        debug!(
            "📡 GET klines {} {} limit={} from {}",
            symbol, timeframe, limit, self.config.venue
        );

        let response = self
            .client
            .get(self.klines_url())
            .query(&[
                ("symbol", symbol.as_str()),
                ("interval", timeframe.as_str()),
                ("limit", limit_param.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            let error = self.map_status(status, &body);
            warn!("⚠️ {} klines request for {} failed: {}", self.config.venue, pair, error);
            return Err(error);
        }

        let payload: Value = serde_json::from_str(&body)?;
        let bars = parse_kline_rows(self.config.venue, &payload)?;

        Series::new(pair.clone(), timeframe, bars)
            .map_err(|e| AdapterError::parse(self.config.venue, "kline ordering", e))
    }
}
