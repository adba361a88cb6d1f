//! # Adapters - Exchange Candle Collection Layer
//!
//! ## Purpose
//!
//! Stateless adapters that turn raw exchange REST payloads into validated
//! [`types::Series`] values. Each collector performs exactly one request per
//! call, maps every failure onto [`AdapterError`], and leaves retry decisions
//! to the caller.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Binance / Binance.US public klines endpoint
//! - **Output**: ordered `Series` handed to the strategy's polling loop
//! - **Rate Limiting**: per-venue `governor` quotas applied before each request
//! - **Error Handling**: HTTP status and transport failures classified into
//!   `AdapterError` variants; `is_transient()` drives log severity upstream
//!
//! ## Architecture Role
//!
//! ```text
//! Exchange REST ──► CandleFetcher (this crate) ──► SignalEngine ──► SignalSink
//! ```
//!
//! Adapters ARE format converters and validators. They are NOT business
//! logic: no indicator math, no signal generation, no persistence.
//!
//! ## Example
//!
//! ```rust,no_run
//! use adapter_service::{BinanceKlineCollector, BinanceRestConfig, CandleFetcher};
//! use types::{Timeframe, TradingPair};
//!
//! # async fn run() -> adapter_service::Result<()> {
//! let collector = BinanceKlineCollector::new(BinanceRestConfig::default())?;
//! let pair = TradingPair::new("BTC", "USDT").expect("valid pair");
//! let series = collector.fetch(&pair, Timeframe::OneDay, 500).await?;
//! println!("fetched {} bars", series.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod input;
pub mod rate_limit;

pub use error::{AdapterError, Result};
pub use input::collectors::{BinanceKlineCollector, BinanceRestConfig};
pub use input::{CandleFetcher, MAX_FETCH_LIMIT};
pub use rate_limit::RateLimiter;
