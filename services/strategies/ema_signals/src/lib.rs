//! # EMA Signals Strategy - Trend Touch and Crossover Detection
//!
//! ## Purpose
//!
//! Polls exchange candlestick data on a fixed cadence, computes the 9/21/50/200
//! exponential moving averages over the fetched window, and emits boolean
//! signals for the most recent bar: the candle touching the trend EMA, and a
//! staged crossover where EMA 9 crosses above EMA 21 on the same bar that
//! EMA 21 crosses above EMA 50. Reports go to the console or to InfluxDB.
//!
//! ## Integration Points
//!
//! - **Input Sources**: any [`adapter_service::CandleFetcher`]; the binary wires
//!   the Binance REST kline collector
//! - **Output Destinations**: [`signal_output::ConsoleOutput`] or
//!   [`signal_output::InfluxOutput`] (InfluxDB v2 line protocol)
//! - **Configuration**: `service_config::ServiceConfig` converted into a typed
//!   [`StrategyConfig`]
//! - **Monitoring**: `tracing` logs with periodic metrics summaries
//!
//! ## Architecture Role
//!
//! ```text
//! Binance REST → [CandleFetcher] → [SignalEngine] → [SignalSink] → sleep → next pair
//!       ↓               ↓                 ↓               ↓
//!  Kline arrays     Validated Series  EMA lines       Console block
//!  Rate limiting    Status mapping    Touch/Cross     Influx record
//! ```
//!
//! The engine is pure and recomputes everything from the fetched window on
//! every cycle. The loop owns all mutable state (round-robin cursor, failure
//! counters, metrics) and never runs cycles concurrently.
//!
//! ## Examples
//!
//! ### Analyzing a Series Directly
//! ```rust
//! use ema_signals::{EmaPeriods, SignalEngine};
//! use types::{Bar, Series, Timeframe, TradingPair};
//!
//! let bars: Vec<Bar> = (1..=10)
//!     .map(|i| Bar::new(i * 60_000, i as f64, i as f64, i as f64, i as f64, 1.0))
//!     .collect();
//! let series = Series::new("BTC/USDT".parse().unwrap(), Timeframe::OneMinute, bars).unwrap();
//!
//! let engine = SignalEngine::new(EmaPeriods::default()).unwrap();
//! let report = engine.compute(&series).unwrap();
//!
//! assert_eq!(report.emas.fast, Some(6.0));
//! assert_eq!(report.emas.trend, None);
//! assert!(!report.flags.touch_trend_ema);
//! ```
//!
//! ### Running the Loop
//! ```rust,no_run
//! use std::sync::Arc;
//! use adapter_service::BinanceKlineCollector;
//! use ema_signals::{ConsoleOutput, EmaSignalStrategy, StrategyConfig};
//! use service_config::ServiceConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = StrategyConfig::try_from(&ServiceConfig::default())?;
//! let fetcher = Arc::new(BinanceKlineCollector::new(config.binance_config())?);
//! let sink = Arc::new(ConsoleOutput::stdout());
//!
//! let mut strategy = EmaSignalStrategy::new(config, fetcher, sink)?;
//! strategy.start().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod retry;
pub mod signal_output;
pub mod signals;
pub mod strategy;

pub use config::StrategyConfig;
pub use engine::{EmaPeriods, EmaSnapshot, SignalAnalysis, SignalEngine, SignalReport};
pub use error::{Result, StrategyError};
pub use indicators::{ema_line, EmaLine, ExponentialMovingAverage};
pub use metrics::{MetricsCollector, StrategyMetrics};
pub use retry::{Backoff, RetryPolicy};
pub use signal_output::{ConsoleOutput, InfluxConfig, InfluxOutput, SignalSink};
pub use signals::{SignalFlags, SignalStats};
pub use strategy::{CycleOutcome, EmaSignalStrategy};
