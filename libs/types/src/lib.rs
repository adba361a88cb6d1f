//! # Market Data Types Library
//!
//! Shared type system for the EMA signal services: candlestick bars, ordered
//! series, candle intervals, trading pairs and venues.
//!
//! ## Design Philosophy
//!
//! - **Validated Construction**: `Series` can only be built in strictly ascending
//!   timestamp order; pairs and timeframes are parsed, never assumed
//! - **Immutable Data**: a fetched `Series` exposes read-only accessors only
//! - **Wire-Friendly**: pairs and timeframes serialize as the strings operators
//!   write in configuration (`"BTC/USDT"`, `"1d"`)
//!
//! ## Quick Start
//!
//! ```rust
//! use types::{Bar, Series, Timeframe, TradingPair};
//!
//! let pair: TradingPair = "BTC/USDT".parse().unwrap();
//! let bars = vec![
//!     Bar::new(1_000, 10.0, 12.0, 9.0, 11.0, 5.0),
//!     Bar::new(2_000, 11.0, 13.0, 10.0, 12.0, 3.0),
//! ];
//! let series = Series::new(pair, Timeframe::OneMinute, bars).unwrap();
//!
//! assert_eq!(series.closes(), vec![11.0, 12.0]);
//! assert_eq!(series.pair().exchange_symbol(), "BTCUSDT");
//! ```
//!
//! ## Integration Points
//!
//! - **Adapters**: exchange collectors parse raw klines into `Bar`s and `Series`
//! - **Strategies**: the signal engine consumes a `Series` per cycle
//! - **Configuration**: `TradingPair`, `Timeframe` and `VenueId` parse from config strings

pub mod common;
pub mod market;

pub use common::{TradingPair, ValidationError, VenueId};
pub use market::{Bar, Series, Timeframe};
