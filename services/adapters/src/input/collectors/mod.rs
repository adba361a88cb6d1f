//! Venue-specific data collectors

pub mod binance;

pub use binance::{BinanceKlineCollector, BinanceRestConfig};
