//! Candlestick market data: bars, series and intervals

pub mod bar;
pub mod series;
pub mod timeframe;

pub use bar::Bar;
pub use series::Series;
pub use timeframe::Timeframe;
