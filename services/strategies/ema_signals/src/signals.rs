//! Signal definitions and derivation from EMA lines
//!
//! Every function here is pure and index-aligned with the bar series. A signal
//! is `false` wherever one of the EMA values it needs is undefined.

use serde::Serialize;
use types::Bar;

use crate::indicators::EmaLine;

/// Boolean signal flags for a single bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SignalFlags {
    /// Bar's high-low range spans the trend EMA
    pub touch_trend_ema: bool,
    /// Fast EMA crossed above medium EMA on this bar
    pub cross_fast_medium: bool,
    /// Medium EMA crossed above slow EMA on this bar
    pub cross_medium_slow: bool,
    /// Both crossovers on this same bar
    pub combined_cross: bool,
}

impl SignalFlags {
    pub fn any(&self) -> bool {
        self.touch_trend_ema || self.cross_fast_medium || self.cross_medium_slow || self.combined_cross
    }
}

/// `low <= ema <= high`, false when the EMA is undefined
pub fn touches(bar: &Bar, ema: Option<f64>) -> bool {
    ema.is_some_and(|value| bar.spans(value))
}

/// Strict upward crossover between index `i - 1` and `i`
///
/// Equality on the previous bar counts as "not yet crossed".
pub fn crossed_above(fast: &EmaLine, slow: &EmaLine, i: usize) -> bool {
    if i == 0 {
        return false;
    }

    match (fast.get(i), slow.get(i), fast.get(i - 1), slow.get(i - 1)) {
        (Some(fast_now), Some(slow_now), Some(fast_prev), Some(slow_prev)) => {
            fast_now > slow_now && fast_prev <= slow_prev
        }
        _ => false,
    }
}

/// Touch flag for every bar
pub fn touch_line(bars: &[Bar], trend: &EmaLine) -> Vec<bool> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| touches(bar, trend.get(i)))
        .collect()
}

/// Crossover flag for every index
pub fn cross_line(fast: &EmaLine, slow: &EmaLine) -> Vec<bool> {
    let len = fast.len().min(slow.len());
    (0..len).map(|i| crossed_above(fast, slow, i)).collect()
}

/// Same-bar AND of two crossover lines
pub fn combined_line(first: &[bool], second: &[bool]) -> Vec<bool> {
    first
        .iter()
        .zip(second.iter())
        .map(|(&a, &b)| a && b)
        .collect()
}

/// Signal generation statistics
#[derive(Debug, Default, Clone)]
pub struct SignalStats {
    pub reports: u64,
    pub touch_signals: u64,
    pub fast_medium_crosses: u64,
    pub medium_slow_crosses: u64,
    pub combined_signals: u64,
    pub last_signal_timestamp_ms: Option<i64>,
}

impl SignalStats {
    /// Update stats with the flags of a published report
    pub fn record(&mut self, flags: &SignalFlags, timestamp_ms: i64) {
        self.reports += 1;

        if flags.touch_trend_ema {
            self.touch_signals += 1;
        }
        if flags.cross_fast_medium {
            self.fast_medium_crosses += 1;
        }
        if flags.cross_medium_slow {
            self.medium_slow_crosses += 1;
        }
        if flags.combined_cross {
            self.combined_signals += 1;
        }

        if flags.any() {
            self.last_signal_timestamp_ms = Some(timestamp_ms);
        }
    }
}
