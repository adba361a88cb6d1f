//! # Signal Engine - EMA Computation and Signal Derivation
//!
//! ## Purpose
//!
//! Pure, stateless analysis of one [`Series`]: computes the four configured EMA
//! lines, derives the per-bar touch and crossover lines, and reports the values
//! for the most recent bar. Every call recomputes from scratch; nothing is
//! cached between cycles.
//!
//! ## Signal Rules
//!
//! - **Touch**: `low[i] <= EMA_trend[i] <= high[i]`
//! - **Crossover**: `fast[i] > slow[i] && fast[i-1] <= slow[i-1]`
//! - **Combined**: fast/medium and medium/slow crossovers on the same bar
//!
//! Any rule whose EMA inputs are undefined at the relevant index is `false`.

use serde::Serialize;
use types::{Series, Timeframe, TradingPair};

use crate::error::{Result, StrategyError};
use crate::indicators::{ema_line, EmaLine};
use crate::signals::{combined_line, cross_line, touch_line, SignalFlags};

/// The four EMA periods the engine tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmaPeriods {
    pub fast: usize,
    pub medium: usize,
    pub slow: usize,
    pub trend: usize,
}

impl Default for EmaPeriods {
    fn default() -> Self {
        Self {
            fast: 9,
            medium: 21,
            slow: 50,
            trend: 200,
        }
    }
}

impl EmaPeriods {
    /// Every period at least 1, and `fast < medium < slow`
    pub fn validate(&self) -> Result<()> {
        if self.fast == 0 || self.medium == 0 || self.slow == 0 || self.trend == 0 {
            return Err(StrategyError::configuration("EMA periods must be at least 1"));
        }
        if !(self.fast < self.medium && self.medium < self.slow) {
            return Err(StrategyError::configuration(format!(
                "EMA periods must satisfy fast < medium < slow (got {}/{}/{})",
                self.fast, self.medium, self.slow
            )));
        }
        Ok(())
    }
}

/// EMA values on the last bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmaSnapshot {
    pub fast: Option<f64>,
    pub medium: Option<f64>,
    pub slow: Option<f64>,
    pub trend: Option<f64>,
}

/// Last-bar result of one engine run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalReport {
    pub pair: TradingPair,
    pub timeframe: Timeframe,
    pub timestamp_ms: i64,
    pub close: f64,
    pub emas: EmaSnapshot,
    pub flags: SignalFlags,
    pub bars_analyzed: usize,
}

/// Full per-bar lines, index-aligned with the series
#[derive(Debug, Clone, PartialEq)]
pub struct SignalAnalysis {
    pub fast: EmaLine,
    pub medium: EmaLine,
    pub slow: EmaLine,
    pub trend: EmaLine,
    pub touch: Vec<bool>,
    pub cross_fast_medium: Vec<bool>,
    pub cross_medium_slow: Vec<bool>,
    pub combined: Vec<bool>,
}

impl SignalAnalysis {
    pub fn len(&self) -> usize {
        self.touch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touch.is_empty()
    }

    /// Flags at one index (all false past the end)
    pub fn flags_at(&self, i: usize) -> SignalFlags {
        let at = |line: &[bool]| line.get(i).copied().unwrap_or(false);
        SignalFlags {
            touch_trend_ema: at(&self.touch),
            cross_fast_medium: at(&self.cross_fast_medium),
            cross_medium_slow: at(&self.cross_medium_slow),
            combined_cross: at(&self.combined),
        }
    }
}

/// Stateless EMA signal engine
#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    periods: EmaPeriods,
}

impl SignalEngine {
    pub fn new(periods: EmaPeriods) -> Result<Self> {
        periods.validate()?;
        Ok(Self { periods })
    }

    pub fn periods(&self) -> EmaPeriods {
        self.periods
    }

    /// Compute every EMA and signal line over the series
    pub fn analyze(&self, series: &Series) -> SignalAnalysis {
        let closes = series.closes();

        let fast = ema_line(&closes, self.periods.fast);
        let medium = ema_line(&closes, self.periods.medium);
        let slow = ema_line(&closes, self.periods.slow);
        let trend = ema_line(&closes, self.periods.trend);

        let touch = touch_line(series.bars(), &trend);
        let cross_fast_medium = cross_line(&fast, &medium);
        let cross_medium_slow = cross_line(&medium, &slow);
        let combined = combined_line(&cross_fast_medium, &cross_medium_slow);

        SignalAnalysis {
            fast,
            medium,
            slow,
            trend,
            touch,
            cross_fast_medium,
            cross_medium_slow,
            combined,
        }
    }

    /// Report EMA values and signal flags for the most recent bar
    pub fn compute(&self, series: &Series) -> Result<SignalReport> {
        let last = series.last().copied().ok_or(StrategyError::InsufficientData {
            required: 1,
            available: 0,
        })?;

        let analysis = self.analyze(series);
        let i = series.len() - 1;

        Ok(SignalReport {
            pair: series.pair().clone(),
            timeframe: series.timeframe(),
            timestamp_ms: last.timestamp_ms,
            close: last.close,
            emas: EmaSnapshot {
                fast: analysis.fast.get(i),
                medium: analysis.medium.get(i),
                slow: analysis.slow.get(i),
                trend: analysis.trend.get(i),
            },
            flags: analysis.flags_at(i),
            bars_analyzed: series.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::Bar;

    fn series_from(bars: Vec<Bar>) -> Series {
        Series::new(
            TradingPair::new("BTC", "USDT").unwrap(),
            Timeframe::OneDay,
            bars,
        )
        .unwrap()
    }

    fn flat_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * 60_000, c, c, c, c, 1.0))
            .collect()
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        let engine = SignalEngine::default();
        let err = engine.compute(&series_from(vec![])).unwrap_err();
        assert!(matches!(
            err,
            StrategyError::InsufficientData {
                required: 1,
                available: 0
            }
        ));
    }

    #[test]
    fn test_short_series_reports_without_trend() {
        let engine = SignalEngine::default();
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let report = engine.compute(&series_from(flat_bars(&closes))).unwrap();

        assert_eq!(report.bars_analyzed, 10);
        assert_eq!(report.close, 10.0);
        assert_eq!(report.timestamp_ms, 9 * 60_000);
        assert_eq!(report.emas.fast, Some(6.0));
        assert_eq!(report.emas.medium, None);
        assert_eq!(report.emas.trend, None);
        assert!(!report.flags.touch_trend_ema);
    }

    #[test]
    fn test_touch_scenario() {
        // Period-1 trend EMA equals the close, so the bar range decides
        let engine = SignalEngine::new(EmaPeriods {
            fast: 1,
            medium: 2,
            slow: 3,
            trend: 1,
        })
        .unwrap();

        let touching = series_from(vec![Bar::new(0, 100.0, 110.0, 90.0, 100.0, 1.0)]);
        let report = engine.compute(&touching).unwrap();
        assert_eq!(report.emas.trend, Some(100.0));
        assert!(report.flags.touch_trend_ema);
    }

    #[test]
    fn test_touch_requires_low_at_or_below_ema() {
        let engine = SignalEngine::new(EmaPeriods {
            fast: 1,
            medium: 2,
            slow: 3,
            trend: 2,
        })
        .unwrap();

        // trend EMA at index 1 = mean(100, 100) = 100
        let series = series_from(vec![
            Bar::new(0, 100.0, 100.0, 100.0, 100.0, 1.0),
            Bar::new(1, 100.0, 110.0, 90.0, 100.0, 1.0),
        ]);
        assert!(engine.compute(&series).unwrap().flags.touch_trend_ema);

        let series = series_from(vec![
            Bar::new(0, 100.0, 100.0, 100.0, 100.0, 1.0),
            Bar::new(1, 101.0, 110.0, 101.0, 101.0, 1.0),
        ]);
        let report = engine.compute(&series).unwrap();
        assert_eq!(report.emas.trend, Some(100.5));
        assert!(!report.flags.touch_trend_ema);
    }

    #[test]
    fn test_fast_cross_alone_is_not_combined() {
        let engine = SignalEngine::new(EmaPeriods {
            fast: 1,
            medium: 2,
            slow: 3,
            trend: 3,
        })
        .unwrap();

        // fast(1) = close; medium(2) and slow(3) lag. A dip inside an uptrend
        // makes fast cross medium again while medium never left slow.
        let closes = [1.0, 2.0, 3.0, 4.0, 3.0, 6.0];
        let analysis = engine.analyze(&series_from(flat_bars(&closes)));

        assert!(analysis.cross_fast_medium[5]);
        assert!(!analysis.cross_medium_slow[5]);
        assert!(!analysis.combined[5]);
    }

    #[test]
    fn test_combined_when_both_cross_same_bar() {
        let engine = SignalEngine::new(EmaPeriods {
            fast: 1,
            medium: 2,
            slow: 3,
            trend: 3,
        })
        .unwrap();

        // Falling then a sharp jump: every faster line crosses above its slower
        // neighbour on the final bar.
        let closes = [10.0, 9.0, 8.0, 7.0, 20.0];
        let analysis = engine.analyze(&series_from(flat_bars(&closes)));

        assert!(analysis.cross_fast_medium[4]);
        assert!(analysis.cross_medium_slow[4]);
        assert!(analysis.combined[4]);
        assert!(analysis.flags_at(4).combined_cross);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let engine = SignalEngine::default();
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + (i as f64 * 0.37).sin() * 5.0).collect();
        let series = series_from(flat_bars(&closes));

        let a = engine.compute(&series).unwrap();
        let b = engine.compute(&series).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.emas.trend.map(f64::to_bits),
            b.emas.trend.map(f64::to_bits)
        );
    }

    #[test]
    fn test_invalid_periods_rejected() {
        assert!(SignalEngine::new(EmaPeriods {
            fast: 0,
            ..EmaPeriods::default()
        })
        .is_err());
        assert!(SignalEngine::new(EmaPeriods {
            fast: 50,
            medium: 21,
            slow: 9,
            trend: 200
        })
        .is_err());
    }
}
