//! Technical indicators for signal generation

/// Exponential Moving Average calculator
///
/// Undefined until `period` values have been seen; the first defined value is
/// the simple mean of those values, after which the standard recurrence with
/// `alpha = 2 / (period + 1)` applies.
#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage {
    period: usize,
    alpha: f64,
    count: usize,
    seed_sum: f64,
    current: Option<f64>,
}

impl ExponentialMovingAverage {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            count: 0,
            seed_sum: 0.0,
            current: None,
        }
    }

    /// Add a new value and return current EMA
    pub fn update(&mut self, value: f64) -> Option<f64> {
        if self.period == 0 {
            return None;
        }

        self.count += 1;

        self.current = match self.current {
            Some(prev) => Some(self.alpha * value + (1.0 - self.alpha) * prev),
            None => {
                self.seed_sum += value;
                if self.count == self.period {
                    Some(self.seed_sum / self.period as f64)
                } else {
                    None
                }
            }
        };

        self.current
    }

    /// Get current EMA without adding new value
    pub fn current(&self) -> Option<f64> {
        self.current
    }

    /// Check if indicator is ready (has enough data points)
    pub fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Smoothing factor `2 / (period + 1)`
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

/// EMA values aligned by index with the bars they were computed from
#[derive(Debug, Clone, PartialEq)]
pub struct EmaLine {
    pub period: usize,
    pub values: Vec<Option<f64>>,
}

impl EmaLine {
    /// Compute the full line over a close series
    pub fn from_values(period: usize, closes: &[f64]) -> Self {
        let mut ema = ExponentialMovingAverage::new(period);
        let values = closes.iter().map(|&close| ema.update(close)).collect();
        Self { period, values }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Convenience wrapper around [`EmaLine::from_values`]
pub fn ema_line(closes: &[f64], period: usize) -> EmaLine {
    EmaLine::from_values(period, closes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seed_and_recurrence() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let line = ema_line(&closes, 9);

        assert_eq!(line.len(), 10);
        assert!(line.values[..8].iter().all(Option::is_none));
        assert_eq!(line.get(8), Some(5.0)); // mean of 1..=9
        assert_eq!(line.get(9), Some(6.0)); // 0.2 * 10 + 0.8 * 5
    }

    #[test]
    fn test_streaming_matches_line() {
        let closes = [10.0, 11.0, 12.5, 11.75, 13.0, 12.0];
        let line = ema_line(&closes, 3);

        let mut ema = ExponentialMovingAverage::new(3);
        for (i, &close) in closes.iter().enumerate() {
            assert_eq!(ema.update(close), line.values[i]);
        }
        assert!(ema.is_ready());
        assert_eq!(ema.current(), line.last());
    }

    #[test]
    fn test_short_series_is_undefined() {
        let line = ema_line(&[1.0, 2.0, 3.0], 5);
        assert!(line.values.iter().all(Option::is_none));
        assert_eq!(line.last(), None);
    }

    #[test]
    fn test_period_one_tracks_closes() {
        let closes = [3.0, 7.0, 5.0];
        let line = ema_line(&closes, 1);
        assert_eq!(line.values, vec![Some(3.0), Some(7.0), Some(5.0)]);
    }

    #[test]
    fn test_zero_period_never_defined() {
        let mut ema = ExponentialMovingAverage::new(0);
        assert_eq!(ema.update(1.0), None);
        assert!(!ema.is_ready());
    }
}
