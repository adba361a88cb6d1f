//! Mathematical properties of the EMA signal engine

use ema_signals::{ema_line, EmaPeriods, SignalEngine};
use proptest::prelude::*;
use types::{Bar, Series, Timeframe, TradingPair};

fn series_from_closes(closes: &[f64], spread: f64) -> Series {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(i as i64 * 60_000, c, c + spread, c - spread, c, 1.0))
        .collect();
    Series::new(
        TradingPair::new("ETH", "USDT").unwrap(),
        Timeframe::OneMinute,
        bars,
    )
    .unwrap()
}

fn small_engine() -> SignalEngine {
    SignalEngine::new(EmaPeriods {
        fast: 3,
        medium: 5,
        slow: 8,
        trend: 13,
    })
    .unwrap()
}

prop_compose! {
    fn closes_strategy(min_len: usize, max_len: usize)
        (closes in prop::collection::vec(1.0f64..10_000.0, min_len..max_len)) -> Vec<f64> {
        closes
    }
}

proptest! {
    #[test]
    fn seed_is_mean_of_first_period_closes(
        closes in closes_strategy(1, 120),
        period in 1usize..40,
    ) {
        let line = ema_line(&closes, period);
        prop_assert_eq!(line.len(), closes.len());

        if closes.len() >= period {
            let mean = closes[..period].iter().sum::<f64>() / period as f64;
            prop_assert_eq!(line.get(period - 1), Some(mean));
            prop_assert!(line.values[..period - 1].iter().all(Option::is_none));
        } else {
            prop_assert!(line.values.iter().all(Option::is_none));
        }
    }

    #[test]
    fn recurrence_holds_exactly(
        closes in closes_strategy(1, 120),
        period in 1usize..40,
    ) {
        let line = ema_line(&closes, period);
        let alpha = 2.0 / (period as f64 + 1.0);

        for i in period..closes.len() {
            let prev = line.get(i - 1).unwrap();
            let expected = alpha * closes[i] + (1.0 - alpha) * prev;
            prop_assert_eq!(line.get(i).map(f64::to_bits), Some(expected.to_bits()));
        }
    }

    #[test]
    fn touch_matches_bar_range(
        closes in closes_strategy(1, 80),
        spread in 0.0f64..50.0,
    ) {
        let series = series_from_closes(&closes, spread);
        let analysis = small_engine().analyze(&series);

        for (i, bar) in series.bars().iter().enumerate() {
            let expected = analysis
                .trend
                .get(i)
                .is_some_and(|ema| bar.low <= ema && ema <= bar.high);
            prop_assert_eq!(analysis.touch[i], expected);
        }
    }

    #[test]
    fn cross_is_strict_transition(closes in closes_strategy(2, 80)) {
        let series = series_from_closes(&closes, 1.0);
        let analysis = small_engine().analyze(&series);

        prop_assert!(!analysis.cross_fast_medium[0]);
        for i in 1..closes.len() {
            let expected = match (
                analysis.fast.get(i),
                analysis.medium.get(i),
                analysis.fast.get(i - 1),
                analysis.medium.get(i - 1),
            ) {
                (Some(f), Some(m), Some(fp), Some(mp)) => f > m && fp <= mp,
                _ => false,
            };
            prop_assert_eq!(analysis.cross_fast_medium[i], expected);
        }
    }

    #[test]
    fn combined_is_same_bar_conjunction(closes in closes_strategy(1, 80)) {
        let series = series_from_closes(&closes, 1.0);
        let analysis = small_engine().analyze(&series);

        for i in 0..closes.len() {
            prop_assert_eq!(
                analysis.combined[i],
                analysis.cross_fast_medium[i] && analysis.cross_medium_slow[i]
            );
        }
    }

    #[test]
    fn compute_is_idempotent(closes in closes_strategy(1, 250)) {
        let series = series_from_closes(&closes, 2.5);
        let engine = SignalEngine::default();

        let first = engine.compute(&series).unwrap();
        let second = engine.compute(&series).unwrap();
        prop_assert_eq!(
            first.emas.fast.map(f64::to_bits),
            second.emas.fast.map(f64::to_bits)
        );
        prop_assert_eq!(first, second);
    }

    #[test]
    fn short_series_never_touches(closes in closes_strategy(1, 200)) {
        let series = series_from_closes(&closes, 10_000.0);
        let analysis = SignalEngine::default().analyze(&series);
        prop_assert!(analysis.touch.iter().all(|&t| !t));
    }
}

#[test]
fn first_nine_of_one_to_ten() {
    let closes: Vec<f64> = (1..=10).map(f64::from).collect();
    let line = ema_line(&closes, 9);
    assert_eq!(line.get(8), Some(5.0));
    assert_eq!(line.get(9), Some(6.0));
}
