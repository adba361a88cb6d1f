//! Polling loop: fetch → compute → publish → sleep
//!
//! One pair per cycle, visited round-robin. Every cycle error is caught here,
//! logged and counted; the loop only stops when the retry policy has a
//! finite budget and one pair exhausts it.

use adapter_service::CandleFetcher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use types::TradingPair;

use crate::config::StrategyConfig;
use crate::engine::{SignalEngine, SignalReport};
use crate::error::{Result, StrategyError};
use crate::logging::LogEmoji;
use crate::metrics::MetricsCollector;
use crate::retry::RetryPolicy;
use crate::signal_output::SignalSink;
use crate::signals::SignalStats;

/// What a single scheduled cycle did
#[derive(Debug)]
pub enum CycleOutcome {
    Published(SignalReport),
    Failed {
        pair: TradingPair,
        error: StrategyError,
        consecutive_failures: u32,
    },
}

pub struct EmaSignalStrategy {
    config: StrategyConfig,
    fetcher: Arc<dyn CandleFetcher>,
    sink: Arc<dyn SignalSink>,
    engine: SignalEngine,
    retry: RetryPolicy,
    metrics: Arc<MetricsCollector>,
    stats: SignalStats,

    /// Index of the next pair to visit
    cursor: usize,
    /// Consecutive failures per pair, index-aligned with `config.pairs`
    failures: Vec<u32>,
}

impl EmaSignalStrategy {
    pub fn new(
        config: StrategyConfig,
        fetcher: Arc<dyn CandleFetcher>,
        sink: Arc<dyn SignalSink>,
    ) -> Result<Self> {
        if config.pairs.is_empty() {
            return Err(StrategyError::configuration("no trading pairs configured"));
        }

        let engine = SignalEngine::new(config.periods)?;
        let retry = config.retry;
        let failures = vec![0; config.pairs.len()];

        Ok(Self {
            config,
            fetcher,
            sink,
            engine,
            retry,
            metrics: Arc::new(MetricsCollector::new()),
            stats: SignalStats::default(),
            cursor: 0,
            failures,
        })
    }

    /// Shared handle to the loop's counters
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        Arc::clone(&self.metrics)
    }

    /// Fetch, analyze and publish one pair, with no sleeping
    pub async fn run_cycle(&self, pair: &TradingPair) -> Result<SignalReport> {
        debug!("Fetching {} {} bars for {}", self.config.limit, self.config.timeframe, pair);

        let series = match self
            .fetcher
            .fetch(pair, self.config.timeframe, self.config.limit)
            .await
        {
            Ok(series) => series,
            Err(e) => {
                self.metrics.increment_fetch_errors();
                return Err(e.into());
            }
        };

        if series.len() < self.engine.periods().trend {
            warn!(
                "{} {} only {} bars for {} (trend EMA needs {}); touch signal disabled",
                LogEmoji::WARNING,
                pair,
                series.len(),
                self.config.timeframe,
                self.engine.periods().trend
            );
        }

        let report = self.engine.compute(&series).inspect_err(|_| {
            self.metrics.increment_compute_errors();
        })?;

        if let Err(e) = self.sink.publish(&report).await {
            self.metrics.increment_publish_errors();
            return Err(e);
        }
        self.metrics.increment_reports();

        Ok(report)
    }

    /// Run the next scheduled cycle, then sleep
    ///
    /// Sleeps the poll interval after success and the retry backoff after a
    /// failure. Only returns `Err` when the retry budget is exhausted.
    pub async fn step(&mut self) -> Result<CycleOutcome> {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.config.pairs.len();
        let pair = self.config.pairs[index].clone();

        let result = self.run_cycle(&pair).await;
        let cycles = self.metrics.increment_cycles();

        let (outcome, delay) = match result {
            Ok(report) => {
                self.failures[index] = 0;
                self.record_signals(&report);
                (CycleOutcome::Published(report), self.config.poll_interval)
            }
            Err(error) => {
                self.failures[index] = self.failures[index].saturating_add(1);
                let consecutive_failures = self.failures[index];

                if error.is_transient() {
                    warn!(
                        "{} Cycle for {} failed ({} in a row): {}",
                        LogEmoji::ERROR,
                        pair,
                        consecutive_failures,
                        error
                    );
                } else {
                    error!(
                        "{} Cycle for {} failed ({} in a row): {}",
                        LogEmoji::ERROR,
                        pair,
                        consecutive_failures,
                        error
                    );
                }

                if self.retry.should_give_up(consecutive_failures) {
                    self.log_metrics();
                    return Err(StrategyError::RetriesExhausted {
                        pair: pair.to_string(),
                        attempts: consecutive_failures,
                        last_error: error.to_string(),
                    });
                }

                let delay = self.retry.delay(consecutive_failures);
                (
                    CycleOutcome::Failed {
                        pair,
                        error,
                        consecutive_failures,
                    },
                    delay,
                )
            }
        };

        if self.config.metrics_every_cycles > 0 && cycles % self.config.metrics_every_cycles == 0 {
            self.log_metrics();
        }

        self.sleep(delay).await;
        Ok(outcome)
    }

    /// Loop forever; returns only when the retry budget runs out
    pub async fn start(&mut self) -> Result<()> {
        info!(
            "{} Starting EMA signal loop: {} pair(s) from {} on {} every {:?} via {}",
            LogEmoji::START,
            self.config.pairs.len(),
            self.fetcher.venue(),
            self.config.timeframe,
            self.config.poll_interval,
            self.sink.name()
        );

        loop {
            self.step().await?;
        }
    }

    /// Log the metrics summary
    pub fn log_metrics(&self) {
        let m = self.metrics.get_metrics();
        info!(
            "{} cycles={} published={} signals={} errors(fetch/compute/publish)={}/{}/{} uptime={:?}",
            LogEmoji::CHART,
            m.cycles,
            m.reports_published,
            m.signals_generated,
            m.fetch_errors,
            m.compute_errors,
            m.publish_errors,
            self.metrics.uptime()
        );

        let s = &self.stats;
        let last_signal = s
            .last_signal_timestamp_ms
            .map_or_else(|| "never".to_string(), |ts| ts.to_string());
        info!(
            "{} touches={} crosses(fast/medium, medium/slow)={}/{} combined={} last_signal_ms={}",
            LogEmoji::CHART,
            s.touch_signals,
            s.fast_medium_crosses,
            s.medium_slow_crosses,
            s.combined_signals,
            last_signal
        );
    }

    fn record_signals(&mut self, report: &SignalReport) {
        self.stats.record(&report.flags, report.timestamp_ms);

        if report.flags.touch_trend_ema {
            self.metrics.increment_signals();
            info!(
                "{} {} {} touched the {} EMA at {}",
                LogEmoji::SIGNAL,
                report.pair,
                report.timeframe,
                self.engine.periods().trend,
                report.close
            );
        }
        if report.flags.combined_cross {
            self.metrics.increment_signals();
            info!(
                "{} {} {} EMA crossover {}/{}/{} confirmed",
                LogEmoji::SIGNAL,
                report.pair,
                report.timeframe,
                self.engine.periods().fast,
                self.engine.periods().medium,
                self.engine.periods().slow
            );
        }
    }

    async fn sleep(&self, delay: Duration) {
        if !delay.is_zero() {
            debug!("{} Sleeping {:?}", LogEmoji::CLOCK, delay);
            tokio::time::sleep(delay).await;
        }
    }
}
