//! Strategy configuration
//!
//! Typed view over [`ServiceConfig`]: every string from the config file is
//! parsed here, so a `StrategyConfig` that exists is ready to run.

use adapter_service::input::check_limit;
use adapter_service::BinanceRestConfig;
use service_config::ServiceConfig;
use std::time::Duration;
use types::{Timeframe, TradingPair, VenueId};

use crate::engine::EmaPeriods;
use crate::error::StrategyError;
use crate::logging::LogFormat;
use crate::retry::{Backoff, RetryPolicy};
use crate::signal_output::InfluxConfig;

#[derive(Debug, Clone)]
pub struct StrategyConfig {
    /// Exchange to poll
    pub venue: VenueId,
    pub rest_url: String,
    pub requests_per_minute: u32,
    pub request_timeout: Duration,

    /// Pairs visited round-robin, one per cycle
    pub pairs: Vec<TradingPair>,
    pub timeframe: Timeframe,
    /// Bars requested per fetch
    pub limit: u32,
    /// Sleep after a successful cycle
    pub poll_interval: Duration,

    pub periods: EmaPeriods,
    pub retry: RetryPolicy,

    /// InfluxDB sink settings; `None` selects console output
    pub persistence: Option<InfluxConfig>,

    pub log_level: String,
    pub log_format: LogFormat,
    /// Log a metrics summary every N cycles (0 disables)
    pub metrics_every_cycles: u64,
}

impl StrategyConfig {
    /// Connection settings for the Binance collector
    pub fn binance_config(&self) -> BinanceRestConfig {
        BinanceRestConfig {
            venue: self.venue,
            base_url: self.rest_url.clone(),
            request_timeout: self.request_timeout,
            requests_per_minute: self.requests_per_minute,
        }
    }
}

impl TryFrom<&ServiceConfig> for StrategyConfig {
    type Error = StrategyError;

    fn try_from(config: &ServiceConfig) -> Result<Self, Self::Error> {
        let venue: VenueId = config
            .exchange
            .venue
            .parse()
            .map_err(|e| StrategyError::configuration(format!("exchange.venue: {}", e)))?;

        let pairs = config
            .watch
            .symbols
            .iter()
            .map(|s| s.trim().parse::<TradingPair>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StrategyError::configuration(format!("watch.symbols: {}", e)))?;
        if pairs.is_empty() {
            return Err(StrategyError::configuration("watch.symbols: no symbols configured"));
        }

        let timeframe: Timeframe = config
            .watch
            .timeframe
            .parse()
            .map_err(|e| StrategyError::configuration(format!("watch.timeframe: {}", e)))?;

        check_limit(config.watch.limit)
            .map_err(|e| StrategyError::configuration(format!("watch.limit: {}", e)))?;

        let periods = EmaPeriods {
            fast: config.indicators.fast,
            medium: config.indicators.medium,
            slow: config.indicators.slow,
            trend: config.indicators.trend,
        };
        periods.validate()?;

        let backoff = match config.retry.strategy.as_str() {
            "fixed" => Backoff::Fixed(Duration::from_secs(config.retry.backoff_secs)),
            "exponential" => Backoff::Exponential {
                base: Duration::from_secs(config.retry.backoff_secs),
                max: Duration::from_secs(config.retry.max_backoff_secs),
            },
            other => {
                return Err(StrategyError::configuration(format!(
                    "retry.strategy: unknown strategy '{}'",
                    other
                )))
            }
        };

        let persistence = config.persistence.enabled.then(|| InfluxConfig {
            url: config.persistence.url.clone(),
            token: config.persistence.token.clone(),
            org: config.persistence.org.clone(),
            bucket: config.persistence.bucket.clone(),
            measurement: config.persistence.measurement.clone(),
            timeout: Duration::from_millis(config.persistence.timeout_ms),
        });

        let log_format = config
            .logging
            .format
            .parse()
            .map_err(|e| StrategyError::configuration(format!("logging.format: {}", e)))?;

        Ok(Self {
            venue,
            rest_url: config.exchange.rest_url.clone(),
            requests_per_minute: config.exchange.requests_per_minute,
            request_timeout: Duration::from_millis(config.exchange.request_timeout_ms),
            pairs,
            timeframe,
            limit: config.watch.limit,
            poll_interval: Duration::from_secs(config.watch.poll_interval_secs),
            periods,
            retry: RetryPolicy {
                backoff,
                max_consecutive_failures: config.retry.max_consecutive_failures,
            },
            persistence,
            log_level: config.logging.level.clone(),
            log_format,
            metrics_every_cycles: config.logging.metrics_every_cycles,
        })
    }
}
