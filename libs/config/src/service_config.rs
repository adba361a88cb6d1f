//! Service Configuration Module
//!
//! Provides layered configuration loading for the EMA signal service:
//! built-in defaults, then an optional TOML file, then `EMA_SIGNALS__*`
//! environment variables. Values stay stringly typed here; services convert
//! them into domain types at startup.

use crate::service as defaults;
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Main service configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServiceConfig {
    pub exchange: ExchangeSettings,
    pub watch: WatchSettings,
    pub indicators: IndicatorSettings,
    pub retry: RetrySettings,
    pub persistence: PersistenceSettings,
    pub logging: LoggingSettings,
}

/// Exchange REST connection settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExchangeSettings {
    pub venue: String,
    pub rest_url: String,
    pub requests_per_minute: u32,
    pub request_timeout_ms: u64,
}

/// What to watch and how often
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WatchSettings {
    /// Pairs visited round-robin, e.g. `["BTC/USDT", "ETH/USDT"]`
    pub symbols: Vec<String>,
    pub timeframe: String,
    /// Bars fetched per cycle (at most 1000)
    pub limit: u32,
    /// Pause after each successful cycle
    pub poll_interval_secs: u64,
}

/// EMA periods
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IndicatorSettings {
    pub fast: usize,
    pub medium: usize,
    pub slow: usize,
    pub trend: usize,
}

/// Retry policy applied after a failed cycle
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RetrySettings {
    /// "fixed" or "exponential"
    pub strategy: String,
    pub backoff_secs: u64,
    pub max_backoff_secs: u64,
    /// Consecutive failures of one pair before giving up; absent means never
    pub max_consecutive_failures: Option<u32>,
}

/// InfluxDB v2 sink settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PersistenceSettings {
    pub enabled: bool,
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
    pub measurement: String,
    pub timeout_ms: u64,
}

/// Logging settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    /// Log a metrics summary every N cycles (0 disables)
    pub metrics_every_cycles: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            exchange: ExchangeSettings {
                venue: defaults::exchange::VENUE.to_string(),
                rest_url: defaults::exchange::REST_URL.to_string(),
                requests_per_minute: defaults::exchange::REQUESTS_PER_MINUTE,
                request_timeout_ms: defaults::exchange::REQUEST_TIMEOUT_MS,
            },
            watch: WatchSettings {
                symbols: defaults::watch::SYMBOLS.iter().map(|s| s.to_string()).collect(),
                timeframe: defaults::watch::TIMEFRAME.to_string(),
                limit: defaults::watch::FETCH_LIMIT,
                poll_interval_secs: defaults::watch::POLL_INTERVAL_SECS,
            },
            indicators: IndicatorSettings {
                fast: defaults::indicators::FAST,
                medium: defaults::indicators::MEDIUM,
                slow: defaults::indicators::SLOW,
                trend: defaults::indicators::TREND,
            },
            retry: RetrySettings {
                strategy: defaults::retry::STRATEGY.to_string(),
                backoff_secs: defaults::retry::BACKOFF_SECS,
                max_backoff_secs: defaults::retry::MAX_BACKOFF_SECS,
                max_consecutive_failures: None,
            },
            persistence: PersistenceSettings {
                enabled: false,
                url: defaults::persistence::URL.to_string(),
                token: defaults::persistence::TOKEN.to_string(),
                org: defaults::persistence::ORG.to_string(),
                bucket: defaults::persistence::BUCKET.to_string(),
                measurement: defaults::persistence::MEASUREMENT.to_string(),
                timeout_ms: defaults::persistence::TIMEOUT_MS,
            },
            logging: LoggingSettings {
                level: defaults::logging::LEVEL.to_string(),
                format: defaults::logging::FORMAT.to_string(),
                metrics_every_cycles: defaults::logging::METRICS_EVERY_CYCLES,
            },
        }
    }
}

impl ServiceConfig {
    /// Load configuration: defaults → file (if given) → `EMA_SIGNALS__*` env vars
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, defaults::env::PREFIX)
    }

    /// Same as [`ServiceConfig::load`] with a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let base = Config::try_from(&Self::default())
            .context("Failed to serialize default configuration")?;

        let mut builder = Config::builder().add_source(base);

        if let Some(path) = path {
            info!("Loading configuration file: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator(defaults::env::SEPARATOR)
                .separator(defaults::env::SEPARATOR)
                .list_separator(",")
                .with_list_parse_key("watch.symbols")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Expand `${VAR}` references in persistence settings
    ///
    /// Only runs when persistence is enabled. An unresolvable token expands
    /// to empty and then falls back to `INFLUXDB_TOKEN`.
    pub fn expand_env_vars(&mut self) -> Result<()> {
        if !self.persistence.enabled {
            return Ok(());
        }

        let url = shellexpand::env(&self.persistence.url)
            .context("Failed to expand persistence URL")?;
        self.persistence.url = url.into_owned();

        self.persistence.token = match shellexpand::env(&self.persistence.token) {
            Ok(token) => token.into_owned(),
            Err(e) => {
                debug!("Persistence token not expandable: {}", e);
                String::new()
            }
        };

        if self.persistence.token.is_empty() {
            if let Ok(token) = std::env::var(defaults::persistence::TOKEN_ENV_VAR) {
                self.persistence.token = token;
            }
        }

        Ok(())
    }

    /// Validate ranges and cross-field requirements
    ///
    /// Fetch limit and EMA period rules belong to the components that use
    /// them and are checked when the typed strategy config is built.
    pub fn validate(&self) -> Result<()> {
        if self.watch.symbols.is_empty() {
            bail!("No symbols configured");
        }

        if self.watch.poll_interval_secs == 0 {
            bail!("Poll interval must be positive");
        }

        if self.exchange.requests_per_minute == 0 {
            bail!("Exchange requests_per_minute must be positive");
        }

        url::Url::parse(&self.exchange.rest_url)
            .with_context(|| format!("Invalid exchange REST URL: {}", self.exchange.rest_url))?;

        match self.retry.strategy.as_str() {
            "fixed" | "exponential" => {}
            other => bail!("Unknown retry strategy: {}", other),
        }
        if self.retry.backoff_secs == 0 {
            bail!("Retry backoff must be positive");
        }
        if self.retry.max_backoff_secs < self.retry.backoff_secs {
            bail!("Retry max_backoff_secs must not be below backoff_secs");
        }
        if self.retry.max_consecutive_failures == Some(0) {
            bail!("Retry max_consecutive_failures must be positive when set");
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => bail!("Unknown log format: {}", other),
        }

        if self.persistence.enabled {
            let p = &self.persistence;
            if p.url.is_empty() || p.org.is_empty() || p.bucket.is_empty() {
                bail!("Persistence enabled but url/org/bucket not configured");
            }
            if p.measurement.is_empty() {
                bail!("Persistence measurement name must not be empty");
            }
            url::Url::parse(&p.url)
                .with_context(|| format!("Invalid persistence URL: {}", p.url))?;
            if p.token.is_empty() {
                warn!("Persistence enabled without a token; writes will likely be rejected");
            }
        }

        if (self.watch.limit as usize) < self.indicators.trend {
            warn!(
                "Fetch limit {} is below the trend EMA period {}; touch signals will never fire",
                self.watch.limit, self.indicators.trend
            );
        }

        Ok(())
    }
}

/// Resolve which config file to read
///
/// Explicit path wins, then `EMA_SIGNALS_CONFIG_PATH`, then
/// `configs/ema_signals.toml` when it exists.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(defaults::env::CONFIG_PATH_VAR) {
        return Some(PathBuf::from(path));
    }

    let fallback = PathBuf::from(defaults::env::DEFAULT_CONFIG_PATH);
    fallback.exists().then_some(fallback)
}

/// Convenience function: resolve, load, expand and validate
pub fn load_config(explicit: Option<&Path>) -> Result<ServiceConfig> {
    let path = resolve_config_path(explicit);
    if path.is_none() {
        info!("No configuration file found, using defaults and environment");
    }

    let mut config = ServiceConfig::load(path.as_deref())?;
    config.expand_env_vars()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServiceConfig::default();
        config.validate().unwrap();
        assert_eq!(config.watch.limit, 500);
        assert_eq!(config.indicators.trend, 200);
        assert!(!config.persistence.enabled);
        assert_eq!(config.retry.max_consecutive_failures, None);
    }

    #[test]
    fn test_load_partial_file_over_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("ema_signals.toml");

        let config_content = r#"
[watch]
symbols = ["BTC/USDT"]
timeframe = "1d"
limit = 300
poll_interval_secs = 86400

[retry]
strategy = "exponential"
backoff_secs = 2
max_backoff_secs = 60
max_consecutive_failures = 4
"#;

        fs::write(&config_path, config_content).unwrap();

        let config =
            ServiceConfig::load_with_prefix(Some(&config_path), "EMA_SIGNALS_TEST_PARTIAL").unwrap();

        assert_eq!(config.watch.symbols, vec!["BTC/USDT".to_string()]);
        assert_eq!(config.watch.timeframe, "1d");
        assert_eq!(config.watch.limit, 300);
        assert_eq!(config.retry.strategy, "exponential");
        assert_eq!(config.retry.max_consecutive_failures, Some(4));
        // Untouched sections keep their defaults
        assert_eq!(config.exchange.rest_url, "https://api.binance.com");
        assert_eq!(config.indicators.fast, 9);
        config.validate().unwrap();
    }

    #[test]
    fn test_environment_override() {
        std::env::set_var("EMA_SIGNALS_TEST_ENV__WATCH__TIMEFRAME", "4h");
        std::env::set_var("EMA_SIGNALS_TEST_ENV__WATCH__SYMBOLS", "SOL/USDT,ADA/USDT");
        std::env::set_var("EMA_SIGNALS_TEST_ENV__PERSISTENCE__ENABLED", "true");

        let config = ServiceConfig::load_with_prefix(None, "EMA_SIGNALS_TEST_ENV").unwrap();

        assert_eq!(config.watch.timeframe, "4h");
        assert_eq!(
            config.watch.symbols,
            vec!["SOL/USDT".to_string(), "ADA/USDT".to_string()]
        );
        assert!(config.persistence.enabled);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ServiceConfig::default();
        config.watch.symbols.clear();
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.retry.strategy = "linear".to_string();
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.persistence.enabled = true;
        config.persistence.bucket.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_expansion() {
        std::env::set_var("EMA_SIGNALS_TEST_TOKEN_VALUE", "s3cret");

        let mut config = ServiceConfig::default();
        config.persistence.enabled = true;
        config.persistence.token = "${EMA_SIGNALS_TEST_TOKEN_VALUE}".to_string();
        config.expand_env_vars().unwrap();

        assert_eq!(config.persistence.token, "s3cret");
    }

    #[test]
    fn test_empty_or_unresolvable_token_falls_back() {
        // One test owns INFLUXDB_TOKEN so parallel tests never race on it
        std::env::remove_var("EMA_SIGNALS_TEST_TOKEN_UNSET");
        std::env::set_var(defaults::persistence::TOKEN_ENV_VAR, "fallback-tok");

        let mut config = ServiceConfig::default();
        config.persistence.enabled = true;
        config.persistence.token = String::new();
        config.expand_env_vars().unwrap();
        assert_eq!(config.persistence.token, "fallback-tok");

        let mut config = ServiceConfig::default();
        config.persistence.enabled = true;
        config.persistence.token = "${EMA_SIGNALS_TEST_TOKEN_UNSET}".to_string();
        config.expand_env_vars().unwrap();
        assert_eq!(config.persistence.token, "fallback-tok");

        std::env::remove_var(defaults::persistence::TOKEN_ENV_VAR);

        let mut config = ServiceConfig::default();
        config.persistence.enabled = true;
        config.persistence.token = "${EMA_SIGNALS_TEST_TOKEN_UNSET}".to_string();
        config.expand_env_vars().unwrap();
        assert_eq!(config.persistence.token, "");

        // Disabled persistence leaves the raw reference alone
        let mut config = ServiceConfig::default();
        config.persistence.token = "${EMA_SIGNALS_TEST_TOKEN_UNSET}".to_string();
        config.expand_env_vars().unwrap();
        assert_eq!(config.persistence.token, "${EMA_SIGNALS_TEST_TOKEN_UNSET}");
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("/etc/ema/custom.toml");
        assert_eq!(resolve_config_path(Some(&explicit)), Some(explicit));
    }
}
