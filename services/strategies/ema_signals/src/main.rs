//! EMA Signals Service Main Entry Point

use adapter_service::BinanceKlineCollector;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use ema_signals::logging::{init_logging, LogEmoji, LogFormat};
use ema_signals::{
    ConsoleOutput, EmaSignalStrategy, InfluxOutput, SignalSink, StrategyConfig,
};
use service_config::{resolve_config_path, ServiceConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "ema_signals", version, about = "EMA touch and crossover signals from exchange candles")]
struct Args {
    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated pairs, e.g. BTC/USDT,ETH/USDT
    #[arg(long, value_delimiter = ',')]
    symbols: Option<Vec<String>>,

    /// Candle interval (1m, 1h, 1d, ...)
    #[arg(long)]
    timeframe: Option<String>,

    /// Bars fetched per cycle (1-1000)
    #[arg(long)]
    limit: Option<u32>,

    /// Write signals to InfluxDB
    #[arg(long, conflicts_with = "no_persist")]
    persist: bool,

    /// Print signals to the console only
    #[arg(long)]
    no_persist: bool,

    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Args {
    fn apply(&self, config: &mut ServiceConfig) {
        if let Some(symbols) = &self.symbols {
            config.watch.symbols = symbols.clone();
        }
        if let Some(timeframe) = &self.timeframe {
            config.watch.timeframe = timeframe.clone();
        }
        if let Some(limit) = self.limit {
            config.watch.limit = limit;
        }
        if self.persist {
            config.persistence.enabled = true;
        }
        if self.no_persist {
            config.persistence.enabled = false;
        }
        if let Some(format) = self.log_format {
            config.logging.format = match format {
                LogFormat::Pretty => "pretty",
                LogFormat::Json => "json",
            }
            .to_string();
        }
    }
}

fn load_config(args: &Args) -> Result<StrategyConfig> {
    let path = resolve_config_path(args.config.as_deref());

    let mut service = ServiceConfig::load(path.as_deref())
        .context("Failed to load EMA signals configuration")?;
    args.apply(&mut service);
    service.expand_env_vars()?;
    service.validate()?;

    StrategyConfig::try_from(&service).context("Invalid EMA signals configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging(&config.log_level, config.log_format)?;

    info!("{} Starting EMA Signals Service", LogEmoji::START);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded: {} on {} ({}), limit {}, periods {}/{}/{}/{}",
        config
            .pairs
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(","),
        config.venue,
        config.timeframe,
        config.limit,
        config.periods.fast,
        config.periods.medium,
        config.periods.slow,
        config.periods.trend
    );

    let fetcher = Arc::new(
        BinanceKlineCollector::new(config.binance_config())
            .context("Failed to build Binance collector")?,
    );

    let sink: Arc<dyn SignalSink> = match &config.persistence {
        Some(influx) => {
            info!(
                "{} Persisting to InfluxDB {} (org={}, bucket={})",
                LogEmoji::NETWORK,
                influx.url,
                influx.org,
                influx.bucket
            );
            Arc::new(InfluxOutput::new(influx.clone())?)
        }
        None => Arc::new(ConsoleOutput::stdout()),
    };

    let mut strategy = EmaSignalStrategy::new(config, fetcher, sink)?;
    let metrics = strategy.metrics();

    let mut handle = tokio::spawn(async move { strategy.start().await });

    info!("EMA Signals Service running. Press Ctrl+C to stop.");

    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("Failed to listen for shutdown signal")?;
            info!("{} Shutting down EMA Signals Service", LogEmoji::STOP);
            handle.abort();
        }
        joined = &mut handle => {
            let outcome = joined.map_err(|e| anyhow!("Strategy task failed: {}", e))?;
            if let Err(e) = outcome {
                error!("{} Strategy stopped: {}", LogEmoji::ERROR, e);
                return Err(e.into());
            }
        }
    }

    let m = metrics.get_metrics();
    info!(
        "{} Final: cycles={} published={} signals={} errors={} uptime={:?}",
        LogEmoji::CHART,
        m.cycles,
        m.reports_published,
        m.signals_generated,
        m.errors(),
        metrics.uptime()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(flags: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("ema_signals").chain(flags.iter().copied()))
    }

    #[test]
    fn test_flags_override_loaded_config() {
        let args = parse(&[
            "--symbols",
            "BTC/USDT,ETH/USDT",
            "--timeframe",
            "4h",
            "--limit",
            "300",
            "--persist",
            "--log-format",
            "json",
        ])
        .unwrap();

        let mut config = ServiceConfig::default();
        config.persistence.enabled = false;
        args.apply(&mut config);

        assert_eq!(config.watch.symbols, vec!["BTC/USDT", "ETH/USDT"]);
        assert_eq!(config.watch.timeframe, "4h");
        assert_eq!(config.watch.limit, 300);
        assert!(config.persistence.enabled);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_no_persist_disables_influx() {
        let args = parse(&["--no-persist"]).unwrap();
        let mut config = ServiceConfig::default();
        config.persistence.enabled = true;

        args.apply(&mut config);
        assert!(!config.persistence.enabled);
    }

    #[test]
    fn test_absent_flags_keep_loaded_values() {
        let args = parse(&[]).unwrap();
        let mut config = ServiceConfig::default();
        config.watch.symbols = vec!["XRP/USDT".to_string()];
        config.watch.limit = 42;
        config.persistence.enabled = true;
        config.logging.format = "json".to_string();

        args.apply(&mut config);
        assert_eq!(config.watch.symbols, vec!["XRP/USDT"]);
        assert_eq!(config.watch.limit, 42);
        assert!(config.persistence.enabled);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_persist_and_no_persist_conflict() {
        let err = parse(&["--persist", "--no-persist"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        assert!(parse(&["--log-format", "xml"]).is_err());
    }
}
