//! Logging setup and standardized emoji markers
//!
//! `RUST_LOG` always wins over the configured level.

use anyhow::{bail, Context};
use std::str::FromStr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Standard emoji set for EMA signal logging
pub struct LogEmoji;

impl LogEmoji {
    // Status indicators
    pub const SUCCESS: &'static str = "✅"; // Operation succeeded
    pub const ERROR: &'static str = "❌"; // Operation failed
    pub const WARNING: &'static str = "⚠️"; // Warning or caution

    // Module-specific
    pub const START: &'static str = "🚀"; // Service startup
    pub const CHART: &'static str = "📊"; // Metrics summary
    pub const NETWORK: &'static str = "🌐"; // Exchange / InfluxDB traffic
    pub const SIGNAL: &'static str = "📈"; // Signal fired
    pub const CLOCK: &'static str = "⏱️"; // Sleeping / backoff
    pub const STOP: &'static str = "🛑"; // Shutdown
}

/// Output format for the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => bail!("Unknown log format: {}", other),
        }
    }
}

/// Install the global subscriber
pub fn init_logging(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log level: {}", level))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(false)).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };
    installed.context("Failed to install tracing subscriber")
}
