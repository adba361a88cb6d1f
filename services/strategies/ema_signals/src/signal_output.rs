//! # Signal Output - Report Publishing
//!
//! ## Purpose
//!
//! Delivers the last-bar [`SignalReport`] of each cycle to its destination:
//! a human-readable console block, or one InfluxDB v2 line-protocol record.
//!
//! ## Integration Points
//!
//! - **Input Sources**: `SignalReport` values from the polling loop
//! - **Output Destinations**: stdout (`ConsoleOutput`) or the InfluxDB v2
//!   `/api/v2/write` endpoint (`InfluxOutput`)
//! - **Error Handling**: every failure surfaces as `StrategyError::Persistence`
//!   and is handled by the loop exactly like a fetch failure
//!
//! ## Architecture Role
//!
//! ```text
//! SignalEngine → SignalReport → [SignalSink] → Console | InfluxDB
//! ```
//!
//! ## Record Format
//!
//! ```text
//! trading_signals,symbol=BTC/USDT,timeframe=1d Close=42000.5,Touch_200_EMA=0i,EMA_Cross_Signal=1i 1704067200000
//! ```

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

use crate::engine::SignalReport;
use crate::error::{Result, StrategyError};
use crate::logging::LogEmoji;

pub const TOUCH_MESSAGE: &str = "Signal: Candlestick touched the 200 EMA!";
pub const CROSS_MESSAGE: &str = "Signal: EMA crossover condition met!";

/// Destination for per-cycle signal reports
#[async_trait]
pub trait SignalSink: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Publish one report
    async fn publish(&self, report: &SignalReport) -> Result<()>;
}

/// Format a report timestamp as RFC 3339 UTC, falling back to raw milliseconds
fn format_timestamp(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| format!("{}ms", timestamp_ms))
}

/// Render the console block for a report
pub fn render_report(report: &SignalReport) -> String {
    let mut out = format!(
        "[{} {} {}] Latest Close: {}\n",
        report.pair,
        report.timeframe,
        format_timestamp(report.timestamp_ms),
        report.close
    );

    if report.flags.touch_trend_ema {
        out.push_str(TOUCH_MESSAGE);
        out.push('\n');
    }
    if report.flags.combined_cross {
        out.push_str(CROSS_MESSAGE);
        out.push('\n');
    }

    out
}

/// Human-readable console sink
pub struct ConsoleOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleOutput {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

#[async_trait]
impl SignalSink for ConsoleOutput {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn publish(&self, report: &SignalReport) -> Result<()> {
        let block = render_report(report);
        let mut writer = self.writer.lock();
        writer
            .write_all(block.as_bytes())
            .map_err(|e| StrategyError::persistence(format!("console write failed: {}", e)))?;
        writer
            .flush()
            .map_err(|e| StrategyError::persistence(format!("console flush failed: {}", e)))
    }
}

/// InfluxDB v2 write settings
#[derive(Debug, Clone)]
pub struct InfluxConfig {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
    pub measurement: String,
    pub timeout: Duration,
}

/// Escape a tag key or value (commas, spaces, equals signs, backslashes)
pub fn escape_tag(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, ',' | ' ' | '=' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape a measurement name (commas and spaces)
pub fn escape_measurement(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, ',' | ' ') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Encode one report as a line-protocol record with millisecond precision
pub fn encode_line(measurement: &str, report: &SignalReport) -> String {
    format!(
        "{},symbol={},timeframe={} Close={},Touch_200_EMA={}i,EMA_Cross_Signal={}i {}",
        escape_measurement(measurement),
        escape_tag(&report.pair.to_string()),
        escape_tag(report.timeframe.as_str()),
        report.close,
        u8::from(report.flags.touch_trend_ema),
        u8::from(report.flags.combined_cross),
        report.timestamp_ms
    )
}

/// InfluxDB v2 HTTP sink
pub struct InfluxOutput {
    config: InfluxConfig,
    client: reqwest::Client,
    write_url: String,
}

impl InfluxOutput {
    pub fn new(config: InfluxConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StrategyError::configuration(format!("InfluxDB HTTP client: {}", e)))?;

        let write_url = format!("{}/api/v2/write", config.url.trim_end_matches('/'));

        Ok(Self {
            config,
            client,
            write_url,
        })
    }

    pub fn config(&self) -> &InfluxConfig {
        &self.config
    }
}

#[async_trait]
impl SignalSink for InfluxOutput {
    fn name(&self) -> &'static str {
        "influxdb"
    }

    async fn publish(&self, report: &SignalReport) -> Result<()> {
        let line = encode_line(&self.config.measurement, report);
        debug!("{} Writing record: {}", LogEmoji::NETWORK, line);

        let response = self
            .client
            .post(&self.write_url)
            .query(&[
                ("org", self.config.org.as_str()),
                ("bucket", self.config.bucket.as_str()),
                ("precision", "ms"),
            ])
            .header("Authorization", format!("Token {}", self.config.token))
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(line.clone())
            .send()
            .await
            .map_err(|e| StrategyError::persistence(format!("InfluxDB request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StrategyError::persistence(format!(
                "InfluxDB write rejected with HTTP {}: {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            )));
        }

        info!("{} Sent data to InfluxDB: {}", LogEmoji::SUCCESS, line);
        Ok(())
    }
}
