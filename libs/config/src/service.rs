//! Service configuration defaults
//!
//! Default values and constants used by the configuration loader and the
//! services, kept in one place so file-less deployments behave predictably.

/// Exchange adapter defaults
pub mod exchange {
    /// Default venue name
    pub const VENUE: &str = "binance";

    /// Public REST endpoint
    pub const REST_URL: &str = "https://api.binance.com";

    /// Client-side request budget (one request every 1.2s)
    pub const REQUESTS_PER_MINUTE: u32 = 50;

    /// HTTP request timeout (milliseconds)
    pub const REQUEST_TIMEOUT_MS: u64 = 10_000;
}

/// Watch-list defaults
pub mod watch {
    pub const SYMBOLS: [&str; 3] = ["BTC/USDT", "ETH/USDT", "XRP/USDT"];
    pub const TIMEFRAME: &str = "1m";
    pub const FETCH_LIMIT: u32 = 500;
    pub const POLL_INTERVAL_SECS: u64 = 5;
}

/// EMA period defaults
pub mod indicators {
    pub const FAST: usize = 9;
    pub const MEDIUM: usize = 21;
    pub const SLOW: usize = 50;
    pub const TREND: usize = 200;
}

/// Retry policy defaults
pub mod retry {
    pub const STRATEGY: &str = "fixed";
    pub const BACKOFF_SECS: u64 = 5;
    pub const MAX_BACKOFF_SECS: u64 = 300;
}

/// Persistence (InfluxDB v2) defaults
pub mod persistence {
    pub const URL: &str = "http://localhost:8086";
    pub const TOKEN: &str = "${INFLUXDB_TOKEN}";
    pub const ORG: &str = "dinosville";
    pub const BUCKET: &str = "trading_signals";
    pub const MEASUREMENT: &str = "trading_signals";
    pub const TIMEOUT_MS: u64 = 5_000;

    /// Environment variable consulted when no token is configured
    pub const TOKEN_ENV_VAR: &str = "INFLUXDB_TOKEN";
}

/// Logging defaults
pub mod logging {
    pub const LEVEL: &str = "info";
    pub const FORMAT: &str = "pretty";
    pub const METRICS_EVERY_CYCLES: u64 = 10;
}

/// Environment variable layering
pub mod env {
    /// Prefix for environment overrides (`EMA_SIGNALS__WATCH__TIMEFRAME=1h`)
    pub const PREFIX: &str = "EMA_SIGNALS";

    /// Separator between nested keys
    pub const SEPARATOR: &str = "__";

    /// Variable naming an explicit config file
    pub const CONFIG_PATH_VAR: &str = "EMA_SIGNALS_CONFIG_PATH";

    /// Config file picked up when present and nothing else is specified
    pub const DEFAULT_CONFIG_PATH: &str = "configs/ema_signals.toml";
}
