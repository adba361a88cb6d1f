//! # Centralized Service Configuration
//!
//! Configuration loading and defaults for the EMA signal services.
//!
//! ## Features
//!
//! - **Layered Sources**: defaults → TOML file → `EMA_SIGNALS__*` environment variables
//! - **Secret Expansion**: `${VAR}` references in persistence URL/token via `shellexpand`
//! - **Startup Validation**: range and cross-field checks before any service starts
//!
//! ## Usage
//!
//! ```rust,no_run
//! use service_config::load_config;
//!
//! let config = load_config(None).unwrap();
//! println!("watching {:?} on {}", config.watch.symbols, config.watch.timeframe);
//! ```

pub mod service;
pub mod service_config;

// Re-export commonly used types
pub use service_config::{
    load_config, resolve_config_path, ExchangeSettings, IndicatorSettings, LoggingSettings,
    PersistenceSettings, RetrySettings, ServiceConfig, WatchSettings,
};
