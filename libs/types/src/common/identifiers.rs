//! Venue and trading pair identifiers
//!
//! `TradingPair` is the human form used in configuration and persisted tags
//! (`BTC/USDT`); `exchange_symbol()` produces the concatenated form exchanges
//! expect on the wire (`BTCUSDT`).

use super::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Venue identifiers for exchanges serving candle data
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueId {
    // Cryptocurrency Centralized Exchanges (100-199)
    Binance = 100,
    BinanceUs = 109,
}

impl VenueId {
    /// Canonical lowercase name, as used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            VenueId::Binance => "binance",
            VenueId::BinanceUs => "binance_us",
        }
    }

    /// Public REST endpoint for market data
    pub fn default_rest_url(&self) -> &'static str {
        match self {
            VenueId::Binance => "https://api.binance.com",
            VenueId::BinanceUs => "https://api.binance.us",
        }
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VenueId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binance" => Ok(VenueId::Binance),
            "binance_us" | "binanceus" | "binance-us" => Ok(VenueId::BinanceUs),
            _ => Err(ValidationError::UnknownVenue {
                input: s.to_string(),
            }),
        }
    }
}

/// Base/quote asset pair, e.g. BTC/USDT
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TradingPair {
    base: String,
    quote: String,
}

impl TradingPair {
    /// Build a pair from its two asset codes (upper-cased)
    pub fn new(base: &str, quote: &str) -> Result<Self, ValidationError> {
        let valid = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric());

        if !valid(base) || !valid(quote) {
            return Err(ValidationError::InvalidPair {
                input: format!("{}/{}", base, quote),
            });
        }

        Ok(Self {
            base: base.to_ascii_uppercase(),
            quote: quote.to_ascii_uppercase(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Concatenated symbol used by exchange REST APIs (`BTCUSDT`)
    pub fn exchange_symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for TradingPair {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (base, quote) = trimmed
            .split_once('/')
            .or_else(|| trimmed.split_once('-'))
            .ok_or_else(|| ValidationError::InvalidPair {
                input: s.to_string(),
            })?;

        Self::new(base, quote).map_err(|_| ValidationError::InvalidPair {
            input: s.to_string(),
        })
    }
}

impl TryFrom<String> for TradingPair {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TradingPair> for String {
    fn from(pair: TradingPair) -> Self {
        pair.to_string()
    }
}
