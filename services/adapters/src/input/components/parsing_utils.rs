//! Parsing Utilities for Exchange Adapters
//!
//! Common helpers for pulling numeric fields out of exchange JSON payloads.
//! Exchanges publish prices as decimal strings and times as integers; both
//! forms are accepted for every field so collectors stay tolerant of minor
//! format drift.

use serde_json::Value;

use crate::{AdapterError, Result};
use types::VenueId;

/// Parse a decimal field (string or JSON number) as `f64`
pub fn parse_f64_field(value: &Value, venue: VenueId, field: &str) -> Result<f64> {
    let parsed = match value {
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|e| AdapterError::parse(venue, format!("field '{}'", field), e))?,
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            AdapterError::parse(venue, format!("field '{}'", field), "number out of range")
        })?,
        other => {
            return Err(AdapterError::parse(
                venue,
                format!("field '{}'", field),
                format!("expected decimal, got {}", other),
            ))
        }
    };

    if !parsed.is_finite() {
        return Err(AdapterError::parse(
            venue,
            format!("field '{}'", field),
            "non-finite value",
        ));
    }

    Ok(parsed)
}

/// Parse an integer field (JSON number or numeric string) as `i64`
pub fn parse_i64_field(value: &Value, venue: VenueId, field: &str) -> Result<i64> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            AdapterError::parse(venue, format!("field '{}'", field), "not an integer")
        }),
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|e| AdapterError::parse(venue, format!("field '{}'", field), e)),
        other => Err(AdapterError::parse(
            venue,
            format!("field '{}'", field),
            format!("expected integer, got {}", other),
        )),
    }
}
