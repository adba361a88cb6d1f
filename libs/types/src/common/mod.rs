//! Identifiers and validation errors shared across services

pub mod errors;
pub mod identifiers;

pub use errors::ValidationError;
pub use identifiers::{TradingPair, VenueId};
