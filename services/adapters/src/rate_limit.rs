//! Rate limiting for API requests
//!
//! Quotas are spaced evenly with no burst allowance: 50 requests/minute means
//! one request every 1.2 s, even after an idle period.

use governor::{DefaultDirectRateLimiter, Quota};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use types::VenueId;

/// Rate limiter for venue API requests
#[derive(Clone, Default)]
pub struct RateLimiter {
    limiters: HashMap<VenueId, Arc<DefaultDirectRateLimiter>>,
}

impl RateLimiter {
    /// Create a new rate limiter with no venues configured
    pub fn new() -> Self {
        Self {
            limiters: HashMap::new(),
        }
    }

    /// Configure rate limit for a venue
    pub fn configure_venue(&mut self, venue: VenueId, requests_per_minute: u32) {
        if let Ok(rate) = NonZeroU32::try_from(requests_per_minute) {
            let quota = Quota::per_minute(rate).allow_burst(NonZeroU32::MIN);
            let limiter = Arc::new(DefaultDirectRateLimiter::direct(quota));
            self.limiters.insert(venue, limiter);
        } else {
            tracing::warn!(
                "Invalid rate limit for venue {:?}: {}",
                venue,
                requests_per_minute
            );
        }
    }

    /// Convenience constructor for a single venue
    pub fn for_venue(venue: VenueId, requests_per_minute: u32) -> Self {
        let mut limiter = Self::new();
        limiter.configure_venue(venue, requests_per_minute);
        limiter
    }

    /// Wait until request is allowed
    pub async fn wait(&self, venue: VenueId) {
        if let Some(limiter) = self.limiters.get(&venue) {
            limiter.until_ready().await;
        }
    }
}
