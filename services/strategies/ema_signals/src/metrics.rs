//! Strategy metrics collection

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StrategyMetrics {
    pub cycles: u64,
    pub reports_published: u64,
    pub signals_generated: u64,
    pub fetch_errors: u64,
    pub compute_errors: u64,
    pub publish_errors: u64,
}

impl StrategyMetrics {
    pub fn errors(&self) -> u64 {
        self.fetch_errors + self.compute_errors + self.publish_errors
    }
}

/// Thread-safe metrics collector for the polling loop
#[derive(Debug)]
pub struct MetricsCollector {
    start_time: Instant,
    cycles: AtomicU64,
    reports_published: AtomicU64,
    signals_generated: AtomicU64,
    fetch_errors: AtomicU64,
    compute_errors: AtomicU64,
    publish_errors: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: AtomicU64::new(0),
            reports_published: AtomicU64::new(0),
            signals_generated: AtomicU64::new(0),
            fetch_errors: AtomicU64::new(0),
            compute_errors: AtomicU64::new(0),
            publish_errors: AtomicU64::new(0),
        }
    }

    /// Returns the cycle count after incrementing
    pub fn increment_cycles(&self) -> u64 {
        self.cycles.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn increment_reports(&self) {
        self.reports_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_signals(&self) {
        self.signals_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_fetch_errors(&self) {
        self.fetch_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_compute_errors(&self) {
        self.compute_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_publish_errors(&self) {
        self.publish_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_metrics(&self) -> StrategyMetrics {
        StrategyMetrics {
            cycles: self.cycles.load(Ordering::Relaxed),
            reports_published: self.reports_published.load(Ordering::Relaxed),
            signals_generated: self.signals_generated.load(Ordering::Relaxed),
            fetch_errors: self.fetch_errors.load(Ordering::Relaxed),
            compute_errors: self.compute_errors.load(Ordering::Relaxed),
            publish_errors: self.publish_errors.load(Ordering::Relaxed),
        }
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
