//! Sink metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for the delivery worker's sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Records taken off the handoff channel
    received_count: AtomicU64,
    /// Total successful writes
    write_count: AtomicU64,
    /// Total write failures
    failure_count: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get received count
    pub fn received_count(&self) -> u64 {
        self.received_count.load(Ordering::Relaxed)
    }

    /// Increment received count
    pub fn inc_received_count(&self) {
        self.received_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total write count
    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Increment write count
    pub fn inc_write_count(&self) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            received_count: self.received_count(),
            write_count: self.write_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub received_count: u64,
    pub write_count: u64,
    pub failure_count: u64,
}

impl MetricsSnapshot {
    /// Records received but neither written nor failed yet
    pub fn in_flight(&self) -> u64 {
        self.received_count
            .saturating_sub(self.write_count + self.failure_count)
    }
}
