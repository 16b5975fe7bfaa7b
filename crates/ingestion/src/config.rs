//! Driver configuration and metrics

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use contracts::PipelineSettings;
use observability::ReadingSummary;

/// Driver configuration
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Minimum spacing between two admitted readings
    pub interval: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(contracts::DEFAULT_INTERVAL_SECS),
        }
    }
}

impl DriverConfig {
    /// Create new driver configuration
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl From<&PipelineSettings> for DriverConfig {
    fn from(settings: &PipelineSettings) -> Self {
        Self::new(settings.interval())
    }
}

/// Ingestion metrics
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Non-blank lines read
    pub lines_read: AtomicU64,

    /// Lines decoded into a reading
    pub decoded: AtomicU64,

    /// Lines rejected by the decoder
    pub decode_errors: AtomicU64,

    /// Readings admitted by the filter
    pub admitted: AtomicU64,

    /// Readings discarded by the filter
    pub discarded: AtomicU64,

    /// Records taken by the delivery worker
    pub handed_off: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a line read
    pub fn record_line(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a decoded reading
    pub fn record_decoded(&self) {
        self.decoded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a decode error
    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an admission decision
    pub fn record_admission(&self, admitted: bool) {
        if admitted {
            self.admitted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.discarded.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a completed handoff
    pub fn record_handoff(&self) {
        self.handed_off.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            decoded: self.decoded.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            handed_off: self.handed_off.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Non-blank lines read
    pub lines_read: u64,

    /// Lines decoded into a reading
    pub decoded: u64,

    /// Lines rejected by the decoder
    pub decode_errors: u64,

    /// Readings admitted by the filter
    pub admitted: u64,

    /// Readings discarded by the filter
    pub discarded: u64,

    /// Records taken by the delivery worker
    pub handed_off: u64,
}

/// Result of a completed driver run
#[derive(Debug, Clone, Default)]
pub struct DriverStats {
    /// Counters at end of input
    pub counters: MetricsSnapshot,

    /// Statistics over the records handed off
    pub readings: ReadingSummary,
}
