//! Pipeline statistics and metrics.

use std::time::Duration;

use observability::ReadingSummary;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Driver counters (lines, decode errors, admissions)
    pub driver: ingestion::MetricsSnapshot,

    /// Delivery worker counters
    pub sink: dispatcher::MetricsSnapshot,

    /// Statistics over admitted readings (None when interrupted)
    pub readings: Option<ReadingSummary>,

    /// Total duration of the pipeline run
    pub duration: Duration,

    /// Stopped by a shutdown signal rather than end of input
    pub interrupted: bool,

    /// Worker finished every handed-off record before the drain timeout
    pub drained: bool,
}

impl PipelineStats {
    /// Fraction of decoded readings that were admitted, as percentage
    pub fn admission_rate(&self) -> f64 {
        let total = self.driver.admitted + self.driver.discarded;
        if total > 0 {
            (self.driver.admitted as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Records handed off but never attempted
    pub fn abandoned(&self) -> u64 {
        self.driver
            .handed_off
            .saturating_sub(self.sink.write_count + self.sink.failure_count)
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Relay Statistics                          ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Lines read: {}", self.driver.lines_read);
        println!("   ├─ Decode errors: {}", self.driver.decode_errors);
        println!(
            "   ├─ Admitted: {} ({:.2}%)",
            self.driver.admitted,
            self.admission_rate()
        );
        println!("   ├─ Discarded: {}", self.driver.discarded);
        println!(
            "   └─ Stopped by: {}",
            if self.interrupted { "signal" } else { "end of input" }
        );

        println!("\n📤 Delivery");
        println!("   ├─ Delivered: {}", self.sink.write_count);
        println!("   ├─ Failed: {}", self.sink.failure_count);
        println!("   └─ Abandoned: {}", self.abandoned());

        if let Some(readings) = &self.readings {
            println!("\n🌡  Readings");
            for line in readings.to_string().lines() {
                println!("   {}", line);
            }
        }

        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_rate() {
        let mut stats = PipelineStats::default();
        assert_eq!(stats.admission_rate(), 0.0);

        stats.driver.admitted = 1;
        stats.driver.discarded = 3;
        assert!((stats.admission_rate() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_abandoned_counts_unattempted_records() {
        let mut stats = PipelineStats::default();
        stats.driver.handed_off = 3;
        stats.sink.write_count = 1;
        stats.sink.failure_count = 1;
        assert_eq!(stats.abandoned(), 1);
    }
}
