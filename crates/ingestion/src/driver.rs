//! Pipeline driver: read → decode → admit → convert → hand off.

use std::sync::Arc;

use contracts::HandoffSender;
use observability::ReadingStatsAggregator;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument, trace, warn};

use crate::admission::AdmissionFilter;
use crate::clock::{Clock, SystemClock};
use crate::config::{DriverConfig, DriverStats, IngestionMetrics};
use crate::convert::convert;
use crate::decoder::decode_bytes;
use crate::error::{IngestionError, Result};

/// Foreground half of the pipeline.
///
/// Owns the admission state; the only thing shared with the delivery worker is
/// the handoff, and each record's ownership moves through it.
pub struct PipelineDriver<C: Clock = SystemClock> {
    config: DriverConfig,
    filter: AdmissionFilter,
    clock: C,
    handoff: HandoffSender,
    metrics: Arc<IngestionMetrics>,
    readings: ReadingStatsAggregator,
}

impl PipelineDriver<SystemClock> {
    /// Create a driver on the system clock
    pub fn new(config: DriverConfig, handoff: HandoffSender) -> Self {
        Self::with_clock(config, handoff, SystemClock)
    }
}

impl<C: Clock> PipelineDriver<C> {
    /// Create a driver on a custom clock
    pub fn with_clock(config: DriverConfig, handoff: HandoffSender, clock: C) -> Self {
        Self {
            filter: AdmissionFilter::new(config.interval),
            config,
            clock,
            handoff,
            metrics: Arc::new(IngestionMetrics::new()),
            readings: ReadingStatsAggregator::new(),
        }
    }

    /// Shared metrics, readable while the driver runs
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }

    /// Run until the reader reaches end of input.
    ///
    /// Decode failures are logged and skipped. Returns an error only when the
    /// input itself fails or the delivery worker is gone.
    #[instrument(
        name = "driver_run",
        skip(self, reader),
        fields(interval_secs = self.config.interval.as_secs_f64())
    )]
    pub async fn run<R>(mut self, mut reader: R) -> Result<DriverStats>
    where
        R: AsyncBufRead + Unpin,
    {
        info!("Driver started");

        let mut buf = Vec::with_capacity(512);
        let mut line_no: u64 = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            line_no += 1;
            self.process_line(line_no, &buf).await?;
        }

        let stats = DriverStats {
            counters: self.metrics.snapshot(),
            readings: self.readings.summary(),
        };

        info!(
            lines = stats.counters.lines_read,
            admitted = stats.counters.admitted,
            discarded = stats.counters.discarded,
            decode_errors = stats.counters.decode_errors,
            "Input exhausted, driver finished"
        );

        Ok(stats)
    }

    async fn process_line(&mut self, line_no: u64, bytes: &[u8]) -> Result<()> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            trace!(line_no, "Skipping blank line");
            return Ok(());
        }

        self.metrics.record_line();
        observability::record_line_read();

        let reading = match decode_bytes(bytes) {
            Ok(reading) => reading,
            Err(e) => {
                self.metrics.record_decode_error();
                observability::record_decode_error();
                warn!(line_no, line = %e.line(), error = %e, "Skipping undecodable line");
                return Ok(());
            }
        };
        self.metrics.record_decoded();

        let admitted = self.filter.try_admit(self.clock.now());
        self.metrics.record_admission(admitted);
        observability::record_admission(admitted);

        if !admitted {
            trace!(line_no, "Reading discarded by admission filter");
            return Ok(());
        }

        trace!(line_no, sensor_id = reading.sensor_id, "Waiting for delivery worker");

        // Waits until the worker is idle; capture time is stamped at that moment
        let clock = &self.clock;
        let readings = &mut self.readings;
        self.handoff
            .send_with(|| {
                let record = convert(&reading, clock.wall_time());
                readings.update(&record);
                debug!(
                    line_no,
                    temperature_c = record.temperature_c,
                    wind_speed_kmh = record.wind_speed_kmh,
                    "Reading handed off"
                );
                record
            })
            .await
            .map_err(|_| IngestionError::HandoffClosed)?;
        self.metrics.record_handoff();

        Ok(())
    }
}
