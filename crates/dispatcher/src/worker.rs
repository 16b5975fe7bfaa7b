//! DeliveryWorker - owns the sink and the receiving end of the handoff

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use contracts::{handoff, DataSink, HandoffReceiver, HandoffSender};

use crate::metrics::SinkMetrics;

/// Handle to the running delivery worker
pub struct DeliveryWorker {
    /// Sink name
    name: String,
    /// Shared metrics
    metrics: Arc<SinkMetrics>,
    /// Worker task handle
    worker_handle: JoinHandle<()>,
}

impl DeliveryWorker {
    /// Spawn the worker task and return the driver's end of the handoff.
    ///
    /// The worker only offers a slot while idle, so a `send` on the returned
    /// end completes when the worker takes the record, never earlier.
    pub fn spawn<S: DataSink + Send + 'static>(sink: S) -> (Self, HandoffSender) {
        let name = sink.name().to_string();
        let (tx, rx) = handoff();
        let metrics = Arc::new(SinkMetrics::new());

        let worker_metrics = Arc::clone(&metrics);
        let worker_name = name.clone();

        let worker_handle = tokio::spawn(async move {
            delivery_worker(sink, rx, worker_metrics, worker_name).await;
        });

        let worker = Self {
            name,
            metrics,
            worker_handle,
        };
        (worker, tx)
    }

    /// Get sink name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Wait for the worker to finish.
    ///
    /// The worker stops once the `HandoffSender` is dropped and the record it
    /// holds, if any, has been attempted.
    #[instrument(name = "delivery_worker_shutdown", skip(self), fields(sink = %self.name))]
    pub async fn shutdown(self) {
        if let Err(e) = self.worker_handle.await {
            error!(sink = %self.name, error = ?e, "Worker task panicked");
        }
        debug!(sink = %self.name, "DeliveryWorker shutdown complete");
    }

    /// Shutdown, giving up after `grace`.
    ///
    /// Returns `true` if the worker drained in time. On timeout the worker task
    /// is aborted and any record it still holds is lost.
    #[instrument(
        name = "delivery_worker_shutdown_timeout",
        skip(self),
        fields(sink = %self.name, grace_ms = grace.as_millis() as u64)
    )]
    pub async fn shutdown_with_timeout(self, grace: Duration) -> bool {
        let mut worker_handle = self.worker_handle;
        match tokio::time::timeout(grace, &mut worker_handle).await {
            Ok(Ok(())) => {
                debug!(sink = %self.name, "DeliveryWorker drained");
                true
            }
            Ok(Err(e)) => {
                error!(sink = %self.name, error = ?e, "Worker task panicked");
                false
            }
            Err(_) => {
                warn!(sink = %self.name, "Drain timed out, abandoning pending records");
                worker_handle.abort();
                false
            }
        }
    }
}

/// Worker task: one delivery attempt per record, failures are logged and dropped
#[instrument(
    name = "delivery_worker_loop",
    skip(sink, rx, metrics),
    fields(sink = %name)
)]
async fn delivery_worker<S: DataSink>(
    mut sink: S,
    mut rx: HandoffReceiver,
    metrics: Arc<SinkMetrics>,
    name: String,
) {
    debug!(sink = %name, "Delivery worker started");

    while let Some(record) = rx.recv().await {
        metrics.inc_received_count();
        let started = Instant::now();

        match sink.write(&record).await {
            Ok(()) => {
                metrics.inc_write_count();
                observability::record_delivery(&name, true, elapsed_ms(started));
                info!(
                    sink = %name,
                    temperature_c = record.temperature_c,
                    wind_speed_kmh = record.wind_speed_kmh,
                    "Temperature: {:.2}C Wind Speed: {:.2}Kph",
                    record.temperature_c,
                    record.wind_speed_kmh
                );
            }
            Err(e) => {
                metrics.inc_failure_count();
                observability::record_delivery(&name, false, elapsed_ms(started));
                error!(
                    sink = %name,
                    capture_time = %record.capture_time,
                    error = %e,
                    "Delivery failed, record dropped"
                );
                // No retry: the next record is the next attempt
            }
        }
    }

    // Cleanup
    if let Err(e) = sink.flush().await {
        error!(sink = %name, error = %e, "Flush failed on shutdown");
    }
    if let Err(e) = sink.close().await {
        error!(sink = %name, error = %e, "Close failed on shutdown");
    }

    debug!(sink = %name, "Delivery worker stopped");
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
