//! 根据 `SinkConfig` 构造 sink 并启动投递 worker

use contracts::{HandoffSender, SinkConfig, SinkType};
use tracing::{info, instrument};

use crate::error::DispatcherError;
use crate::sinks::{FileSink, HttpSink, LogSink, NetworkSink};
use crate::worker::DeliveryWorker;

/// Build the configured sink, spawn its delivery worker and return the
/// driver's end of the handoff.
///
/// No delivery is attempted here; remote sinks connect lazily on first write.
#[instrument(name = "spawn_worker", skip(config), fields(sink = %config.name, sink_type = ?config.sink_type))]
pub async fn spawn_worker(
    config: &SinkConfig,
) -> Result<(DeliveryWorker, HandoffSender), DispatcherError> {
    let spawned = match config.sink_type {
        SinkType::Log => {
            let sink = LogSink::new(&config.name);
            DeliveryWorker::spawn(sink)
        }
        SinkType::File => {
            let sink = FileSink::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            DeliveryWorker::spawn(sink)
        }
        SinkType::Network => {
            let sink = NetworkSink::from_params(&config.name, &config.params)
                .await
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            DeliveryWorker::spawn(sink)
        }
        SinkType::Http => {
            let sink = HttpSink::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            DeliveryWorker::spawn(sink)
        }
    };

    info!(sink = %config.name, "Delivery worker spawned");
    Ok(spawned)
}
