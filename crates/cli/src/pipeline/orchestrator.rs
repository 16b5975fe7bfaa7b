//! Pipeline orchestrator - wires the driver, the handoff channel and the delivery worker.

use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::PipelineBlueprint;
use ingestion::{DriverConfig, PipelineDriver};
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{info, warn};

use super::PipelineStats;
use crate::error::CliError;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Validated configuration
    pub blueprint: PipelineBlueprint,

    /// Input file (None = stdin)
    pub input: Option<PathBuf>,

    /// How long to wait for the delivery worker once input ends
    pub drain_timeout: Duration,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run until the input ends or `shutdown` resolves.
    ///
    /// Either way the handoff sender is dropped and the worker gets
    /// `drain_timeout` to finish what it already holds.
    pub async fn run<F>(self, shutdown: F) -> Result<PipelineStats>
    where
        F: Future<Output = ()>,
    {
        let start_time = Instant::now();
        let blueprint = &self.config.blueprint;

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let reader = self.open_input().await?;

        let (worker, handoff) = dispatcher::spawn_worker(&blueprint.sink)
            .await
            .context("Failed to start delivery worker")?;
        let sink_metrics = worker.metrics().clone();

        // The driver owns the only sender; dropping it lets the worker finish
        let driver = PipelineDriver::new(DriverConfig::from(&blueprint.pipeline), handoff);
        let driver_metrics = driver.metrics();

        info!(
            interval_secs = blueprint.pipeline.interval_secs,
            sink = %blueprint.sink.name,
            "Pipeline running"
        );

        let outcome = tokio::select! {
            biased;
            _ = shutdown => {
                warn!("Received shutdown signal, stopping input");
                None
            }
            result = driver.run(reader) => Some(result),
        };

        let drained = worker
            .shutdown_with_timeout(self.config.drain_timeout)
            .await;
        if !drained {
            warn!(
                timeout_secs = self.config.drain_timeout.as_secs_f64(),
                "Delivery worker did not drain in time"
            );
        }

        let (interrupted, readings) = match outcome {
            Some(Ok(stats)) => (false, Some(stats.readings)),
            Some(Err(e)) => return Err(e).context("Pipeline driver failed"),
            None => (true, None),
        };

        Ok(PipelineStats {
            driver: driver_metrics.snapshot(),
            sink: sink_metrics.snapshot(),
            readings,
            duration: start_time.elapsed(),
            interrupted,
            drained,
        })
    }

    async fn open_input(&self) -> Result<Box<dyn AsyncBufRead + Unpin + Send>, CliError> {
        match &self.config.input {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|e| CliError::input_open(path, e))?;
                info!(input = %path.display(), "Reading from file");
                Ok(Box::new(BufReader::new(file)))
            }
            None => {
                info!("Reading from stdin");
                Ok(Box::new(BufReader::new(tokio::io::stdin())))
            }
        }
    }
}
