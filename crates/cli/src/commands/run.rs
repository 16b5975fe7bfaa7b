//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::PipelineBlueprint;
use std::time::Duration;
use tracing::{info, warn};

use super::load_blueprint;
use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    let blueprint = effective_blueprint(args)?;

    info!(
        interval_secs = blueprint.pipeline.interval_secs,
        sink = %blueprint.sink.name,
        sink_type = ?blueprint.sink.sink_type,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    let pipeline = Pipeline::new(PipelineConfig {
        blueprint,
        input: args.input.clone(),
        drain_timeout: Duration::from_secs(args.drain_timeout),
        metrics_port: (args.metrics_port != 0).then_some(args.metrics_port),
    });

    info!("Starting relay...");

    let stats = pipeline
        .run(shutdown_signal())
        .await
        .context("Pipeline execution failed")?;

    info!(
        lines = stats.driver.lines_read,
        admitted = stats.driver.admitted,
        delivered = stats.sink.write_count,
        failed = stats.sink.failure_count,
        duration_secs = stats.duration.as_secs_f64(),
        "Relay finished"
    );
    stats.print_summary();

    Ok(())
}

/// Config file (or defaults) with CLI overrides applied, validated
fn effective_blueprint(args: &RunArgs) -> Result<PipelineBlueprint> {
    let mut blueprint = load_blueprint(args.config.as_deref())?;

    if let Some(interval) = args.interval {
        info!(interval_secs = interval, "Overriding admission interval from CLI");
        blueprint.pipeline.interval_secs = interval;
    }

    config_loader::ConfigLoader::validate(&blueprint).context("Invalid configuration")?;
    Ok(blueprint)
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed that source is ignored rather than
/// ending the run.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &PipelineBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Pipeline:");
    println!("  Interval: {}s", blueprint.pipeline.interval_secs);
    println!("\nSink:");
    println!(
        "  - {} ({:?})",
        blueprint.sink.name, blueprint.sink.sink_type
    );
    println!();
}
