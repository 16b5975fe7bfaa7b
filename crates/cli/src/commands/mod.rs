//! Command implementations.

mod info;
mod run;
mod validate;

pub use info::run_info;
pub use run::run_pipeline;
pub use validate::run_validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::PipelineBlueprint;

use crate::error::CliError;

/// Load a config file, or fall back to built-in defaults when none is given
fn load_blueprint(path: Option<&Path>) -> Result<PipelineBlueprint> {
    let Some(path) = path else {
        return Ok(PipelineBlueprint::default());
    };

    if !path.exists() {
        return Err(CliError::config_not_found(path).into());
    }

    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
