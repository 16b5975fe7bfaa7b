//! `info` command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use contracts::PipelineBlueprint;
use serde::Serialize;
use tracing::info;

use super::load_blueprint;
use crate::cli::InfoArgs;

const REDACTED: &str = "***";

/// Param keys whose values are never printed
const SECRET_PARAMS: &[&str] = &["auth_token"];

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    source: String,
    pipeline: PipelineInfo,
    sink: SinkInfo,
}

#[derive(Serialize)]
struct PipelineInfo {
    interval_secs: u64,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    params: BTreeMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let source = match &args.config {
        Some(path) => path.display().to_string(),
        None => "built-in defaults".to_string(),
    };
    info!(config = %source, "Loading configuration info");

    let blueprint = load_blueprint(args.config.as_deref())?;
    let config_info = build_config_info(&blueprint, source, args.params);

    if args.json {
        let json = serde_json::to_string_pretty(&config_info)
            .context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&config_info);
    }

    Ok(())
}

fn build_config_info(blueprint: &PipelineBlueprint, source: String, with_params: bool) -> ConfigInfo {
    let params = if with_params {
        blueprint
            .sink
            .params
            .iter()
            .map(|(k, v)| {
                let value = if SECRET_PARAMS.contains(&k.as_str()) {
                    REDACTED.to_string()
                } else {
                    v.clone()
                };
                (k.clone(), value)
            })
            .collect()
    } else {
        BTreeMap::new()
    };

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        source,
        pipeline: PipelineInfo {
            interval_secs: blueprint.pipeline.interval_secs,
        },
        sink: SinkInfo {
            name: blueprint.sink.name.clone(),
            sink_type: format!("{:?}", blueprint.sink.sink_type),
            params,
        },
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Weather Relay Configuration                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("⚙️  Pipeline");
    println!("   ├─ Version: {}", info.version);
    println!("   ├─ Source: {}", info.source);
    println!("   └─ Interval: {}s", info.pipeline.interval_secs);

    println!("\n📤 Sink");
    if info.sink.params.is_empty() {
        println!("   └─ {} ({})", info.sink.name, info.sink.sink_type);
    } else {
        println!("   ├─ {} ({})", info.sink.name, info.sink.sink_type);
        let last = info.sink.params.len() - 1;
        for (i, (key, value)) in info.sink.params.iter().enumerate() {
            let prefix = if i == last { "└─" } else { "├─" };
            println!("   {} {} = {}", prefix, key, value);
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{SinkConfig, SinkType};
    use std::collections::HashMap;

    fn http_blueprint() -> PipelineBlueprint {
        PipelineBlueprint {
            sink: SinkConfig {
                name: "bq".to_string(),
                sink_type: SinkType::Http,
                params: HashMap::from([
                    ("endpoint".to_string(), "https://store.example/insert".to_string()),
                    ("auth_token".to_string(), "hunter2".to_string()),
                ]),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_params_hidden_by_default() {
        let info = build_config_info(&http_blueprint(), "test".to_string(), false);
        assert!(info.sink.params.is_empty());
        assert_eq!(info.pipeline.interval_secs, 30);
    }

    #[test]
    fn test_secret_params_redacted() {
        let info = build_config_info(&http_blueprint(), "test".to_string(), true);
        assert_eq!(info.sink.params["auth_token"], REDACTED);
        assert_eq!(info.sink.params["endpoint"], "https://store.example/insert");

        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("hunter2"));
    }
}
