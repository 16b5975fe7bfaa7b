//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Weather Relay - throttled relay from a sensor JSON stream to an analytical store
#[derive(Parser, Debug)]
#[command(
    name = "weather-relay",
    author,
    version,
    about = "Throttled weather sensor relay",
    long_about = "Reads newline-delimited JSON readings from a weather sensor daemon,\n\
                  admits at most one reading per interval, converts it to metric units\n\
                  and delivers it to the configured sink on a background worker."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "WEATHER_RELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "WEATHER_RELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the relay until the input ends
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display the effective configuration
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); built-in defaults when omitted
    #[arg(short, long, env = "WEATHER_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read readings from this file instead of stdin
    #[arg(short, long, env = "WEATHER_RELAY_INPUT")]
    pub input: Option<PathBuf>,

    /// Override the admission interval in seconds (0 = admit every reading)
    #[arg(long, env = "WEATHER_RELAY_INTERVAL")]
    pub interval: Option<u64>,

    /// Seconds to wait for the delivery worker after input ends (0 = don't wait)
    #[arg(long, default_value = "5", env = "WEATHER_RELAY_DRAIN_TIMEOUT")]
    pub drain_timeout: u64,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "WEATHER_RELAY_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and exit without reading input
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file; built-in defaults when omitted
    #[arg(short, long, env = "WEATHER_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show sink parameters (secrets are redacted)
    #[arg(long)]
    pub params: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["weather-relay", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert!(args.config.is_none());
        assert!(args.input.is_none());
        assert_eq!(args.interval, None);
        assert_eq!(args.drain_timeout, 5);
        assert_eq!(args.metrics_port, 0);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::try_parse_from([
            "weather-relay",
            "-v",
            "run",
            "--input",
            "readings.jsonl",
            "--interval",
            "0",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.interval, Some(0));
        assert_eq!(args.input, Some(PathBuf::from("readings.jsonl")));
    }

    #[test]
    fn test_handoff_capacity_flag_not_accepted() {
        let result = Cli::try_parse_from(["weather-relay", "run", "--handoff-capacity", "4"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["weather-relay", "-q", "-v", "run"]).is_err());
    }
}
