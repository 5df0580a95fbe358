//! # Relay Runtime
//!
//! Runs channel events through the admission pipeline.
//!
//! ```text
//! relay-runtime [--config relay.toml] check events.jsonl
//! cat events.jsonl | relay-runtime check -
//! relay-runtime show-config
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use tracing::info;

use relay_runtime::cli::{check_lines, Args, Command};
use relay_runtime::{RelayConfig, RelayRuntime};
use relay_telemetry::{init_logging, TelemetryConfig};

#[cfg(feature = "ws")]
use cc_01_group_admission::WebSocketConnector as Connector;
#[cfg(not(feature = "ws"))]
use cc_01_group_admission::MockRelayNetwork as Connector;

/// Load configuration: file if given, defaults otherwise, then env overrides.
fn load_config(args: &Args) -> Result<RelayConfig> {
    let config = match &args.config {
        Some(path) => RelayConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RelayConfig::default(),
    };
    config.apply_env().context("applying environment overrides")
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading events from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading events from {input}"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if args.verbose {
        telemetry = telemetry.with_log_level("debug");
    }
    init_logging(&telemetry).context("initializing logging")?;

    let config = load_config(&args)?;

    match &args.command {
        Command::ShowConfig => {
            print!("{}", config.to_toml()?);
        }
        Command::Check { input } => {
            let events = read_input(input)?;
            info!(
                "[runtime] Checking events (listen_addr={}, database={})",
                config.network.listen_addr,
                config.storage.database_path.display()
            );
            let runtime = RelayRuntime::new(&config, Connector::new());
            for line in check_lines(&runtime, &events).await {
                println!("{line}");
            }
        }
    }

    Ok(())
}
