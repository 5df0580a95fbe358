//! Command line front end.

use clap::{Parser, Subcommand};
use shared_types::Event;
use std::path::PathBuf;

use crate::runtime::RelayRuntime;

/// Relay admission runner.
#[derive(Parser, Debug)]
#[command(name = "relay-runtime")]
#[command(about = "Run channel events through the relay admission pipeline")]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log at debug level (overrides CC_LOG_LEVEL)
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Submit newline-delimited JSON events and print each verdict
    Check {
        /// Input file, or `-` for stdin
        input: String,
    },
    /// Print the effective configuration as TOML
    ShowConfig,
}

/// Submit every non-blank line of `input` in order and render one result
/// line per event.
pub async fn check_lines(runtime: &RelayRuntime, input: &str) -> Vec<String> {
    let mut report = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match Event::from_json(line) {
            Ok(event) => event,
            Err(e) => {
                report.push(format!("INVALID line {}: {}", index + 1, e));
                continue;
            }
        };

        let id = event.id.clone();
        report.push(match runtime.submit(event).await {
            Ok(_) => format!("OK {id}"),
            Err(rejection) => format!("REJECTED {id}: {rejection}"),
        });
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::RelayConfig;
    use cc_01_group_admission::{AdmissionConfig, MockRelayNetwork};
    use shared_types::{Kind, Tag};

    fn runtime() -> RelayRuntime {
        let config = RelayConfig {
            admission: AdmissionConfig::for_testing(),
            ..Default::default()
        };
        RelayRuntime::new(&config, MockRelayNetwork::new())
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from(["relay-runtime", "--config", "relay.toml", "check", "-"])
            .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("relay.toml")));
        assert_eq!(
            args.command,
            Command::Check {
                input: "-".to_string()
            }
        );

        let args = Args::try_parse_from(["relay-runtime", "show-config"]).unwrap();
        assert_eq!(args.command, Command::ShowConfig);
        assert!(Args::try_parse_from(["relay-runtime"]).is_err());
    }

    #[tokio::test]
    async fn test_check_lines_report() {
        let channel = Event::new("alice", 1, Kind::CHANNEL_CREATION, vec![], r#"{"name":"room"}"#);
        let hijack = Event::new(
            "mallory",
            2,
            Kind::CHANNEL_METADATA,
            vec![Tag::event_reference(&channel.id, "")],
            "{}",
        );
        let input = format!("{}\n\n{}\nnot json\n", channel.to_json(), hijack.to_json());

        let report = check_lines(&runtime(), &input).await;

        assert_eq!(report.len(), 3);
        assert_eq!(report[0], format!("OK {}", channel.id));
        assert_eq!(
            report[1],
            format!(
                "REJECTED {}: failed to get create event: 40 channel not found",
                hijack.id
            )
        );
        assert!(report[2].starts_with("INVALID line 4: "));
    }
}
