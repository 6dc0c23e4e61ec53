//! voxwatch CLI - monitor audio transcription jobs from the terminal.

mod commands;
mod error;
mod render;
mod runner;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::config::ConfigCommands;
use runner::PollingOverrides;

#[derive(Parser)]
#[command(name = "voxwatch")]
#[command(version = voxwatch::VERSION)]
#[command(about = "Monitor uploaded audio files through transcription and analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Status endpoint overrides shared by commands that poll.
#[derive(Debug, Args)]
struct EndpointArgs {
    /// Status endpoint base URL (overrides status.api_url)
    #[arg(long)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Monitor an uploaded file until processing completes
    Watch {
        /// Storage key of the uploaded file (with or without "uploads/")
        file_key: String,

        #[command(flatten)]
        endpoint: EndpointArgs,

        /// Polling interval in milliseconds (overrides polling.interval_ms)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,

        /// Save the result document to this path
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Enable debug logging on stdout
        #[arg(long)]
        debug: bool,
    },

    /// Query the status of a file once
    Check {
        /// Storage key of the uploaded file (with or without "uploads/")
        file_key: String,

        #[command(flatten)]
        endpoint: EndpointArgs,

        /// Print the raw status payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a result document from its (time-limited) URL
    Fetch {
        /// Result download URL
        url: String,

        /// Save the result document to this path
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Watch {
            file_key,
            endpoint,
            interval_ms,
            output,
            debug,
        } => commands::watch::run(commands::watch::WatchArgs {
            file_key,
            overrides: PollingOverrides {
                api_url: endpoint.api_url,
                interval_ms,
            },
            output,
            debug,
        }),
        Commands::Check {
            file_key,
            endpoint,
            json,
        } => commands::check::run(commands::check::CheckArgs {
            file_key,
            overrides: PollingOverrides {
                api_url: endpoint.api_url,
                interval_ms: None,
            },
            json,
        }),
        Commands::Fetch { url, output } => {
            commands::fetch::run(commands::fetch::FetchArgs { url, output })
        }
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_watch_arguments() {
        let cli = Cli::try_parse_from([
            "voxwatch",
            "watch",
            "uploads/talk.wav",
            "--api-url",
            "http://localhost:8080/status",
            "--interval-ms",
            "500",
            "-o",
            "result.json",
        ])
        .unwrap();

        match cli.command {
            Commands::Watch {
                file_key,
                endpoint,
                interval_ms,
                output,
                debug,
            } => {
                assert_eq!(file_key, "uploads/talk.wav");
                assert_eq!(endpoint.api_url.as_deref(), Some("http://localhost:8080/status"));
                assert_eq!(interval_ms, Some(500));
                assert_eq!(output, Some(PathBuf::from("result.json")));
                assert!(!debug);
            }
            _ => panic!("expected watch"),
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(Cli::try_parse_from(["voxwatch", "watch", "a.wav", "--interval-ms", "0"]).is_err());
    }

    #[test]
    fn test_config_set_arguments() {
        let cli =
            Cli::try_parse_from(["voxwatch", "config", "set", "polling.interval_ms", "5000"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Set { .. }
            }
        ));
    }
}
