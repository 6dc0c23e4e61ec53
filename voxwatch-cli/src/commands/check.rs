//! Check command - query the status endpoint once.

use console::style;
use std::sync::Arc;
use voxwatch::status::{FileKey, StatusPayload, StatusPoller};

use crate::error::CliError;
use crate::runner::{CliRunner, PollingOverrides};

/// Arguments for the check command.
pub struct CheckArgs {
    pub file_key: String,
    pub overrides: PollingOverrides,
    pub json: bool,
}

/// Run the check command.
pub fn run(args: CheckArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(false)?;
    runner.log_startup("check");

    let file_key = FileKey::normalize(&args.file_key)?;
    let polling = runner.polling_config(&args.overrides);
    let client = runner.http_client(&polling)?;
    let poller = StatusPoller::new(Arc::new(client), polling);

    let payload = runner.block_on(poller.fetch_status(&file_key))?;

    if args.json {
        let json = serde_json::to_string_pretty(&payload)
            .map_err(|e| CliError::ProcessingFailed(e.to_string()))?;
        println!("{}", json);
    } else {
        for line in describe(&file_key, &payload) {
            println!("{}", line);
        }
    }

    Ok(())
}

/// Human-readable lines for a status payload.
fn describe(file_key: &FileKey, payload: &StatusPayload) -> Vec<String> {
    let mut lines = vec![
        format!("File:     {}", style(file_key).cyan()),
        format!("Status:   {}", style(&payload.status).bold()),
    ];

    if let Some(progress) = payload.progress_percent() {
        lines.push(format!("Progress: {:.0}%", progress));
    }
    if let Some(message) = &payload.message {
        lines.push(format!("Message:  {}", message));
    }
    if let Some(timestamp) = &payload.timestamp {
        lines.push(format!("Updated:  {}", timestamp));
    }
    lines.push(format!(
        "Polling:  {}",
        if payload.polling_recommended {
            "recommended"
        } else {
            "not recommended"
        }
    ));
    if let Some(url) = &payload.resultado_download_url {
        lines.push(format!("Result:   {}", url));
    }

    lines
}
