//! Watch command - monitor one uploaded file until processing ends.

use console::{style, Term};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};
use voxwatch::context::MonitorContext;
use voxwatch::events::{BroadcastSink, MonitorEvent};
use voxwatch::results::ProcessingResult;
use voxwatch::stages::{format_elapsed, StageId, StageStatus};
use voxwatch::status::{FileKey, StartOutcome, StopReason};

use crate::error::CliError;
use crate::render::{render_elapsed, render_event, ConsolePresenter};
use crate::runner::{CliRunner, PollingOverrides};

/// Arguments for the watch command.
pub struct WatchArgs {
    pub file_key: String,
    pub overrides: PollingOverrides,
    pub output: Option<PathBuf>,
    pub debug: bool,
}

/// How a watch ended.
#[derive(Debug)]
pub enum WatchOutcome {
    /// The stage tracker finished the run.
    Finished {
        success: bool,
        result: Option<Arc<ProcessingResult>>,
        /// Detail of the last errored stage
        error: Option<String>,
    },
    /// Monitoring ended before the run finished.
    Stopped(StopReason),
    /// Interrupted from the terminal.
    Interrupted,
}

/// Run the watch command.
pub fn run(args: WatchArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("watch");

    let file_key = FileKey::normalize(&args.file_key)?;
    let polling = runner.polling_config(&args.overrides);
    let client = runner.http_client(&polling)?;

    let sink = Arc::new(BroadcastSink::default());
    let mut events = sink.subscribe();
    let context = MonitorContext::builder(client, runner.config())
        .with_polling_config(polling)
        .with_presenter(Arc::new(ConsolePresenter))
        .with_events(sink)
        .build();

    println!("Watching {}", style(&file_key).cyan());
    println!(
        "Status endpoint: {}",
        style(context.poller().status_url(&file_key)).dim()
    );
    println!();

    let term = Term::stdout();
    let outcome = runner.block_on(async {
        // The file is already in storage; the run begins at the trigger stage.
        let tracker = context.tracker();
        tracker.start_processing();
        tracker.complete_stage(Some(StageId::Upload));
        tracker.next_stage(Some(StageId::Trigger), None);

        let started = context.poller().start_monitoring(file_key.as_str()).await;
        if let StartOutcome::InvalidKey = started {
            return WatchOutcome::Stopped(StopReason::Requested);
        }

        tokio::select! {
            outcome = wait_for_outcome(&mut events, |line| print_line(&term, line)) => outcome,
            _ = tokio::signal::ctrl_c() => WatchOutcome::Interrupted,
        }
    });

    let elapsed = context.tracker().elapsed();
    context.shutdown();
    let _ = term.clear_line();

    if let Some(elapsed) = elapsed {
        println!("Total time: {}", format_elapsed(elapsed));
    }

    match outcome {
        WatchOutcome::Finished {
            success: true,
            result,
            ..
        } => {
            if let Some(path) = &args.output {
                match &result {
                    Some(result) => {
                        runner.save_result(path, result)?;
                        println!("Result saved to {}", style(path.display()).cyan());
                    }
                    None => warn!("No result document to save"),
                }
            }
            Ok(())
        }
        WatchOutcome::Finished { error, .. } => Err(CliError::ProcessingFailed(
            error.unwrap_or_else(|| "unknown error".to_string()),
        )),
        WatchOutcome::Stopped(reason) => Err(CliError::MonitoringFailed(reason)),
        WatchOutcome::Interrupted => {
            println!("Interrupted");
            Err(CliError::MonitoringFailed(StopReason::Shutdown))
        }
    }
}

/// Consumes events until the run finishes or monitoring stops early.
///
/// `print` receives either a full line (`Line`) or the elapsed ticker text
/// (`Ticker`), which callers typically redraw in place.
pub async fn wait_for_outcome<F>(
    events: &mut broadcast::Receiver<MonitorEvent>,
    mut print: F,
) -> WatchOutcome
where
    F: FnMut(Output<'_>),
{
    let mut result = None;
    let mut error = None;

    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(n)) => {
                debug!(skipped = n, "Event display lagged");
                continue;
            }
            Err(RecvError::Closed) => return WatchOutcome::Stopped(StopReason::Shutdown),
        };

        if let Some(ticker) = render_elapsed(&event) {
            print(Output::Ticker(&ticker));
            continue;
        }
        if let Some(line) = render_event(&event) {
            print(Output::Line(&line));
        }

        match event {
            MonitorEvent::StageChanged {
                status: StageStatus::Error,
                detail,
                ..
            } => error = detail,
            MonitorEvent::ResultReady { result: ready, .. } => result = Some(ready),
            MonitorEvent::ProcessingFinished { success } => {
                return WatchOutcome::Finished {
                    success,
                    result,
                    error,
                }
            }
            MonitorEvent::MonitoringStopped { reason, .. } if reason != StopReason::Completed => {
                return WatchOutcome::Stopped(reason)
            }
            _ => {}
        }
    }
}

/// One piece of watch output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output<'a> {
    Line(&'a str),
    Ticker(&'a str),
}

fn print_line(term: &Term, output: Output<'_>) {
    let _ = term.clear_line();
    let _ = match output {
        Output::Line(line) => term.write_line(line),
        Output::Ticker(ticker) => term.write_str(ticker),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use voxwatch::events::EventSink;

    fn key() -> FileKey {
        FileKey::normalize("a.wav").unwrap()
    }

    #[tokio::test]
    async fn test_finishes_on_successful_run() {
        let sink = BroadcastSink::default();
        let mut rx = sink.subscribe();

        sink.emit(&MonitorEvent::MonitoringStopped {
            file_key: key(),
            reason: StopReason::Completed,
        });
        sink.emit(&MonitorEvent::ResultReady {
            file_key: key(),
            result: Arc::new(ProcessingResult::default()),
        });
        sink.emit(&MonitorEvent::ProcessingFinished { success: true });

        let outcome = wait_for_outcome(&mut rx, |_| {}).await;
        assert!(matches!(
            outcome,
            WatchOutcome::Finished {
                success: true,
                result: Some(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_captures_stage_error_detail() {
        let sink = BroadcastSink::default();
        let mut rx = sink.subscribe();

        sink.emit(&MonitorEvent::StageChanged {
            stage: StageId::Analyzing,
            status: StageStatus::Error,
            detail: Some("Processing error: bad audio".to_string()),
        });
        sink.emit(&MonitorEvent::ProcessingFinished { success: false });

        match wait_for_outcome(&mut rx, |_| {}).await {
            WatchOutcome::Finished { success, error, .. } => {
                assert!(!success);
                assert_eq!(error.as_deref(), Some("Processing error: bad audio"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stops_on_limit() {
        let sink = BroadcastSink::default();
        let mut rx = sink.subscribe();

        sink.emit(&MonitorEvent::MonitoringStopped {
            file_key: key(),
            reason: StopReason::Timeout,
        });

        assert!(matches!(
            wait_for_outcome(&mut rx, |_| {}).await,
            WatchOutcome::Stopped(StopReason::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_ticker_printed_separately() {
        let sink = BroadcastSink::default();
        let mut rx = sink.subscribe();
        sink.emit(&MonitorEvent::ElapsedTick {
            elapsed: Duration::from_secs(3),
        });
        sink.emit(&MonitorEvent::ProcessingFinished { success: true });

        let mut outputs = Vec::new();
        wait_for_outcome(&mut rx, |out| {
            outputs.push(match out {
                Output::Line(l) => format!("line:{l}"),
                Output::Ticker(t) => format!("ticker:{t}"),
            })
        })
        .await;

        assert_eq!(outputs[0], "ticker:Elapsed: 00:03");
        assert!(outputs[1].starts_with("line:"));
    }
}
