//! Terminal rendering of monitoring events and results.

use console::style;
use voxwatch::events::MonitorEvent;
use voxwatch::results::{ProcessingResult, ResultError, ResultPresenter};
use voxwatch::stages::{format_elapsed, StageStatus};

/// Longest transcript excerpt printed before truncating.
const TRANSCRIPT_PREVIEW_CHARS: usize = 600;

/// Prints the final result to stdout.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl ResultPresenter for ConsolePresenter {
    fn show_final_results(&self, result: &ProcessingResult) -> Result<(), ResultError> {
        println!();
        println!("{}", style("Results").bold().underlined());

        if !result.has_transcript() && !result.has_analysis() {
            println!("  {}", style("(result contains no transcript or analysis)").dim());
            return Ok(());
        }

        if let Some(summary) = result.summary() {
            println!();
            println!("{}", style("Summary").bold());
            println!("  {}", summary);
        }

        if let Some(text) = result.transcript_text() {
            println!();
            println!("{}", style("Transcript").bold());
            println!("  {}", preview(text, TRANSCRIPT_PREVIEW_CHARS));
        }

        Ok(())
    }
}

/// One line describing `event`, or `None` for events not shown.
pub fn render_event(event: &MonitorEvent) -> Option<String> {
    match event {
        MonitorEvent::ProcessingStarted => Some(style("Processing started").bold().to_string()),
        MonitorEvent::StageChanged {
            stage,
            status,
            detail,
        } => {
            let marker = match status {
                StageStatus::Pending => style("·").dim(),
                StageStatus::Active => style("▶").cyan(),
                StageStatus::Completed => style("✓").green(),
                StageStatus::Error => style("✗").red(),
            };
            let line = match detail {
                Some(detail) => format!("{} {} {}  {}", marker, stage.icon(), stage.title(), style(detail).dim()),
                None => format!("{} {} {}", marker, stage.icon(), stage.title()),
            };
            Some(line)
        }
        MonitorEvent::StatusReceived {
            phase, progress, ..
        } => {
            let progress = progress.map(|p| format!(" {:.0}%", p)).unwrap_or_default();
            Some(format!("  {} {}{}", style("status").dim(), phase, progress))
        }
        MonitorEvent::CheckFailed {
            error,
            consecutive_errors,
            total_errors,
            ..
        } => Some(format!(
            "  {} {} (consecutive {}, total {})",
            style("check failed:").yellow(),
            error,
            consecutive_errors,
            total_errors
        )),
        MonitorEvent::MonitoringStopped { reason, .. } if reason.is_failure() => Some(format!(
            "{} {}",
            style("Monitoring stopped:").red(),
            reason
        )),
        MonitorEvent::ResultFailed { error, .. } => {
            Some(format!("{} {}", style("Result unavailable:").red(), error))
        }
        MonitorEvent::ProcessingFinished { success: true } => {
            Some(style("Processing finished").green().bold().to_string())
        }
        MonitorEvent::ProcessingFinished { success: false } => {
            Some(style("Processing failed").red().bold().to_string())
        }
        _ => None,
    }
}

/// `Elapsed: MM:SS` for the ticker line.
pub fn render_elapsed(event: &MonitorEvent) -> Option<String> {
    match event {
        MonitorEvent::ElapsedTick { elapsed } => {
            Some(format!("Elapsed: {}", format_elapsed(*elapsed)))
        }
        _ => None,
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use voxwatch::stages::StageId;
    use voxwatch::status::{FileKey, StopReason};

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("hola", 10), "hola");
        assert_eq!(preview("canción", 4), "canc…");
    }

    #[test]
    fn test_stage_change_rendered_with_title() {
        let line = render_event(&MonitorEvent::StageChanged {
            stage: StageId::Transcribing,
            status: StageStatus::Active,
            detail: Some("Transcribing audio...".to_string()),
        })
        .unwrap();

        assert!(line.contains("Transcribing audio"));
    }

    #[test]
    fn test_quiet_events_not_rendered() {
        let key = FileKey::normalize("a.wav").unwrap();
        assert!(render_event(&MonitorEvent::MonitoringStarted { file_key: key.clone() }).is_none());
        assert!(render_event(&MonitorEvent::MonitoringStopped {
            file_key: key,
            reason: StopReason::Completed,
        })
        .is_none());
        assert!(render_event(&MonitorEvent::ElapsedTick {
            elapsed: Duration::from_secs(1)
        })
        .is_none());
    }

    #[test]
    fn test_elapsed_rendering() {
        let line = render_elapsed(&MonitorEvent::ElapsedTick {
            elapsed: Duration::from_secs(125),
        });
        assert_eq!(line.as_deref(), Some("Elapsed: 02:05"));
    }

    #[test]
    fn test_presenter_accepts_empty_result() {
        assert!(ConsolePresenter
            .show_final_results(&ProcessingResult::default())
            .is_ok());
    }
}
