//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[status]
; Base URL of the status endpoint. The file key is appended as the last
; path segment: <api_url>/uploads/<file>
api_url = {}
; Timeout in seconds for status and result requests (default: 30)
request_timeout_secs = {}

[polling]
; Interval between status checks in milliseconds (default: 3000)
interval_ms = {}
; Maximum time to monitor one file in seconds (default: 300)
max_time_secs = {}
; Stop after this many failed checks in a row (default: 5)
max_consecutive_errors = {}
; Stop after this many failed checks in total (default: 10)
max_total_errors = {}
; Backoff growth per consecutive error (default: 1.5)
backoff_factor = {}
; Upper bound for the backoff delay in milliseconds (default: 30000)
max_backoff_ms = {}
; What to do with the backoff delay after a failed check:
;   advisory   - keep the fixed interval, only log the delay (default)
;   reschedule - push the next check out by the delay
backoff_policy = {}

[stages]
; Elapsed-time ticker period in milliseconds (default: 1000)
tick_interval_ms = {}
; Delay before uploads are re-enabled after processing finishes (default: 3000)
unlock_delay_ms = {}

[upload]
; Delay between a successful upload and the first status check (default: 2000)
monitor_delay_ms = {}

[logging]
; Log file path (default: ~/.voxwatch/voxwatch.log)
file = {}
"#,
        config.status.api_url,
        config.status.request_timeout_secs,
        config.polling.interval_ms,
        config.polling.max_time_secs,
        config.polling.max_consecutive_errors,
        config.polling.max_total_errors,
        config.polling.backoff_factor,
        config.polling.max_backoff_ms,
        config.polling.backoff_policy,
        config.stages.tick_interval_ms,
        config.stages.unlock_delay_ms,
        config.upload.monitor_delay_ms,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
