//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::polling::BackoffPolicy;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [status] section
    if let Some(section) = ini.section(Some("status")) {
        if let Some(v) = section.get("api_url") {
            let v = v.trim();
            if !v.starts_with("http://") && !v.starts_with("https://") {
                return Err(invalid(
                    "status",
                    "api_url",
                    v,
                    "must be a URL starting with 'http://' or 'https://'",
                ));
            }
            config.status.api_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = positive(section, "status", "request_timeout_secs")? {
            config.status.request_timeout_secs = v;
        }
    }

    // [polling] section
    if let Some(section) = ini.section(Some("polling")) {
        if let Some(v) = positive(section, "polling", "interval_ms")? {
            config.polling.interval_ms = v;
        }
        if let Some(v) = positive(section, "polling", "max_time_secs")? {
            config.polling.max_time_secs = v;
        }
        if let Some(v) = positive(section, "polling", "max_consecutive_errors")? {
            config.polling.max_consecutive_errors = v;
        }
        if let Some(v) = positive(section, "polling", "max_total_errors")? {
            config.polling.max_total_errors = v;
        }
        if let Some(v) = section.get("backoff_factor") {
            config.polling.backoff_factor = match v.trim().parse::<f64>() {
                Ok(n) if n >= 1.0 => n,
                _ => {
                    return Err(invalid(
                        "polling",
                        "backoff_factor",
                        v,
                        "must be a number >= 1.0",
                    ))
                }
            };
        }
        if let Some(v) = positive(section, "polling", "max_backoff_ms")? {
            config.polling.max_backoff_ms = v;
        }
        if let Some(v) = section.get("backoff_policy") {
            config.polling.backoff_policy = BackoffPolicy::from_str(v)
                .map_err(|_| invalid("polling", "backoff_policy", v, "must be 'advisory' or 'reschedule'"))?;
        }
    }

    // [stages] section
    if let Some(section) = ini.section(Some("stages")) {
        if let Some(v) = positive(section, "stages", "tick_interval_ms")? {
            config.stages.tick_interval_ms = v;
        }
        if let Some(v) = non_negative(section, "stages", "unlock_delay_ms")? {
            config.stages.unlock_delay_ms = v;
        }
    }

    // [upload] section
    if let Some(section) = ini.section(Some("upload")) {
        if let Some(v) = non_negative(section, "upload", "monitor_delay_ms")? {
            config.upload.monitor_delay_ms = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Parse an integer that must be greater than zero.
fn positive<T>(section: &Properties, name: &str, key: &str) -> Result<Option<T>, ConfigFileError>
where
    T: FromStr + PartialEq + Default,
{
    match section.get(key) {
        None => Ok(None),
        Some(v) => match v.trim().parse::<T>() {
            Ok(n) if n != T::default() => Ok(Some(n)),
            _ => Err(invalid(name, key, v, "must be a positive integer")),
        },
    }
}

/// Parse an integer that may be zero.
fn non_negative(
    section: &Properties,
    name: &str,
    key: &str,
) -> Result<Option<u64>, ConfigFileError> {
    match section.get(key) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| invalid(name, key, v, "must be a non-negative integer (milliseconds)")),
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(content).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_ini_gives_defaults() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_polling_section_overrides() {
        let config = parse(
            "[polling]\n\
             interval_ms = 1000\n\
             max_time_secs = 60\n\
             max_consecutive_errors = 3\n\
             max_total_errors = 7\n\
             backoff_factor = 2.0\n\
             max_backoff_ms = 10000\n\
             backoff_policy = reschedule\n",
        )
        .unwrap();

        assert_eq!(config.polling.interval_ms, 1_000);
        assert_eq!(config.polling.max_time_secs, 60);
        assert_eq!(config.polling.max_consecutive_errors, 3);
        assert_eq!(config.polling.max_total_errors, 7);
        assert_eq!(config.polling.backoff_factor, 2.0);
        assert_eq!(config.polling.max_backoff_ms, 10_000);
        assert_eq!(config.polling.backoff_policy, BackoffPolicy::Reschedule);
    }

    #[test]
    fn test_api_url_trailing_slash_stripped() {
        let config = parse("[status]\napi_url = https://api.example.com/v1/status/\n").unwrap();
        assert_eq!(config.status.api_url, "https://api.example.com/v1/status");
    }

    #[test]
    fn test_invalid_api_url() {
        let err = parse("[status]\napi_url = ftp://nope\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue { section, key, .. } => {
                assert_eq!(section, "status");
                assert_eq!(key, "api_url");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = parse("[polling]\ninterval_ms = 0\n").unwrap_err();
        assert!(err.to_string().contains("polling.interval_ms"));
    }

    #[test]
    fn test_zero_unlock_delay_allowed() {
        let config = parse("[stages]\nunlock_delay_ms = 0\n").unwrap();
        assert_eq!(config.stages.unlock_delay_ms, 0);
    }

    #[test]
    fn test_backoff_factor_below_one_rejected() {
        assert!(parse("[polling]\nbackoff_factor = 0.5\n").is_err());
        assert!(parse("[polling]\nbackoff_factor = fast\n").is_err());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = parse("[polling]\nbackoff_policy = eventually\n").unwrap_err();
        assert!(err.to_string().contains("backoff_policy"));
    }

    #[test]
    fn test_logging_file_override() {
        let config = parse("[logging]\nfile = /tmp/vw.log\n").unwrap();
        assert_eq!(config.logging.file, PathBuf::from("/tmp/vw.log"));
    }
}
