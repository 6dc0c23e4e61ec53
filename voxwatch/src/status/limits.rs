//! Stop conditions and backoff arithmetic.

use super::StopReason;
use crate::config::PollingConfig;
use std::time::Duration;

/// Checks the limits evaluated before every scheduled check.
///
/// Priority is fixed: timeout, then consecutive errors, then total errors.
/// Timeout is strict: a session exactly at `max_polling_time` may still check.
pub fn evaluate_limits(
    config: &PollingConfig,
    elapsed: Duration,
    consecutive_errors: u32,
    total_errors: u32,
) -> Option<StopReason> {
    if elapsed > config.max_polling_time() {
        return Some(StopReason::Timeout);
    }
    error_limit(config, consecutive_errors, total_errors)
}

/// Checks only the error counters. Used right after a failure is recorded.
pub fn error_limit(
    config: &PollingConfig,
    consecutive_errors: u32,
    total_errors: u32,
) -> Option<StopReason> {
    if consecutive_errors >= config.max_consecutive_errors() {
        Some(StopReason::TooManyConsecutiveErrors)
    } else if total_errors >= config.max_total_errors() {
        Some(StopReason::TooManyTotalErrors)
    } else {
        None
    }
}

/// `min(interval × factor^consecutive_errors, cap)`.
pub fn compute_backoff(
    interval: Duration,
    consecutive_errors: u32,
    factor: f64,
    cap: Duration,
) -> Duration {
    let exponent = i32::try_from(consecutive_errors).unwrap_or(i32::MAX);
    let secs = interval.as_secs_f64() * factor.powi(exponent);

    if !secs.is_finite() || secs < 0.0 || secs >= cap.as_secs_f64() {
        return cap;
    }
    Duration::from_secs_f64(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_backoff_sequence() {
        let interval = ms(3_000);
        let cap = ms(30_000);

        assert_eq!(compute_backoff(interval, 0, 1.5, cap), ms(3_000));
        assert_eq!(compute_backoff(interval, 1, 1.5, cap), ms(4_500));
        assert_eq!(compute_backoff(interval, 2, 1.5, cap), ms(6_750));
        assert_eq!(compute_backoff(interval, 3, 1.5, cap).as_millis(), 10_125);
        assert_eq!(compute_backoff(interval, 6, 1.5, cap), cap);
    }

    #[test]
    fn test_backoff_never_exceeds_cap() {
        let cap = ms(30_000);
        for n in 0..200 {
            assert!(compute_backoff(ms(3_000), n, 1.5, cap) <= cap);
        }
        assert_eq!(compute_backoff(ms(3_000), u32::MAX, 1.5, cap), cap);
    }

    #[test]
    fn test_backoff_caps_values_too_large_for_duration() {
        let cap = ms(30_000);
        // 3s × 1.5^110 is finite but beyond what a Duration can hold
        assert_eq!(compute_backoff(ms(3_000), 110, 1.5, cap), cap);
        assert_eq!(compute_backoff(ms(3_000), 1_000, 10.0, cap), cap);
    }

    #[test]
    fn test_no_limit_when_fresh() {
        let config = PollingConfig::default();
        assert_eq!(evaluate_limits(&config, ms(0), 0, 0), None);
        assert_eq!(evaluate_limits(&config, ms(299_999), 4, 9), None);
    }

    #[test]
    fn test_timeout_is_strict() {
        let config = PollingConfig::default();
        assert_eq!(evaluate_limits(&config, ms(300_000), 0, 0), None);
        assert_eq!(
            evaluate_limits(&config, ms(300_001), 0, 0),
            Some(StopReason::Timeout)
        );
    }

    #[test]
    fn test_priority_order() {
        let config = PollingConfig::default();

        assert_eq!(
            evaluate_limits(&config, ms(400_000), 5, 10),
            Some(StopReason::Timeout)
        );
        assert_eq!(
            evaluate_limits(&config, ms(0), 5, 10),
            Some(StopReason::TooManyConsecutiveErrors)
        );
        assert_eq!(
            evaluate_limits(&config, ms(0), 2, 10),
            Some(StopReason::TooManyTotalErrors)
        );
    }

    #[test]
    fn test_error_limit_thresholds() {
        let config = PollingConfig::default();
        assert_eq!(error_limit(&config, 4, 4), None);
        assert_eq!(
            error_limit(&config, 5, 5),
            Some(StopReason::TooManyConsecutiveErrors)
        );
        assert_eq!(
            error_limit(&config, 0, 10),
            Some(StopReason::TooManyTotalErrors)
        );
    }
}
