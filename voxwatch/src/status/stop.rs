//! Reasons a monitoring session ends.

use std::fmt;

/// Why a monitoring session was stopped.
///
/// The string forms are the reason codes written to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The pipeline reported COMPLETED
    Completed,
    /// The pipeline reported ERROR
    ProcessingError,
    /// A non-terminal response said further polling is not recommended
    PollingNotRecommended,
    /// The session exceeded the maximum polling time
    Timeout,
    /// Too many failed checks in a row
    TooManyConsecutiveErrors,
    /// Too many failed checks over the session's lifetime
    TooManyTotalErrors,
    /// Stopped explicitly by the caller
    Requested,
    /// Stopped as part of stopping every session
    Shutdown,
}

impl StopReason {
    /// Returns the reason code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::ProcessingError => "PROCESSING_ERROR",
            Self::PollingNotRecommended => "POLLING_NOT_RECOMMENDED",
            Self::Timeout => "TIMEOUT",
            Self::TooManyConsecutiveErrors => "TOO_MANY_CONSECUTIVE_ERRORS",
            Self::TooManyTotalErrors => "TOO_MANY_TOTAL_ERRORS",
            Self::Requested => "REQUESTED",
            Self::Shutdown => "SHUTDOWN",
        }
    }

    /// Returns true if the session ended because something went wrong.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::ProcessingError
                | Self::Timeout
                | Self::TooManyConsecutiveErrors
                | Self::TooManyTotalErrors
        )
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        assert_eq!(StopReason::Timeout.to_string(), "TIMEOUT");
        assert_eq!(
            StopReason::TooManyConsecutiveErrors.as_str(),
            "TOO_MANY_CONSECUTIVE_ERRORS"
        );
        assert_eq!(StopReason::TooManyTotalErrors.as_str(), "TOO_MANY_TOTAL_ERRORS");
        assert_eq!(
            StopReason::PollingNotRecommended.as_str(),
            "POLLING_NOT_RECOMMENDED"
        );
    }

    #[test]
    fn test_failure_classification() {
        assert!(StopReason::Timeout.is_failure());
        assert!(StopReason::ProcessingError.is_failure());
        assert!(!StopReason::Completed.is_failure());
        assert!(!StopReason::Requested.is_failure());
        assert!(!StopReason::PollingNotRecommended.is_failure());
    }
}
