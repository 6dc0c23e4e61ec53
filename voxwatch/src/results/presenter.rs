//! Presentation collaborator.

use super::{ProcessingResult, ResultError};

/// Renders the final result somewhere a user can see it.
pub trait ResultPresenter: Send + Sync {
    /// Shows the result. An error marks the completed stage as failed.
    fn show_final_results(&self, result: &ProcessingResult) -> Result<(), ResultError>;
}

/// Presenter that accepts every result and shows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPresenter;

impl ResultPresenter for NoOpPresenter {
    fn show_final_results(&self, _result: &ProcessingResult) -> Result<(), ResultError> {
        Ok(())
    }
}
