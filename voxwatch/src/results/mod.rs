//! Final result retrieval and presentation.

mod fetcher;
mod presenter;
mod types;

pub use fetcher::{ResultError, ResultFetcher};
pub use presenter::{NoOpPresenter, ResultPresenter};
pub use types::ProcessingResult;
