//! Status polling for uploaded files.
//!
//! [`StatusPoller`] owns one session per [`FileKey`]. Every check fetches
//! `{api_url}/{file_key}`, feeds the payload through [`StatusInterpreter`] and
//! stops the session on a terminal phase, a `polling_recommended: false`
//! response, the polling timeout or an error limit.

mod error;
mod interpreter;
mod key;
mod limits;
mod payload;
mod poller;
mod registry;
mod stop;

pub use error::StatusError;
pub use interpreter::{Continuation, Interpretation, StageAction, StatusInterpreter};
pub use key::{FileKey, FileKeyError, UPLOADS_PREFIX};
pub use limits::{compute_backoff, error_limit, evaluate_limits};
pub use payload::{Phase, StatusPayload};
pub use poller::{CheckOutcome, PollerDebugInfo, StartOutcome, StatusPoller, StatusPollerBuilder};
pub use registry::{ActivePolling, CheckGuard, PollRegistry, PollSession, RegistryError};
pub use stop::StopReason;
