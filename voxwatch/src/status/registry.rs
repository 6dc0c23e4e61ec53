//! Registry of active monitoring sessions.
//!
//! One [`PollSession`] per file key. A session is present exactly while
//! polling is active for its key; removal and cancellation happen together.
//!
//! Uses `DashMap` so the polling tasks, external `check_status` callers and
//! `stop_*` calls never contend on a single lock.

use super::FileKey;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A session for this key is already registered.
    #[error("monitoring already active for {0}")]
    AlreadyActive(FileKey),
}

/// Per-file polling state.
pub struct PollSession {
    file_key: FileKey,
    started_at: Instant,
    /// Cancelled when the session terminates; stops the polling task.
    token: CancellationToken,
    consecutive_errors: AtomicU32,
    total_errors: AtomicU32,
    last_success_at: Mutex<Instant>,
    /// Set while a check for this session is in flight.
    in_flight: AtomicBool,
    /// Set once the recurring task has been spawned.
    scheduled: AtomicBool,
}

impl PollSession {
    pub fn new(file_key: FileKey) -> Self {
        let now = Instant::now();
        Self {
            file_key,
            started_at: now,
            token: CancellationToken::new(),
            consecutive_errors: AtomicU32::new(0),
            total_errors: AtomicU32::new(0),
            last_success_at: Mutex::new(now),
            in_flight: AtomicBool::new(false),
            scheduled: AtomicBool::new(false),
        }
    }

    pub fn file_key(&self) -> &FileKey {
        &self.file_key
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors.load(Ordering::Acquire)
    }

    pub fn total_errors(&self) -> u32 {
        self.total_errors.load(Ordering::Acquire)
    }

    pub fn time_since_last_success(&self) -> Duration {
        self.last_success_at.lock().elapsed()
    }

    /// Resets the consecutive counter and records the success time.
    pub fn record_success(&self) {
        self.consecutive_errors.store(0, Ordering::Release);
        *self.last_success_at.lock() = Instant::now();
    }

    /// Increments both counters, returning `(consecutive, total)`.
    pub fn record_failure(&self) -> (u32, u32) {
        let consecutive = self.consecutive_errors.fetch_add(1, Ordering::AcqRel) + 1;
        let total = self.total_errors.fetch_add(1, Ordering::AcqRel) + 1;
        (consecutive, total)
    }

    /// Claims the in-flight flag. Returns `None` if a check is already running.
    pub fn try_begin_check(&self) -> Option<CheckGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CheckGuard { session: self })
    }

    pub fn is_checking(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn mark_scheduled(&self) {
        self.scheduled.store(true, Ordering::Release);
    }

    /// True once recurring checks are running for this session.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled.load(Ordering::Acquire) && !self.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl std::fmt::Debug for PollSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollSession")
            .field("file_key", &self.file_key)
            .field("elapsed", &self.elapsed())
            .field("consecutive_errors", &self.consecutive_errors())
            .field("total_errors", &self.total_errors())
            .field("in_flight", &self.is_checking())
            .field("is_cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Releases the in-flight flag when dropped.
pub struct CheckGuard<'a> {
    session: &'a PollSession,
}

impl Drop for CheckGuard<'_> {
    fn drop(&mut self) {
        self.session.in_flight.store(false, Ordering::Release);
    }
}

/// Snapshot row for [`PollRegistry::list_active`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePolling {
    pub file_key: FileKey,
    pub elapsed: Duration,
    /// True once recurring checks are scheduled
    pub is_active: bool,
}

/// Registry of active sessions, keyed by normalised file key.
#[derive(Default)]
pub struct PollRegistry {
    sessions: DashMap<FileKey, Arc<PollSession>>,
}

impl PollRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new session. Check and insert are atomic.
    pub fn add(&self, file_key: FileKey) -> Result<Arc<PollSession>, RegistryError> {
        match self.sessions.entry(file_key) {
            Entry::Occupied(entry) => Err(RegistryError::AlreadyActive(entry.key().clone())),
            Entry::Vacant(entry) => {
                let session = Arc::new(PollSession::new(entry.key().clone()));
                entry.insert(Arc::clone(&session));
                Ok(session)
            }
        }
    }

    pub fn get(&self, file_key: &FileKey) -> Option<Arc<PollSession>> {
        self.sessions.get(file_key).map(|s| Arc::clone(s.value()))
    }

    pub fn contains(&self, file_key: &FileKey) -> bool {
        self.sessions.contains_key(file_key)
    }

    /// Removes and returns the session for `file_key`, if any.
    pub fn remove(&self, file_key: &FileKey) -> Option<Arc<PollSession>> {
        self.sessions.remove(file_key).map(|(_, session)| session)
    }

    /// Removes `session` only if it is still the registered session for its key.
    pub fn remove_session(&self, session: &Arc<PollSession>) -> bool {
        self.sessions
            .remove_if(session.file_key(), |_, current| Arc::ptr_eq(current, session))
            .is_some()
    }

    /// True if `session` is the one currently registered for its key.
    pub fn is_current(&self, session: &Arc<PollSession>) -> bool {
        self.sessions
            .get(session.file_key())
            .is_some_and(|current| Arc::ptr_eq(current.value(), session))
    }

    /// Active sessions sorted by file key.
    pub fn list_active(&self) -> Vec<ActivePolling> {
        let mut active: Vec<ActivePolling> = self
            .sessions
            .iter()
            .map(|entry| ActivePolling {
                file_key: entry.key().clone(),
                elapsed: entry.value().elapsed(),
                is_active: entry.value().is_scheduled(),
            })
            .collect();
        active.sort_by(|a, b| a.file_key.cmp(&b.file_key));
        active
    }

    /// Removes every session and returns them.
    pub fn drain(&self) -> Vec<Arc<PollSession>> {
        let keys: Vec<FileKey> = self.sessions.iter().map(|e| e.key().clone()).collect();
        keys.iter().filter_map(|key| self.remove(key)).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
