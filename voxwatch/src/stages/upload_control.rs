//! Upload trigger lock.

/// Whatever starts uploads (a button, a watcher, a queue consumer).
///
/// The tracker locks it while a file is being processed so a second upload
/// cannot start underneath the first.
pub trait UploadControl: Send + Sync {
    fn lock_upload(&self);
    fn unlock_upload(&self);
}

/// Upload control with nothing to lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpUploadControl;

impl UploadControl for NoOpUploadControl {
    fn lock_upload(&self) {}
    fn unlock_upload(&self) {}
}
