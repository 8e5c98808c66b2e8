use std::error::Error;
use std::fmt;

/// Informational error a job hands to [`Release::release_with_error`].
///
/// It never changes lock state; it only reaches the takedown hook.
///
/// [`Release::release_with_error`]: super::Release::release_with_error
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Error type for lock construction and future-based acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    /// No tokio runtime was available to schedule deferred dispatch on.
    NoRuntime(String),
    /// The pending `take` was discarded by [`BoundedLock::clear`].
    ///
    /// [`BoundedLock::clear`]: super::BoundedLock::clear
    Cleared,
    /// The lock dropped a pending acquisition before handing it a slot.
    Abandoned,
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::NoRuntime(msg) => write!(f, "no runtime to schedule on: {}", msg),
            LockError::Cleared => write!(f, "lock queue cleared before slot was granted"),
            LockError::Abandoned => write!(f, "lock abandoned pending acquisition"),
        }
    }
}

impl Error for LockError {}
