//! Asynchronous lock primitives for callback-style code.
//!
//! - [`ExclusiveLock`]: one holder at a time, optional setup/takedown hooks
//!   and a watchdog timeout.
//! - [`BoundedLock`]: up to `width` holders, with pause, play and clear.
//!
//! Neither lock ever calls a job on the caller's stack; dispatch always goes
//! through the [`Scheduler`](crate::scheduler::Scheduler).

mod bounded;
mod config;
mod error;
mod exclusive;

pub use bounded::{BoundedLock, Slot};
pub use config::{BoundedLockConfig, ExclusiveLockConfig};
pub use error::{BoxError, LockError};
pub use exclusive::{ExclusiveGuard, ExclusiveLock, ExclusiveLockBuilder, Proceed, Release};
