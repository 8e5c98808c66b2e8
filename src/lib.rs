//! Asynchronous locks for callback-style code, plus deep clone, merge and
//! compare over JSON-like values.
//!
//! The core of the crate is the pair of lock primitives in [`lock`]:
//!
//! - [`ExclusiveLock`]: a single-holder lock with optional setup/takedown
//!   hooks and a watchdog timeout.
//! - [`BoundedLock`]: a counting lock with pause, play and clear controls.
//!
//! Both hand control to waiting jobs through a [`Scheduler`] on a tokio
//! runtime, never on the caller's stack.
//!
//! With the `tree` feature (on by default) the crate also provides the
//! [`Value`] model with [`deep_clone`], [`merge`], [`compare`] and prototype
//! delegation via [`Prototype`].

pub mod latency;
pub mod lock;
pub mod scheduler;

#[cfg(feature = "tree")]
pub mod inherit;
#[cfg(feature = "tree")]
pub mod tree;
#[cfg(feature = "tree")]
pub mod value;

pub use latency::{hr_diff, LatencyLogger};
pub use lock::{
    BoundedLock, BoundedLockConfig, BoxError, ExclusiveGuard, ExclusiveLock, ExclusiveLockBuilder,
    ExclusiveLockConfig, LockError, Proceed, Release, Slot,
};
pub use scheduler::{Scheduler, Watchdog};

#[cfg(feature = "tree")]
pub use inherit::{create_child, inherit, Prototype};
#[cfg(feature = "tree")]
pub use tree::{compare, compare_lists, deep_clone, merge, CloneError};
#[cfg(feature = "tree")]
pub use value::{type_name, Foreign, Function, Map, Value};
