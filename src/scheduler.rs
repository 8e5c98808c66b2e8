//! Deferred dispatch on a tokio runtime.
//!
//! Both lock primitives hand control to jobs, hooks and watchdog
//! continuations through a [`Scheduler`] instead of calling them inline.
//! A task posted with [`Scheduler::defer`] runs on a later tick of the
//! runtime, so an `acquire`, `release`, `take` or `free` call never re-enters
//! the lock's own state transition.

use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use crate::lock::LockError;

/// Posts continuations onto a tokio runtime.
#[derive(Clone)]
pub struct Scheduler {
    handle: Handle,
}

impl Scheduler {
    /// Capture the runtime the caller is running on.
    pub fn current() -> Result<Self, LockError> {
        Handle::try_current()
            .map(Self::from_handle)
            .map_err(|e| LockError::NoRuntime(e.to_string()))
    }

    /// Schedule onto an explicit runtime handle.
    pub fn from_handle(handle: Handle) -> Self {
        Scheduler { handle }
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Run `task` on a later tick, never on the caller's stack.
    pub fn defer<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.handle.spawn(async move { task() });
    }

    /// Run `task` once `delay` has elapsed.
    ///
    /// The returned [`Watchdog`] cancels the timer when dropped or when
    /// [`Watchdog::cancel`] is called, whichever comes first.
    pub fn defer_after<F>(&self, delay: Duration, task: F) -> Watchdog
    where
        F: FnOnce() + Send + 'static,
    {
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task()
        });
        Watchdog {
            abort: join.abort_handle(),
        }
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler").finish_non_exhaustive()
    }
}

/// A pending one-shot timer. Dropping it aborts the timer.
#[derive(Debug)]
pub struct Watchdog {
    abort: AbortHandle,
}

impl Watchdog {
    pub fn cancel(self) {
        self.abort.abort();
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.abort.abort();
    }
}
