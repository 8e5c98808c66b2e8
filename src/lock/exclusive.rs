use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::oneshot;

use super::{BoxError, ExclusiveLockConfig, LockError};
use crate::scheduler::{Scheduler, Watchdog};

type Job = Box<dyn FnOnce(Release) + Send>;
type SetupHook = Arc<dyn Fn(Proceed) + Send + Sync>;
type TakedownHook = Arc<dyn Fn(Option<BoxError>, Proceed) + Send + Sync>;

/// A single-holder asynchronous lock.
///
/// Jobs passed to [`acquire`](Self::acquire) run one at a time in FIFO order.
/// Each job receives a [`Release`] handle and holds the lock until it calls
/// [`Release::release`]. With a timeout configured, a watchdog releases the
/// lock on the holder's behalf once the timeout elapses.
///
/// Optional hooks run around every critical section: `setup` before the job
/// starts, `takedown` after it releases. Both receive a [`Proceed`] handle and
/// the lock does not move on until it is called.
///
/// ## Example
///
/// ```
/// use filth_rust::ExclusiveLock;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let lock = ExclusiveLock::new().unwrap();
/// let (tx, rx) = tokio::sync::oneshot::channel();
///
/// lock.acquire(move |release| {
///     // critical section
///     release.release();
///     let _ = tx.send(());
/// });
///
/// rx.await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct ExclusiveLock {
    inner: Arc<Inner>,
}

struct Inner {
    timeout: Option<Duration>,
    setup: Option<SetupHook>,
    takedown: Option<TakedownHook>,
    scheduler: Scheduler,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    held: bool,
    queue: VecDeque<Job>,
    generation: u64,
    // generation allowed to release; None once cleanup has started
    active: Option<u64>,
    watchdog: Option<Watchdog>,
}

/// Builder for [`ExclusiveLock`].
#[derive(Default)]
pub struct ExclusiveLockBuilder {
    timeout: Option<Duration>,
    setup: Option<SetupHook>,
    takedown: Option<TakedownHook>,
    scheduler: Option<Scheduler>,
}

impl ExclusiveLockBuilder {
    /// Force-release a holder after `timeout`. A zero duration disables it.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout).filter(|t| !t.is_zero());
        self
    }

    pub fn config(mut self, config: &ExclusiveLockConfig) -> Self {
        self.timeout = config.timeout();
        self
    }

    /// Run `hook` before each job. The job starts once the hook calls
    /// [`Proceed::proceed`].
    pub fn setup<F>(mut self, hook: F) -> Self
    where
        F: Fn(Proceed) + Send + Sync + 'static,
    {
        self.setup = Some(Arc::new(hook));
        self
    }

    /// Run `hook` after each job releases, with the error the job reported
    /// (if any). The next job is dispatched once the hook calls
    /// [`Proceed::proceed`].
    pub fn takedown<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<BoxError>, Proceed) + Send + Sync + 'static,
    {
        self.takedown = Some(Arc::new(hook));
        self
    }

    pub fn scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn build(self) -> Result<ExclusiveLock, LockError> {
        let scheduler = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Scheduler::current()?,
        };
        Ok(ExclusiveLock {
            inner: Arc::new(Inner {
                timeout: self.timeout,
                setup: self.setup,
                takedown: self.takedown,
                scheduler,
                state: Mutex::new(State::default()),
            }),
        })
    }
}

impl ExclusiveLock {
    /// A lock with no timeout and no hooks on the current runtime.
    pub fn new() -> Result<Self, LockError> {
        Self::builder().build()
    }

    pub fn builder() -> ExclusiveLockBuilder {
        ExclusiveLockBuilder::default()
    }

    pub fn from_config(config: &ExclusiveLockConfig) -> Result<Self, LockError> {
        Self::builder().config(config).build()
    }

    /// Queue `job` for the lock.
    ///
    /// Returns immediately. The job is invoked on a later scheduler tick,
    /// once every job queued before it has released.
    pub fn acquire<F>(&self, job: F)
    where
        F: FnOnce(Release) + Send + 'static,
    {
        let job: Job = Box::new(job);
        let job = {
            let mut state = self.inner.lock_state();
            if state.held {
                state.queue.push_back(job);
                tracing::trace!(queued = state.queue.len(), "exclusive lock busy, job queued");
                return;
            }
            state.held = true;
            job
        };
        self.inner.dispatch(job);
    }

    /// Wait for the lock and return a guard that releases it on drop.
    ///
    /// Setup and takedown hooks still run around the guarded section. If the
    /// returned future is dropped after the lock was handed to it, the lock is
    /// released right away.
    pub async fn acquire_owned(&self) -> Result<ExclusiveGuard, LockError> {
        let (tx, rx) = oneshot::channel();
        self.acquire(move |release| {
            let guard = ExclusiveGuard {
                release: Some(release),
            };
            // an undelivered guard releases the lock when dropped
            let _ = tx.send(guard);
        });
        rx.await.map_err(|_| LockError::Abandoned)
    }

    pub fn is_held(&self) -> bool {
        self.inner.lock_state().held
    }

    pub fn queue_len(&self) -> usize {
        self.inner.lock_state().queue.len()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }
}

impl fmt::Debug for ExclusiveLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock_state();
        f.debug_struct("ExclusiveLock")
            .field("timeout", &self.inner.timeout)
            .field("held", &state.held)
            .field("queued", &state.queue.len())
            .finish()
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start the dispatch sequence for `job`. The lock must already be held.
    fn dispatch(self: &Arc<Self>, job: Job) {
        let generation = {
            let mut state = self.lock_state();
            state.generation += 1;
            let generation = state.generation;
            state.active = Some(generation);
            state.watchdog = self.timeout.map(|timeout| {
                let weak = Arc::downgrade(self);
                self.scheduler
                    .defer_after(timeout, move || on_watchdog(weak, generation, timeout))
            });
            generation
        };
        tracing::debug!(generation, "exclusive lock dispatching job");

        let release = Release {
            inner: Arc::clone(self),
            generation,
        };
        match &self.setup {
            Some(setup) => {
                let setup = Arc::clone(setup);
                let scheduler = self.scheduler.clone();
                self.scheduler.defer(move || {
                    setup(Proceed::new(move || scheduler.defer(move || job(release))));
                });
            }
            None => self.scheduler.defer(move || job(release)),
        }
    }

    /// First call per generation wins; later calls and stale watchdogs are no-ops.
    fn cleanup(self: &Arc<Self>, generation: u64, error: Option<BoxError>) {
        let watchdog = {
            let mut state = self.lock_state();
            if state.active != Some(generation) {
                return;
            }
            state.active = None;
            state.watchdog.take()
        };
        if let Some(watchdog) = watchdog {
            watchdog.cancel();
        }

        match &self.takedown {
            Some(takedown) => {
                let takedown = Arc::clone(takedown);
                let inner = Arc::clone(self);
                self.scheduler.defer(move || {
                    takedown(error, Proceed::new(move || inner.advance()));
                });
            }
            None => self.advance(),
        }
    }

    /// Hand the lock straight to the next waiter, or mark it free.
    fn advance(self: &Arc<Self>) {
        let next = {
            let mut state = self.lock_state();
            let next = state.queue.pop_front();
            if next.is_none() {
                state.held = false;
            }
            next
        };
        match next {
            Some(job) => self.dispatch(job),
            None => tracing::debug!("exclusive lock free"),
        }
    }
}

fn on_watchdog(inner: Weak<Inner>, generation: u64, timeout: Duration) {
    if let Some(inner) = inner.upgrade() {
        tracing::warn!(generation, ?timeout, "lock holder overran timeout, forcing release");
        inner.cleanup(generation, None);
    }
}

/// Handle a job uses to end its critical section.
///
/// Only the first release of a dispatch counts. Cloning the handle is
/// allowed; every clone refers to the same dispatch.
#[derive(Clone)]
pub struct Release {
    inner: Arc<Inner>,
    generation: u64,
}

impl Release {
    pub fn release(&self) {
        self.inner.cleanup(self.generation, None);
    }

    /// Release, forwarding `error` to the takedown hook.
    pub fn release_with_error<E>(&self, error: E)
    where
        E: Into<BoxError>,
    {
        self.inner.cleanup(self.generation, Some(error.into()));
    }
}

impl fmt::Debug for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Release")
            .field("generation", &self.generation)
            .finish()
    }
}

/// Continuation handed to setup and takedown hooks.
///
/// The lock stays parked until the hook calls [`proceed`](Self::proceed).
#[must_use = "the lock does not advance until `proceed` is called"]
pub struct Proceed {
    then: Box<dyn FnOnce() + Send>,
}

impl Proceed {
    fn new<F>(then: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Proceed {
            then: Box::new(then),
        }
    }

    pub fn proceed(self) {
        (self.then)()
    }
}

impl fmt::Debug for Proceed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proceed").finish_non_exhaustive()
    }
}

/// Holds an [`ExclusiveLock`] until dropped.
#[derive(Debug)]
pub struct ExclusiveGuard {
    release: Option<Release>,
}

impl ExclusiveGuard {
    /// Release now, forwarding `error` to the takedown hook.
    pub fn release_with_error<E>(mut self, error: E)
    where
        E: Into<BoxError>,
    {
        if let Some(release) = self.release.take() {
            release.release_with_error(error);
        }
    }
}

impl Drop for ExclusiveGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release.release();
        }
    }
}
