use std::collections::VecDeque;
use std::fmt;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use super::{BoundedLockConfig, LockError};
use crate::scheduler::Scheduler;

type Task = Box<dyn FnOnce() + Send>;

/// A counting lock with `width` slots.
///
/// [`take`](Self::take) runs its job as soon as a slot is free, otherwise the
/// job waits in a FIFO queue. Every job that ran must eventually be matched by
/// a [`free`](Self::free) call. There is no timeout.
///
/// The queue can be paused, resumed and cleared:
///
/// ```
/// use filth_rust::BoundedLock;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let lock = BoundedLock::new(2).unwrap();
/// lock.pause();
/// lock.take(|| println!("runs after play"));
/// assert_eq!(lock.queue_len(), 1);
///
/// lock.play();
/// assert_eq!(lock.taken(), 1);
/// # }
/// ```
#[derive(Clone)]
pub struct BoundedLock {
    inner: Arc<Inner>,
}

struct Inner {
    width: usize,
    scheduler: Scheduler,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    taken: usize,
    queue: VecDeque<Task>,
    paused: bool,
}

impl BoundedLock {
    /// A lock with `width` slots on the current runtime. Zero is clamped to one.
    pub fn new(width: usize) -> Result<Self, LockError> {
        Ok(Self::with_scheduler(width, Scheduler::current()?))
    }

    pub fn with_scheduler(width: usize, scheduler: Scheduler) -> Self {
        BoundedLock {
            inner: Arc::new(Inner {
                width: width.max(1),
                scheduler,
                state: Mutex::new(State::default()),
            }),
        }
    }

    pub fn from_config(config: &BoundedLockConfig) -> Result<Self, LockError> {
        Self::new(config.width())
    }

    /// Run `job` on a later tick once a slot is available.
    pub fn take<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut state = self.inner.lock_state();
            if state.paused || state.taken >= self.inner.width {
                state.queue.push_back(Box::new(job));
                tracing::trace!(queued = state.queue.len(), "bounded lock full, job queued");
                return;
            }
            state.taken += 1;
        }
        self.inner.scheduler.defer(job);
    }

    /// Release one slot, handing it straight to the next queued job unless
    /// the queue is empty or paused.
    pub fn free(&self) {
        let next = {
            let mut state = self.inner.lock_state();
            if state.paused || state.queue.is_empty() {
                state.taken = state.taken.saturating_sub(1);
                tracing::debug!(taken = state.taken, "bounded lock slot freed");
                None
            } else {
                state.queue.pop_front()
            }
        };
        if let Some(job) = next {
            tracing::debug!("bounded lock slot handed to queued job");
            self.inner.scheduler.defer(job);
        }
    }

    /// Stop dispatching queued and new jobs. Running jobs are unaffected.
    pub fn pause(&self) {
        self.inner.lock_state().paused = true;
        tracing::debug!("bounded lock paused");
    }

    /// Resume dispatching, filling every free slot from the queue in order.
    pub fn play(&self) {
        let ready = {
            let mut state = self.inner.lock_state();
            state.paused = false;
            let mut ready = Vec::new();
            while state.taken < self.inner.width {
                match state.queue.pop_front() {
                    Some(job) => {
                        state.taken += 1;
                        ready.push(job);
                    }
                    None => break,
                }
            }
            ready
        };
        tracing::debug!(dispatched = ready.len(), "bounded lock resumed");
        for job in ready {
            self.inner.scheduler.defer(job);
        }
    }

    /// Pause and discard every queued job. Running jobs must still call
    /// [`free`](Self::free).
    pub fn clear(&self) {
        let dropped = {
            let mut state = self.inner.lock_state();
            state.paused = true;
            mem::take(&mut state.queue)
        };
        tracing::debug!(dropped = dropped.len(), "bounded lock cleared");
        drop(dropped);
    }

    /// Wait for a slot and return a guard that frees it on drop.
    ///
    /// Fails with [`LockError::Cleared`] if the pending request is discarded
    /// by [`clear`](Self::clear).
    pub async fn take_async(&self) -> Result<Slot, LockError> {
        let (tx, rx) = oneshot::channel();
        let weak = Arc::downgrade(&self.inner);
        self.take(move || {
            if let Some(inner) = weak.upgrade() {
                let slot = Slot {
                    lock: Some(BoundedLock { inner }),
                };
                // a dropped receiver hands the slot straight back
                let _ = tx.send(slot);
            }
        });
        rx.await.map_err(|_| LockError::Cleared)
    }

    pub fn width(&self) -> usize {
        self.inner.width
    }

    pub fn taken(&self) -> usize {
        self.inner.lock_state().taken
    }

    pub fn queue_len(&self) -> usize {
        self.inner.lock_state().queue.len()
    }

    pub fn is_paused(&self) -> bool {
        self.inner.lock_state().paused
    }
}

impl fmt::Debug for BoundedLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock_state();
        f.debug_struct("BoundedLock")
            .field("width", &self.inner.width)
            .field("taken", &state.taken)
            .field("queued", &state.queue.len())
            .field("paused", &state.paused)
            .finish()
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One occupied slot of a [`BoundedLock`]. Frees the slot when dropped.
pub struct Slot {
    lock: Option<BoundedLock>,
}

impl Slot {
    pub fn free(mut self) {
        if let Some(lock) = self.lock.take() {
            lock.free();
        }
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        if let Some(lock) = self.lock.take() {
            lock.free();
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("held", &self.lock.is_some())
            .finish()
    }
}
