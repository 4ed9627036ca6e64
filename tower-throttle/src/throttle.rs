use crate::{
    config::Config,
    future::ResponseFuture,
    permit::Permit,
    queue::{Grant, Pending, Tx},
    wake::Rescheduler,
    window::Tracker,
    work::Work,
};
use std::{
    fmt,
    future::{self, Ready},
    sync::{Arc, Mutex, MutexGuard},
};
use tokio::time::Instant;

/// Gates asynchronous work behind a concurrency limit or a per-window limit.
///
/// Every call to [`acquire`] is decided immediately: the work is admitted,
/// queued until capacity frees, or rejected with [`CapacityExceeded`] when the
/// throttle is configured to [`reject_on_limit`]. Queued work is admitted in
/// submission order.
///
/// Cloning a `Throttle` yields another handle to the same limit.
///
/// In windowed mode the throttle uses a Tokio timer to admit queued work once
/// the window slides, so it should be used from within a Tokio runtime.
///
/// [`acquire`]: Throttle::acquire
/// [`CapacityExceeded`]: crate::error::CapacityExceeded
/// [`reject_on_limit`]: crate::Config::reject_on_limit
#[derive(Clone)]
pub struct Throttle {
    shared: Arc<Shared>,
}

pub(crate) struct Shared {
    config: Config,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    tracker: Tracker,
    pending: Pending,
    wake: Rescheduler,
}

pub(crate) enum Admission {
    Admitted(Permit),
    Queued(crate::queue::Rx),
    Rejected,
}

/// Queued submissions admitted under the lock, handed their permits once the
/// lock is released.
type Admitted = Vec<(Tx, Permit)>;

// ===== impl Throttle =====

impl Throttle {
    /// Create a new throttle with the given configuration.
    pub fn new(config: Config) -> Self {
        let state = State {
            tracker: Tracker::new(&config),
            pending: Pending::new(),
            wake: Rescheduler::new(),
        };
        Throttle {
            shared: Arc::new(Shared {
                config,
                state: Mutex::new(state),
            }),
        }
    }

    /// Submit `work`.
    ///
    /// The returned future resolves to:
    ///
    /// - `Ok(Some(response))` once the work was admitted and succeeded,
    /// - `Ok(None)` if the work was still queued when [`flush`] was called,
    /// - the work's own error if it failed,
    /// - [`CapacityExceeded`] if it was rejected,
    /// - [`Cleared`] if it was still queued when [`clear`] was called.
    ///
    /// The work is only started once it has been admitted. Dropping the
    /// returned future gives back any capacity it holds.
    ///
    /// [`flush`]: Throttle::flush
    /// [`clear`]: Throttle::clear
    /// [`CapacityExceeded`]: crate::error::CapacityExceeded
    /// [`Cleared`]: crate::error::Cleared
    pub fn acquire<W>(&self, work: W) -> ResponseFuture<W>
    where
        W: Work,
    {
        match self.shared.submit() {
            Admission::Admitted(permit) => ResponseFuture::running(work.start(), permit),
            Admission::Queued(rx) => ResponseFuture::queued(rx, work),
            Admission::Rejected => ResponseFuture::rejected(),
        }
    }

    /// Discard every queued submission.
    ///
    /// Their futures resolve to [`Cleared`] without the work ever running.
    /// Work already admitted is unaffected.
    ///
    /// [`Cleared`]: crate::error::Cleared
    pub fn clear(&self) -> &Self {
        let mut state = self.shared.lock();
        let count = state.pending.clear();
        state.wake.cancel();
        tracing::debug!(count, "cleared queued submissions");
        self
    }

    /// Settle every queued submission with `Ok(None)` without running its
    /// work, ignoring capacity.
    ///
    /// All queued submissions are settled by the time this returns; the
    /// returned future is already complete.
    pub fn flush(&self) -> Ready<()> {
        let waiters = {
            let mut state = self.shared.lock();
            let waiters = state.pending.drain_all();
            state.wake.cancel();
            waiters
        };

        tracing::debug!(count = waiters.len(), "flushing queued submissions");
        for tx in waiters {
            // The caller may have stopped listening; nothing to settle then.
            let _ = tx.send(Grant::Flushed);
        }
        future::ready(())
    }

    /// The number of submissions waiting for capacity.
    pub fn queued(&self) -> usize {
        self.shared.lock().pending.len()
    }

    /// The configuration this throttle was created with.
    pub fn config(&self) -> &Config {
        &self.shared.config
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Throttle::new(Config::default())
    }
}

impl fmt::Debug for Throttle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttle")
            .field("config", &self.shared.config)
            .field("queued", &self.queued())
            .finish()
    }
}

// ===== impl Shared =====

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        // The state is consistent between statements, so a panic elsewhere
        // while holding the lock leaves nothing half-updated.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Decide what happens to one new submission.
    pub(crate) fn submit(self: &Arc<Self>) -> Admission {
        let mut admitted = Admitted::new();
        let admission = {
            let mut state = self.lock();
            let now = Instant::now();
            state.tracker.prune(now);

            if state.pending.is_empty() && state.tracker.has_capacity() {
                state.tracker.admit(now);
                tracing::trace!("admitted");
                Admission::Admitted(Permit::new(self.clone()))
            } else if self.config.rejects_on_limit() {
                tracing::debug!("capacity exceeded; rejecting");
                Admission::Rejected
            } else {
                let rx = state.pending.enqueue();
                tracing::trace!(queued = state.pending.len(), "capacity exhausted; queued");
                self.release(&mut state, now, &mut admitted);
                Admission::Queued(rx)
            }
        };
        hand_out(admitted);
        admission
    }

    /// Called when an admitted execution ends.
    pub(crate) fn finish(self: &Arc<Self>) {
        let mut admitted = Admitted::new();
        {
            let mut state = self.lock();
            state.tracker.release();
            self.release(&mut state, Instant::now(), &mut admitted);
        }
        hand_out(admitted);
    }

    /// Called when a scheduled wake fires.
    fn wake(self: &Arc<Self>) {
        tracing::trace!("wake fired");
        let mut admitted = Admitted::new();
        {
            let mut state = self.lock();
            self.release(&mut state, Instant::now(), &mut admitted);
        }
        hand_out(admitted);
    }

    /// Admit queued submissions, oldest first, while capacity remains.
    ///
    /// If the queue is left non-empty in windowed mode, a wake is scheduled
    /// for the instant the oldest admission leaves the window. Once the queue
    /// is empty any outstanding wake is cancelled.
    fn release(self: &Arc<Self>, state: &mut State, now: Instant, admitted: &mut Admitted) {
        loop {
            if state.pending.is_empty() {
                state.wake.cancel();
                return;
            }

            state.tracker.prune(now);
            if !state.tracker.has_capacity() {
                if let Some(deadline) = state.tracker.next_free() {
                    let shared = Arc::downgrade(self);
                    state.wake.schedule_at(deadline, async move {
                        if let Some(shared) = shared.upgrade() {
                            shared.wake();
                        }
                    });
                }
                return;
            }

            match state.pending.dequeue_head() {
                Some(tx) => {
                    state.tracker.admit(now);
                    admitted.push((tx, Permit::new(self.clone())));
                    tracing::trace!(queued = state.pending.len(), "released queued submission");
                }
                None => {
                    state.wake.cancel();
                    return;
                }
            }
        }
    }
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("config", &self.config)
            .finish()
    }
}

/// Hand permits to admitted submissions. Must not be called with the lock
/// held: a permit refused by a departed caller is dropped here, which
/// re-enters the throttle.
fn hand_out(admitted: Admitted) {
    for (tx, permit) in admitted {
        if tx.send(Grant::Admitted(permit)).is_err() {
            tracing::trace!("submission cancelled before admission");
        }
    }
}
