use crate::permit::Permit;
use std::collections::VecDeque;
use tokio::sync::oneshot;

/// How a queued submission leaves the queue.
#[derive(Debug)]
pub(crate) enum Grant {
    /// Capacity was reserved; run the work while holding the permit.
    Admitted(Permit),
    /// Settled by a flush; the work never runs.
    Flushed,
}

/// Settles one queued submission.
pub(crate) type Tx = oneshot::Sender<Grant>;

/// Awaits the settlement of one queued submission.
pub(crate) type Rx = oneshot::Receiver<Grant>;

/// Submissions waiting for capacity, in submission order.
#[derive(Debug, Default)]
pub(crate) struct Pending {
    waiters: VecDeque<Tx>,
}

impl Pending {
    pub(crate) fn new() -> Self {
        Pending::default()
    }

    pub(crate) fn enqueue(&mut self) -> Rx {
        let (tx, rx) = oneshot::channel();
        self.waiters.push_back(tx);
        rx
    }

    /// Return the oldest waiter whose caller is still listening.
    ///
    /// Waiters whose future was dropped are discarded on the way.
    pub(crate) fn dequeue_head(&mut self) -> Option<Tx> {
        while let Some(tx) = self.waiters.pop_front() {
            if !tx.is_closed() {
                return Some(tx);
            }
            tracing::trace!("dropping cancelled submission");
        }
        None
    }

    /// Take every waiter, oldest first.
    pub(crate) fn drain_all(&mut self) -> Vec<Tx> {
        self.waiters.drain(..).collect()
    }

    /// Discard every waiter, returning how many were removed.
    ///
    /// Dropping a sender settles its receiver with an error, so cleared
    /// callers observe [`Cleared`](crate::error::Cleared) rather than
    /// waiting forever.
    pub(crate) fn clear(&mut self) -> usize {
        let count = self.waiters.len();
        self.waiters.clear();
        count
    }

    pub(crate) fn len(&self) -> usize {
        self.waiters.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }
}
