use crate::throttle::Shared;
use std::{fmt, sync::Arc};

/// A slot of capacity held by one admitted execution.
///
/// Dropping the permit gives the slot back and lets the next queued
/// submission in, however the execution ended.
pub(crate) struct Permit {
    shared: Arc<Shared>,
}

impl Permit {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Permit { shared }
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.shared.finish();
    }
}

impl fmt::Debug for Permit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Permit").finish()
    }
}
