//! Error types

use std::fmt;

/// Alias for a type-erased error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error returned when a submission finds no capacity left and the
/// throttle is configured to reject rather than queue.
pub struct CapacityExceeded {
    _p: (),
}

/// An error returned to a queued submission that was discarded by
/// [`Throttle::clear`] before it was admitted.
///
/// [`Throttle::clear`]: crate::Throttle::clear
pub struct Cleared {
    _p: (),
}

/// An error returned by [`ThrottleService`] for a request that was flushed
/// from the queue, and therefore never reached the inner service.
///
/// [`ThrottleService`]: crate::ThrottleService
pub struct Flushed {
    _p: (),
}

// ===== impl CapacityExceeded =====

impl CapacityExceeded {
    pub(crate) fn new() -> Self {
        CapacityExceeded { _p: () }
    }
}

impl fmt::Debug for CapacityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CapacityExceeded")
    }
}

impl fmt::Display for CapacityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("throttle capacity exceeded")
    }
}

impl std::error::Error for CapacityExceeded {}

// ===== impl Cleared =====

impl Cleared {
    pub(crate) fn new() -> Self {
        Cleared { _p: () }
    }
}

impl fmt::Debug for Cleared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cleared")
    }
}

impl fmt::Display for Cleared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("queued work was cleared before admission")
    }
}

impl std::error::Error for Cleared {}

// ===== impl Flushed =====

impl Flushed {
    pub(crate) fn new() -> Self {
        Flushed { _p: () }
    }
}

impl fmt::Debug for Flushed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Flushed")
    }
}

impl fmt::Display for Flushed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("request was flushed without being called")
    }
}

impl std::error::Error for Flushed {}
