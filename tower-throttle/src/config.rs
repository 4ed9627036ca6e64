//! Configuration for a [`Throttle`].
//!
//! [`Throttle`]: crate::Throttle

use std::time::Duration;

/// The number of admissions a [`Throttle`] allows.
///
/// [`Throttle`]: crate::Throttle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// At most this many admissions, concurrently or per window.
    Bounded(usize),
    /// No limit at all; every submission is admitted immediately.
    Unbounded,
}

/// What a [`Limit`] is counted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Count executions currently in flight.
    Concurrent,
    /// Count admissions within a trailing window of the given length.
    Window(Duration),
}

/// Immutable settings of one [`Throttle`].
///
/// Defaults to a concurrency limit of 10 that queues overflow:
///
/// ```
/// use std::time::Duration;
/// use tower_throttle::Config;
///
/// // 10 executions per 30 seconds, failing fast once exhausted.
/// let config = Config::new()
///     .limit(10)
///     .per(Duration::from_secs(30))
///     .reject_on_limit(true);
/// # let _ = config;
/// ```
///
/// [`Throttle`]: crate::Throttle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    limit: Limit,
    mode: Mode,
    reject_on_limit: bool,
}

const DEFAULT_LIMIT: usize = 10;

// ===== impl Config =====

impl Config {
    /// Create the default configuration.
    pub fn new() -> Self {
        Config {
            limit: Limit::Bounded(DEFAULT_LIMIT),
            mode: Mode::Concurrent,
            reject_on_limit: false,
        }
    }

    /// Allow at most `max` admissions.
    pub fn limit(mut self, max: usize) -> Self {
        self.limit = Limit::Bounded(max);
        self
    }

    /// Remove the limit.
    pub fn unbounded(mut self) -> Self {
        self.limit = Limit::Unbounded;
        self
    }

    /// Count admissions per trailing window of length `window` instead of
    /// executions in flight.
    pub fn per(mut self, window: Duration) -> Self {
        self.mode = Mode::Window(window);
        self
    }

    /// Count executions in flight. This is the default.
    pub fn concurrent(mut self) -> Self {
        self.mode = Mode::Concurrent;
        self
    }

    /// Fail submissions with [`CapacityExceeded`] instead of queueing them
    /// when no capacity is left.
    ///
    /// [`CapacityExceeded`]: crate::error::CapacityExceeded
    pub fn reject_on_limit(mut self, reject: bool) -> Self {
        self.reject_on_limit = reject;
        self
    }

    /// The configured limit.
    pub fn get_limit(&self) -> Limit {
        self.limit
    }

    /// The configured mode.
    pub fn get_mode(&self) -> Mode {
        self.mode
    }

    /// Whether overflow is rejected rather than queued.
    pub fn rejects_on_limit(&self) -> bool {
        self.reject_on_limit
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
