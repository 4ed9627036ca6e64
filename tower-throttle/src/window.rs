use crate::config::{Config, Limit, Mode};
use std::{collections::VecDeque, time::Duration};
use tokio::time::Instant;

/// Tracks how much of the configured capacity is in use.
#[derive(Debug)]
pub(crate) enum Tracker {
    /// Executions currently in flight.
    Concurrent { limit: Limit, active: usize },
    /// Admission instants within the trailing window, oldest first.
    Window {
        limit: Limit,
        period: Duration,
        stamps: VecDeque<Instant>,
    },
}

impl Tracker {
    pub(crate) fn new(config: &Config) -> Self {
        let limit = config.get_limit();
        match config.get_mode() {
            Mode::Concurrent => Tracker::Concurrent { limit, active: 0 },
            Mode::Window(period) => Tracker::Window {
                limit,
                period,
                stamps: VecDeque::new(),
            },
        }
    }

    /// Forget admissions that fell out of the window.
    ///
    /// Stamps are appended in non-decreasing order, so expired ones are
    /// always at the front. A stamp whose expiry is past the end of time
    /// never expires.
    pub(crate) fn prune(&mut self, now: Instant) {
        if let Tracker::Window { period, stamps, .. } = self {
            while let Some(&oldest) = stamps.front() {
                match oldest.checked_add(*period) {
                    Some(expiry) if expiry <= now => {
                        stamps.pop_front();
                    }
                    _ => break,
                }
            }
        }
    }

    pub(crate) fn has_capacity(&self) -> bool {
        match self {
            Tracker::Concurrent { limit, active } => match limit {
                Limit::Bounded(max) => active < max,
                Limit::Unbounded => true,
            },
            Tracker::Window { limit, stamps, .. } => match limit {
                Limit::Bounded(max) => stamps.len() < *max,
                Limit::Unbounded => true,
            },
        }
    }

    /// Record one admission. Callers check `has_capacity` first.
    pub(crate) fn admit(&mut self, now: Instant) {
        match self {
            Tracker::Concurrent { active, .. } => *active += 1,
            // Nothing to expire when there's no limit to enforce.
            Tracker::Window {
                limit: Limit::Unbounded,
                ..
            } => {}
            Tracker::Window { stamps, .. } => stamps.push_back(now),
        }
    }

    /// Give back the slot of one finished execution.
    ///
    /// Window stamps stay in place until they expire.
    pub(crate) fn release(&mut self) {
        if let Tracker::Concurrent { active, .. } = self {
            debug_assert!(*active > 0, "released more slots than admitted");
            *active = active.saturating_sub(1);
        }
    }

    /// The instant the oldest admission leaves the window, if the window
    /// holds any admissions that will ever leave it.
    pub(crate) fn next_free(&self) -> Option<Instant> {
        match self {
            Tracker::Window { period, stamps, .. } => {
                stamps.front().and_then(|&t| t.checked_add(*period))
            }
            Tracker::Concurrent { .. } => None,
        }
    }
}
