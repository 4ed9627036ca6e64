//! The unit of work a [`Throttle`] gates.
//!
//! [`Throttle`]: crate::Throttle

use std::future::Future;

/// A one-shot producer of asynchronous work.
///
/// Nothing runs until the throttle admits the work and calls [`Work::start`].
/// Any `FnOnce() -> impl Future<Output = Result<T, E>>` is `Work`.
pub trait Work {
    /// The value produced when the work succeeds.
    type Response;

    /// The error produced when the work fails.
    type Error;

    /// The future driving the work to completion.
    type Future: Future<Output = Result<Self::Response, Self::Error>>;

    /// Begin the work.
    fn start(self) -> Self::Future;
}

impl<F, Fut, T, E> Work for F
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    type Response = T;
    type Error = E;
    type Future = Fut;

    fn start(self) -> Fut {
        self()
    }
}
