//! A [`Service`] whose requests pass through a [`Throttle`].

use crate::{
    error::BoxError,
    future::{ResponseFuture, ServiceFuture},
    throttle::Throttle,
    work::Work,
};
use std::{
    fmt, mem,
    task::{Context, Poll},
};
use tower::util::{Oneshot, ServiceExt};
use tower_service::Service;

/// Submits every request to a [`Throttle`] before calling the inner service.
///
/// The service is always ready: requests that do not fit are queued or
/// rejected by the throttle, as it is configured. Each request is handled by
/// its own clone of the inner service.
#[derive(Debug, Clone)]
pub struct ThrottleService<S> {
    inner: S,
    throttle: Throttle,
}

impl<S> ThrottleService<S> {
    /// Wrap `inner` so its requests pass through `throttle`.
    pub fn new(inner: S, throttle: Throttle) -> Self {
        ThrottleService { inner, throttle }
    }

    /// The throttle requests pass through.
    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Get a reference to the inner service
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Get a mutable reference to the inner service
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consume `self`, returning the inner service
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, Request> Service<Request> for ThrottleService<S>
where
    S: Service<Request> + Clone,
    S::Error: Into<BoxError>,
{
    type Response = S::Response;
    type Error = BoxError;
    type Future = ServiceFuture<ResponseFuture<Call<S, Request>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        // The clone may not be ready; take the service that was and leave the
        // clone in its place.
        let clone = self.inner.clone();
        let inner = mem::replace(&mut self.inner, clone);
        ServiceFuture::new(self.throttle.acquire(Call::new(inner, request)))
    }
}

/// A request bound to the service that will handle it, as [`Work`].
pub struct Call<S, Request> {
    svc: S,
    request: Request,
}

impl<S, Request> Call<S, Request> {
    /// Bind `request` to `svc`.
    pub fn new(svc: S, request: Request) -> Self {
        Call { svc, request }
    }
}

impl<S, Request> Work for Call<S, Request>
where
    S: Service<Request>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Oneshot<S, Request>;

    fn start(self) -> Self::Future {
        self.svc.oneshot(self.request)
    }
}

impl<S, Request> fmt::Debug for Call<S, Request>
where
    S: fmt::Debug,
    Request: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("svc", &self.svc)
            .field("request", &self.request)
            .finish()
    }
}
