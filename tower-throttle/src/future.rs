//! Future types

use crate::{
    error::{BoxError, CapacityExceeded, Cleared, Flushed},
    permit::Permit,
    queue::{Grant, Rx},
    work::Work,
};
use futures_core::ready;
use pin_project_lite::pin_project;
use std::{
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

pin_project! {
    /// Future for [`Throttle::acquire`].
    ///
    /// [`Throttle::acquire`]: crate::Throttle::acquire
    pub struct ResponseFuture<W: Work> {
        #[pin]
        state: State<W, W::Future>,
    }
}

pin_project! {
    #[project = StateProj]
    enum State<W, F> {
        Rejected,
        Queued {
            rx: Rx,
            work: Option<W>,
        },
        Running {
            #[pin]
            fut: F,
            permit: Option<Permit>,
        },
        Done,
    }
}

impl<W: Work> ResponseFuture<W> {
    pub(crate) fn rejected() -> Self {
        ResponseFuture {
            state: State::Rejected,
        }
    }

    pub(crate) fn queued(rx: Rx, work: W) -> Self {
        ResponseFuture {
            state: State::Queued {
                rx,
                work: Some(work),
            },
        }
    }

    pub(crate) fn running(fut: W::Future, permit: Permit) -> Self {
        ResponseFuture {
            state: State::Running {
                fut,
                permit: Some(permit),
            },
        }
    }
}

impl<W, T, E> Future for ResponseFuture<W>
where
    W: Work<Response = T, Error = E>,
    E: Into<BoxError>,
{
    type Output = Result<Option<T>, BoxError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();
        loop {
            match this.state.as_mut().project() {
                StateProj::Rejected => {
                    this.state.set(State::Done);
                    return Poll::Ready(Err(CapacityExceeded::new().into()));
                }
                StateProj::Queued { rx, work } => match ready!(Pin::new(rx).poll(cx)) {
                    Ok(Grant::Admitted(permit)) => {
                        let work = work.take().expect("admitted twice");
                        tracing::trace!("starting queued work");
                        this.state.set(State::Running {
                            fut: work.start(),
                            permit: Some(permit),
                        });
                    }
                    Ok(Grant::Flushed) => {
                        this.state.set(State::Done);
                        return Poll::Ready(Ok(None));
                    }
                    Err(_) => {
                        this.state.set(State::Done);
                        return Poll::Ready(Err(Cleared::new().into()));
                    }
                },
                StateProj::Running { fut, permit } => {
                    let result = ready!(fut.poll(cx));
                    // The outcome is captured; give the slot back.
                    drop(permit.take());
                    this.state.set(State::Done);
                    return Poll::Ready(result.map(Some).map_err(Into::into));
                }
                StateProj::Done => panic!("polled after complete"),
            }
        }
    }
}

impl<W: Work> fmt::Debug for ResponseFuture<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::Rejected => "Rejected",
            State::Queued { .. } => "Queued",
            State::Running { .. } => "Running",
            State::Done => "Done",
        };
        f.debug_tuple("ResponseFuture").field(&state).finish()
    }
}

pin_project! {
    /// Future for [`ThrottleService`].
    ///
    /// A request flushed from the queue resolves to [`Flushed`].
    ///
    /// [`ThrottleService`]: crate::ThrottleService
    #[derive(Debug)]
    pub struct ServiceFuture<F> {
        #[pin]
        inner: F,
    }
}

impl<F> ServiceFuture<F> {
    pub(crate) fn new(inner: F) -> Self {
        ServiceFuture { inner }
    }
}

impl<F, T> Future for ServiceFuture<F>
where
    F: Future<Output = Result<Option<T>, BoxError>>,
{
    type Output = Result<T, BoxError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match ready!(self.project().inner.poll(cx)) {
            Ok(Some(response)) => Poll::Ready(Ok(response)),
            Ok(None) => Poll::Ready(Err(Flushed::new().into())),
            Err(e) => Poll::Ready(Err(e)),
        }
    }
}
