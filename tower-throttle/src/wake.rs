use std::future::Future;
use tokio::{runtime::Handle, task::JoinHandle, time::Instant};

/// Owns the single outstanding re-evaluation timer of a windowed throttle.
#[derive(Debug, Default)]
pub(crate) struct Rescheduler {
    wake: Option<Scheduled>,
}

#[derive(Debug)]
struct Scheduled {
    at: Instant,
    task: JoinHandle<()>,
}

impl Rescheduler {
    pub(crate) fn new() -> Self {
        Rescheduler::default()
    }

    /// Run `on_wake` once `deadline` is reached, replacing any earlier wake.
    ///
    /// A deadline in the past fires on the next turn of the runtime. Outside
    /// of a Tokio runtime nothing is scheduled.
    pub(crate) fn schedule_at<F>(&mut self, deadline: Instant, on_wake: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(ref scheduled) = self.wake {
            if scheduled.at == deadline && !scheduled.task.is_finished() {
                return;
            }
        }
        self.cancel();

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::debug!("no runtime available; wake not scheduled");
                return;
            }
        };

        tracing::trace!(
            delay = ?deadline.saturating_duration_since(Instant::now()),
            "scheduling wake"
        );
        let task = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            on_wake.await;
        });
        self.wake = Some(Scheduled { at: deadline, task });
    }

    /// Cancel the outstanding wake, if any.
    pub(crate) fn cancel(&mut self) {
        if let Some(scheduled) = self.wake.take() {
            scheduled.task.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_scheduled(&self) -> bool {
        self.wake
            .as_ref()
            .map_or(false, |scheduled| !scheduled.task.is_finished())
    }
}

impl Drop for Rescheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
