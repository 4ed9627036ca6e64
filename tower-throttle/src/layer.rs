use crate::{config::Config, service::ThrottleService, throttle::Throttle};
use tower_layer::Layer;

/// Passes the requests of every service it wraps through one shared
/// [`Throttle`].
#[derive(Debug, Clone)]
pub struct ThrottleLayer {
    throttle: Throttle,
}

impl ThrottleLayer {
    /// Create a layer backed by a new throttle.
    pub fn new(config: Config) -> Self {
        ThrottleLayer::with_throttle(Throttle::new(config))
    }

    /// Create a layer backed by an existing throttle, so that the wrapped
    /// services share its limit with its other users.
    pub fn with_throttle(throttle: Throttle) -> Self {
        ThrottleLayer { throttle }
    }
}

impl<S> Layer<S> for ThrottleLayer {
    type Service = ThrottleService<S>;

    fn layer(&self, service: S) -> Self::Service {
        ThrottleService::new(service, self.throttle.clone())
    }
}
