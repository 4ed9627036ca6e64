#![doc(html_root_url = "https://docs.rs/tower-throttle/0.1.0")]
#![warn(
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    unreachable_pub
)]
#![forbid(unsafe_code)]
#![allow(elided_lifetimes_in_paths)]

//! Admission control for asynchronous work.
//!
//! A [`Throttle`] bounds either the number of executions in flight or the
//! number of executions started within a trailing time window. Work that does
//! not fit is queued and admitted in submission order once capacity frees, or
//! rejected outright with [`CapacityExceeded`].
//!
//! ```
//! use tower_throttle::{Config, Throttle};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), tower_throttle::BoxError> {
//! let throttle = Throttle::new(Config::new().limit(5));
//!
//! let answer = throttle
//!     .acquire(|| async { Ok::<_, std::io::Error>(42) })
//!     .await?;
//! assert_eq!(answer, Some(42));
//! # Ok(())
//! # }
//! ```
//!
//! [`ThrottleLayer`] applies a throttle to a [`Service`].
//!
//! [`CapacityExceeded`]: crate::error::CapacityExceeded
//! [`Service`]: tower_service::Service

pub mod config;
pub mod error;
pub mod future;
mod layer;
mod permit;
mod queue;
pub mod service;
mod throttle;
mod wake;
mod window;
pub mod work;

pub use crate::{
    config::{Config, Limit, Mode},
    error::BoxError,
    layer::ThrottleLayer,
    service::ThrottleService,
    throttle::Throttle,
    work::Work,
};
