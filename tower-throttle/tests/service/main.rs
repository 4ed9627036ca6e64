#[path = "../support.rs"]
mod support;

use tokio_test::{assert_pending, assert_ready_err, assert_ready_ok, task};
use tower_test::{assert_request_eq, mock};
use tower_throttle::{
    error::{CapacityExceeded, Flushed},
    Config, Throttle, ThrottleLayer,
};

#[tokio::test(flavor = "current_thread")]
async fn requests_wait_for_capacity() {
    let _t = support::trace_init();

    let layer = ThrottleLayer::new(Config::new().limit(1));
    let (mut service, mut handle) = mock::spawn_layer::<&'static str, &'static str, _>(layer);

    assert_ready_ok!(service.poll_ready());
    let mut r1 = task::spawn(service.call("hello 1"));
    assert_ready_ok!(service.poll_ready());
    let mut r2 = task::spawn(service.call("hello 2"));

    assert_pending!(r1.poll());
    assert_pending!(r2.poll());

    assert_request_eq!(handle, "hello 1").send_response("world 1");
    assert_pending!(handle.poll_request());

    assert_eq!(assert_ready_ok!(r1.poll()), "world 1");

    assert!(r2.is_woken());
    assert_pending!(r2.poll());
    assert_request_eq!(handle, "hello 2").send_response("world 2");
    assert_eq!(assert_ready_ok!(r2.poll()), "world 2");
}

#[tokio::test(flavor = "current_thread")]
async fn inner_error_releases_capacity() {
    let _t = support::trace_init();

    let layer = ThrottleLayer::new(Config::new().limit(1));
    let (mut service, mut handle) = mock::spawn_layer::<&'static str, &'static str, _>(layer);

    let mut r1 = task::spawn(service.call("hello 1"));
    let mut r2 = task::spawn(service.call("hello 2"));
    assert_pending!(r1.poll());
    assert_pending!(r2.poll());

    assert_request_eq!(handle, "hello 1").send_error("boom");
    assert_eq!(assert_ready_err!(r1.poll()).to_string(), "boom");

    assert_pending!(r2.poll());
    assert_request_eq!(handle, "hello 2").send_response("world 2");
    assert_eq!(assert_ready_ok!(r2.poll()), "world 2");
}

#[tokio::test(flavor = "current_thread")]
async fn overflow_is_rejected() {
    let layer = ThrottleLayer::new(Config::new().limit(1).reject_on_limit(true));
    let (mut service, mut handle) = mock::spawn_layer::<&'static str, &'static str, _>(layer);

    let mut r1 = task::spawn(service.call("hello 1"));
    let mut r2 = task::spawn(service.call("hello 2"));

    let err = assert_ready_err!(r2.poll());
    assert!(err.is::<CapacityExceeded>(), "should be CapacityExceeded: {:?}", err);

    assert_pending!(r1.poll());
    assert_request_eq!(handle, "hello 1").send_response("world 1");
    assert_eq!(assert_ready_ok!(r1.poll()), "world 1");
}

#[tokio::test(flavor = "current_thread")]
async fn flushed_requests_never_reach_the_service() {
    let throttle = Throttle::new(Config::new().limit(1));
    let layer = ThrottleLayer::with_throttle(throttle.clone());
    let (mut service, mut handle) = mock::spawn_layer::<&'static str, &'static str, _>(layer);

    let mut r1 = task::spawn(service.call("hello 1"));
    let mut r2 = task::spawn(service.call("hello 2"));
    assert_pending!(r1.poll());
    assert_pending!(r2.poll());
    assert_eq!(throttle.queued(), 1);

    throttle.flush().await;

    let err = assert_ready_err!(r2.poll());
    assert!(err.is::<Flushed>(), "should be Flushed: {:?}", err);

    assert_request_eq!(handle, "hello 1").send_response("world 1");
    assert_eq!(assert_ready_ok!(r1.poll()), "world 1");
    assert_pending!(handle.poll_request());
}
