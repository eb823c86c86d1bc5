//! End-to-end coverage of cancel/restart lifecycle control.

// std
use std::time::Duration;
// crates.io
use refresh_cache::{CachedValue, RefresherBuilder};

#[derive(Debug)]
struct Boom;

#[tokio::test(start_paused = true)]
async fn cancel_then_restart_resumes_refreshing() {
	let _ = tracing_subscriber::fmt::try_init();

	let controller =
		RefresherBuilder::new(|| async { Ok::<_, Boom>(0) }, |_| Duration::from_secs(1))
			.acquire()
			.await
			.expect("initial call succeeds");

	assert!(controller.cancel());
	assert!(matches!(controller.get(), CachedValue::Cancelled(0)));
	// A second cancel is a no-op: exactly one caller ever wins.
	assert!(!controller.cancel());

	assert!(controller.restart());

	tokio::time::advance(Duration::from_secs(2)).await;

	assert!(matches!(controller.get(), CachedValue::Success(0)));
}
