//! End-to-end coverage of the background refresh loop: retries, recovery, and exhaustion.

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
	time::Duration,
};
// crates.io
use refresh_cache::{CachedValue, ConstantDelayPolicy, RefresherBuilder};

#[derive(Debug, PartialEq, Eq)]
struct Boom;

#[tokio::test(start_paused = true)]
async fn retries_once_then_recovers() {
	let _ = tracing_subscriber::fmt::try_init();

	let calls = Arc::new(AtomicU64::new(0));
	let producer_calls = calls.clone();
	let controller = RefresherBuilder::new(
		move || {
			let calls = producer_calls.clone();

			async move {
				let call_index = calls.fetch_add(1, Ordering::SeqCst);

				if call_index == 1 { Err(Boom) } else { Ok(call_index) }
			}
		},
		|_| Duration::from_secs(2),
	)
	.retry_policy(ConstantDelayPolicy::new(Duration::from_millis(100), 1))
	.acquire()
	.await
	.expect("initial call succeeds");

	assert!(matches!(controller.get(), CachedValue::Success(0)));

	tokio::time::advance(Duration::from_secs(3)).await;

	assert!(matches!(controller.get(), CachedValue::Success(2)));
}

#[tokio::test(start_paused = true)]
async fn exhausts_without_a_retry_policy_and_keeps_last_known_good() {
	let _ = tracing_subscriber::fmt::try_init();

	let calls = Arc::new(AtomicU64::new(0));
	let producer_calls = calls.clone();
	let controller = RefresherBuilder::new(
		move || {
			let calls = producer_calls.clone();

			async move {
				let call_index = calls.fetch_add(1, Ordering::SeqCst);

				if call_index == 0 { Ok(0_u64) } else { Err(Boom) }
			}
		},
		|_| Duration::from_secs(1),
	)
	.acquire()
	.await
	.expect("initial call succeeds");

	tokio::time::advance(Duration::from_secs(5)).await;

	match controller.get() {
		CachedValue::Error(value, cause) => {
			assert_eq!(value, 0);
			assert_eq!(*cause, Boom);
		},
		other => panic!("expected Error(0, Boom), got {other:?}"),
	}
}
