//! End-to-end coverage of the updates stream and the `combine` hook.

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
	time::Duration,
};
// crates.io
use refresh_cache::{CachedValue, RefresherBuilder};
use tokio_stream::StreamExt;

#[derive(Debug)]
struct Boom;

#[tokio::test]
async fn updates_stream_replays_every_published_value() {
	let _ = tracing_subscriber::fmt::try_init();

	let calls = Arc::new(AtomicU64::new(0));
	let producer_calls = calls.clone();
	let controller = RefresherBuilder::new(
		move || {
			let calls = producer_calls.clone();

			async move { Ok::<_, Boom>(calls.fetch_add(1, Ordering::SeqCst)) }
		},
		|_| Duration::from_millis(5),
	)
	.acquire()
	.await
	.expect("initial call succeeds");

	let seen: Vec<_> = controller
		.updates()
		.take(5)
		.map(|update| update.expect("no subscriber should lag in this test").into_value())
		.collect()
		.await;

	assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn combine_folds_previous_value_into_the_newly_produced_one() {
	let _ = tracing_subscriber::fmt::try_init();

	let controller = RefresherBuilder::new(
		|| async { Ok::<_, Boom>(1_u64) },
		|_| Duration::from_secs(2),
	)
	.combine(|old, new| old.value() + new.value())
	.acquire()
	.await
	.expect("initial call succeeds");

	assert_eq!(controller.value(), 1);

	tokio::time::advance(Duration::from_secs(3)).await;

	assert!(matches!(controller.get(), CachedValue::Success(2)));
}
