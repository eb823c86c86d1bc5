//! The background task that keeps a [`Slot`] fresh.

// std
use std::panic::{AssertUnwindSafe, catch_unwind};

// crates.io
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};
// self
use crate::{
	CachedValue, _prelude::*,
	builder::RefresherConfig,
	controller::Lifecycle,
	retry::{RetryDecision, RetryDetails},
	slot::Slot,
};

/// Spawns a fresh refresh loop starting from `initial`, sharing `slot`/`config`/`lifecycle` with
/// whatever [`Controller`][crate::Controller] owns it.
pub(crate) fn spawn<A, E>(
	slot: Arc<Slot<A, E>>,
	config: Arc<RefresherConfig<A, E>>,
	lifecycle: Arc<parking_lot::Mutex<Lifecycle>>,
	initial: A,
) -> JoinHandle<()>
where
	A: Clone + Send + Sync + 'static,
	E: std::fmt::Debug + Send + Sync + 'static,
{
	tokio::spawn(run(slot, config, lifecycle, initial))
}

/// Runs a user callback, catching and logging a panic instead of letting it unwind into the
/// refresh loop and kill the task.
fn invoke_callback(name: &'static str, callback: impl FnOnce()) {
	if let Err(panic) = catch_unwind(AssertUnwindSafe(callback)) {
		let panic_message = panic
			.downcast_ref::<&str>()
			.copied()
			.or_else(|| panic.downcast_ref::<String>().map(String::as_str))
			.unwrap_or("<non-string panic payload>");

		error!(callback = name, panic_message, "user callback panicked, ignoring");
	}
}

#[instrument(level = "debug", skip_all)]
async fn run<A, E>(
	slot: Arc<Slot<A, E>>,
	config: Arc<RefresherConfig<A, E>>,
	lifecycle: Arc<parking_lot::Mutex<Lifecycle>>,
	initial: A,
) where
	A: Clone + Send + Sync + 'static,
	E: std::fmt::Debug + Send + Sync + 'static,
{
	let mut current = initial;
	// The very first entry into `Running` continues the builder's synchronous initial production,
	// not a refresh — `onNewValue` only fires starting from the first real refresh (refresh #1).
	let mut is_initial_tick = true;

	loop {
		let cadence = (config.cadence)(&current);

		if is_initial_tick {
			is_initial_tick = false;
		} else {
			let value = &current;
			invoke_callback("on_new_value", || (config.on_new_value)(value, cadence));
		}
		tokio::time::sleep(cadence).await;

		let started_at = Instant::now();
		let mut attempt: u32 = 0;

		current = loop {
			match (config.producer)().await {
				Ok(produced) => {
					let published = match &config.combine {
						Some(combine) => {
							let previous = slot.read();

							combine(&previous, &CachedValue::Success(produced))
						},
						None => produced,
					};

					slot.write(CachedValue::success(published.clone()));

					break published;
				},
				Err(cause) => {
					let elapsed = started_at.elapsed();

					match config.retry_policy.decide(attempt, elapsed) {
						RetryDecision::Delay(delay) => {
							let details = RetryDetails { attempt, elapsed };

							invoke_callback("on_refresh_failure", || {
								(config.on_refresh_failure)(&cause, &details)
							});
							debug!(attempt, delay = ?delay, "refresh attempt failed, retrying");
							attempt += 1;
							tokio::time::sleep(delay).await;
						},
						RetryDecision::GiveUp => {
							let mut guard = lifecycle.lock();

							// `Starting` counts as live here: a `Controller` (and with it, the only
							// way to call `cancel`) does not exist until acquisition finishes
							// installing `Active`, so nothing could have raced us to `Cancelled`.
							if !matches!(&*guard, Lifecycle::Cancelled | Lifecycle::Exhausted) {
								let cause = Arc::new(cause);

								slot.write(CachedValue::error(current.clone(), cause.clone()));
								*guard = Lifecycle::Exhausted;
								drop(guard);

								warn!(attempt, "retry policy exhausted, refresher stopping");
								invoke_callback("on_exhausted_retries", || {
									(config.on_exhausted_retries)(&cause)
								});
							}

							return;
						},
					}
				},
			}
		};
	}
}
