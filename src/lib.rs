//! A size-one, self-refreshing async cache.
//!
//! [`RefresherBuilder`] wires up a caller-supplied async producer, runs it once synchronously to
//! populate the cache, then hands back a [`Controller`] backed by a background task that keeps
//! re-running the producer on a per-value cadence. Readers always get a usable value back —
//! [`CachedValue`] tags it as fresh, stale-with-a-known-cause, or cancelled — so a slow or failing
//! refresh degrades to stale data instead of unavailability.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

mod builder;
mod cached_value;
mod controller;
mod error;
mod refresher;
mod retry;
mod slot;

mod _prelude {
	pub use std::{sync::Arc, time::Duration};

	pub use tokio::time::Instant;

	pub use crate::{Error, Result};
}

pub use crate::{
	builder::RefresherBuilder,
	cached_value::CachedValue,
	controller::Controller,
	error::{Error, Result},
	retry::{ConstantDelayPolicy, NeverRetry, RetryDecision, RetryDetails, RetryPolicy},
	slot::{Lagged, UpdatesStream},
};

#[cfg(test)]
mod _test {
	use tracing_subscriber as _;
}
