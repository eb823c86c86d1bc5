//! Pluggable retry policies governing what happens after a refresh attempt fails.

// self
use crate::_prelude::*;

/// What a [`RetryPolicy`] decided after a failed refresh attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
	/// Wait `Duration`, then attempt production again.
	Delay(Duration),
	/// Stop retrying; the refresher publishes the failure and becomes `Exhausted`.
	GiveUp,
}

/// Context handed to the `on_refresh_failure` callback alongside the failure's cause.
#[derive(Clone, Copy, Debug)]
pub struct RetryDetails {
	/// How many attempts have already failed in this refresh cycle, counting from zero.
	pub attempt: u32,
	/// Wall-clock time elapsed since the first attempt of this refresh cycle began.
	pub elapsed: Duration,
}

/// A policy governing how the background refresh task responds to a failed refresh attempt.
///
/// Implementations must be cheap and non-blocking — `decide` runs inline in the refresh loop, never
/// behind an `.await`.
pub trait RetryPolicy: Send + Sync + 'static {
	/// Decides whether to retry after a failed attempt, and if so, after how long.
	///
	/// `attempt` counts failures already seen in this refresh cycle, starting from zero; `elapsed`
	/// is the wall-clock time since the cycle's first attempt.
	fn decide(&self, attempt: u32, elapsed: Duration) -> RetryDecision;

	/// The default policy: gives up immediately, never retrying.
	fn never() -> NeverRetry
	where
		Self: Sized,
	{
		NeverRetry
	}
}

/// A policy that never retries: the first failure exhausts the refresher immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverRetry;
impl RetryPolicy for NeverRetry {
	fn decide(&self, _attempt: u32, _elapsed: Duration) -> RetryDecision {
		RetryDecision::GiveUp
	}
}

/// A policy that retries a fixed number of times with a constant delay between attempts.
#[derive(Clone, Copy, Debug)]
pub struct ConstantDelayPolicy {
	delay: Duration,
	max_attempts: u32,
}
impl ConstantDelayPolicy {
	/// Retries up to `max_attempts` times, waiting `delay` between each.
	pub fn new(delay: Duration, max_attempts: u32) -> Self {
		Self { delay, max_attempts }
	}
}
impl RetryPolicy for ConstantDelayPolicy {
	fn decide(&self, attempt: u32, _elapsed: Duration) -> RetryDecision {
		if attempt < self.max_attempts {
			RetryDecision::Delay(self.delay)
		} else {
			RetryDecision::GiveUp
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn never_retry_always_gives_up() {
		assert_eq!(NeverRetry.decide(0, Duration::ZERO), RetryDecision::GiveUp);
	}

	#[test]
	fn constant_delay_retries_then_gives_up() {
		let policy = ConstantDelayPolicy::new(Duration::from_millis(10), 2);

		assert_eq!(policy.decide(0, Duration::ZERO), RetryDecision::Delay(Duration::from_millis(10)));
		assert_eq!(policy.decide(1, Duration::ZERO), RetryDecision::Delay(Duration::from_millis(10)));
		assert_eq!(policy.decide(2, Duration::ZERO), RetryDecision::GiveUp);
	}
}
