//! The tagged value/status container handed back to every reader.

// self
use crate::_prelude::*;

/// The current value of a [`Controller`][crate::Controller], tagged with its refresh status.
///
/// Every variant carries a usable `value`; callers never observe "no value" — only whether the
/// value is fresh, stale-with-a-known-cause, or the background refresh has stopped entirely.
#[derive(Debug)]
pub enum CachedValue<A, E> {
	/// The most recent refresh produced `value` successfully.
	Success(A),
	/// The most recent refresh attempt(s) exhausted the retry policy; `value` is the last
	/// successful value and `cause` identifies why refreshing stopped producing new data.
	Error(A, Arc<E>),
	/// Background refreshing has been stopped (via [`Controller::cancel`][crate::Controller::cancel]);
	/// `value` is whatever was last held.
	Cancelled(A),
}

// Hand-written: `derive(Clone)` would bound `E: Clone`, but `cause` only ever moves behind an
// `Arc`, which clones regardless of `E`.
impl<A: Clone, E> Clone for CachedValue<A, E> {
	fn clone(&self) -> Self {
		match self {
			Self::Success(value) => Self::Success(value.clone()),
			Self::Error(value, cause) => Self::Error(value.clone(), Arc::clone(cause)),
			Self::Cancelled(value) => Self::Cancelled(value.clone()),
		}
	}
}

impl<A, E> CachedValue<A, E> {
	pub(crate) fn success(value: A) -> Self {
		Self::Success(value)
	}

	pub(crate) fn error(value: A, cause: Arc<E>) -> Self {
		Self::Error(value, cause)
	}

	pub(crate) fn cancelled(value: A) -> Self {
		Self::Cancelled(value)
	}

	/// Returns a reference to the carried value, regardless of status.
	pub fn value(&self) -> &A {
		match self {
			Self::Success(value) | Self::Error(value, _) | Self::Cancelled(value) => value,
		}
	}

	/// Consumes this [`CachedValue`], returning the carried value regardless of status.
	pub fn into_value(self) -> A {
		match self {
			Self::Success(value) | Self::Error(value, _) | Self::Cancelled(value) => value,
		}
	}

	/// Returns the failure cause, if this value is [`CachedValue::Error`].
	pub fn cause(&self) -> Option<&E> {
		match self {
			Self::Error(_, cause) => Some(cause),
			_ => None,
		}
	}

	/// Whether the most recent refresh succeeded.
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}

	/// Whether refreshing has exhausted its retry policy and stopped.
	pub fn is_error(&self) -> bool {
		matches!(self, Self::Error(..))
	}

	/// Whether background refreshing was explicitly cancelled.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled(_))
	}

	/// Maps the carried value, preserving the status tag (and, for `Error`, the cause).
	pub fn map<B>(self, f: impl FnOnce(A) -> B) -> CachedValue<B, E> {
		match self {
			Self::Success(value) => CachedValue::Success(f(value)),
			Self::Error(value, cause) => CachedValue::Error(f(value), cause),
			Self::Cancelled(value) => CachedValue::Cancelled(f(value)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn value_is_always_reachable() {
		let success = CachedValue::<_, String>::success(1);
		let error = CachedValue::error(2, Arc::new("boom".to_string()));
		let cancelled = CachedValue::<_, String>::cancelled(3);

		assert_eq!(*success.value(), 1);
		assert_eq!(*error.value(), 2);
		assert_eq!(*cancelled.value(), 3);
	}

	#[test]
	fn map_preserves_tag_and_cause() {
		let error = CachedValue::error(2, Arc::new("boom".to_string()));

		let mapped = error.map(|v| v * 10);

		assert!(mapped.is_error());
		assert_eq!(*mapped.value(), 20);
		assert_eq!(mapped.cause().map(String::as_str), Some("boom"));
	}

	#[test]
	fn status_predicates() {
		assert!(CachedValue::<_, ()>::success(1).is_success());
		assert!(CachedValue::<_, &str>::error(1, Arc::new("x")).is_error());
		assert!(CachedValue::<_, ()>::cancelled(1).is_cancelled());
	}
}
