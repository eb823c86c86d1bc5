//! The runtime handle returned by [`RefresherBuilder::acquire`][crate::RefresherBuilder::acquire].

// crates.io
use parking_lot::Mutex;
use tokio::task::JoinHandle;
// self
use crate::{
	CachedValue, _prelude::*,
	builder::RefresherConfig,
	refresher,
	slot::{Slot, UpdatesStream},
};

/// The single-winner lifecycle cell shared between a [`Controller`] and its background task.
///
/// `Starting` exists only for the brief window between spawning the task and the builder
/// installing `Active`; no `Controller` exists yet during that window, so nothing can observe or
/// race against it.
pub(crate) enum Lifecycle {
	Starting,
	Active(JoinHandle<()>),
	Cancelled,
	Exhausted,
}

/// A handle to a running self-refreshing value, bound to the scope in which it was acquired.
///
/// Dropping the `Controller` requests termination of the background refresher; see the
/// [`Drop`] impl for why that request is best-effort rather than a synchronous wait.
pub struct Controller<A, E> {
	slot: Arc<Slot<A, E>>,
	config: Arc<RefresherConfig<A, E>>,
	lifecycle: Arc<Mutex<Lifecycle>>,
}
impl<A, E> std::fmt::Debug for Controller<A, E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Controller").finish_non_exhaustive()
	}
}
impl<A, E> Controller<A, E>
where
	A: Clone + Send + Sync + 'static,
	E: std::fmt::Debug + Send + Sync + 'static,
{
	pub(crate) fn new(
		slot: Arc<Slot<A, E>>,
		config: Arc<RefresherConfig<A, E>>,
		lifecycle: Arc<Mutex<Lifecycle>>,
	) -> Self {
		Self { slot, config, lifecycle }
	}

	/// Returns the current value along with its refresh status.
	pub fn get(&self) -> CachedValue<A, E> {
		self.slot.read()
	}

	/// Returns the current value, discarding its refresh status.
	pub fn value(&self) -> A {
		self.slot.read().into_value()
	}

	/// A stream of every value this cache has held, starting from whatever is current now.
	pub fn updates(&self) -> UpdatesStream<A, E> {
		self.slot.subscribe()
	}

	/// Requests termination of the background refresher.
	///
	/// Returns `true` iff this call was the one that transitioned the refresher from active to
	/// cancelled; concurrent duplicate calls, and calls after the refresher already stopped on its
	/// own, return `false`. An in-flight producer call or sleep is abandoned immediately.
	pub fn cancel(&self) -> bool {
		let mut guard = self.lifecycle.lock();

		match std::mem::replace(&mut *guard, Lifecycle::Cancelled) {
			Lifecycle::Active(handle) => {
				let last_known_good = self.slot.read().into_value();

				self.slot.write(CachedValue::cancelled(last_known_good));
				handle.abort();

				true
			},
			other => {
				*guard = other;

				false
			},
		}
	}

	/// If the refresher is in a terminal state (cancelled, or exhausted its retry policy), starts
	/// a fresh one seeded with the slot's current value.
	///
	/// Returns `true` iff this call performed the transition; if the refresher is still active,
	/// returns `false` without effect.
	pub fn restart(&self) -> bool {
		let mut guard = self.lifecycle.lock();

		match &*guard {
			Lifecycle::Active(_) | Lifecycle::Starting => false,
			Lifecycle::Cancelled | Lifecycle::Exhausted => {
				let initial = self.slot.read().into_value();
				let handle =
					refresher::spawn(self.slot.clone(), self.config.clone(), self.lifecycle.clone(), initial);

				*guard = Lifecycle::Active(handle);

				true
			},
		}
	}
}
impl<A, E> Drop for Controller<A, E> {
	fn drop(&mut self) {
		// `JoinHandle::abort` is fire-and-forget; `Drop` cannot `.await` the task's actual exit, so
		// this is a best-effort request rather than the synchronous wait the scope-release
		// contract describes in spirit.
		if let Lifecycle::Active(handle) = &*self.lifecycle.lock() {
			handle.abort();
		}
	}
}
