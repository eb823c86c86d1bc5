//! The shared cell the background refresh task publishes into and readers observe.

// std
use std::{
	pin::Pin,
	task::{Context, Poll},
};
// crates.io
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio_stream::{
	Stream,
	wrappers::{BroadcastStream, errors::BroadcastStreamRecvError},
};
// self
use crate::CachedValue;

/// Signals that a subscriber to [`UpdatesStream`] fell behind and missed one or more updates.
///
/// The stream does not replay missed values; `self.0` is how many were dropped.
#[derive(Clone, Copy, Debug)]
pub struct Lagged(
	/// How many updates were dropped before this subscriber caught up.
	pub u64,
);

/// A single-value cell holding the current [`CachedValue`], broadcasting every write to
/// subscribers of [`UpdatesStream`].
///
/// Reads and writes take a `parking_lot` lock and never suspend — only the `recv` side of the
/// broadcast channel, driven through [`UpdatesStream`], does.
pub(crate) struct Slot<A, E> {
	current: RwLock<CachedValue<A, E>>,
	sender: broadcast::Sender<CachedValue<A, E>>,
}
impl<A, E> Slot<A, E>
where
	A: Clone + Send + Sync + 'static,
	E: Send + Sync + 'static,
{
	pub fn new(initial: CachedValue<A, E>, updates_capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(updates_capacity.max(1));

		Self { current: RwLock::new(initial), sender }
	}

	/// Returns the current value.
	pub fn read(&self) -> CachedValue<A, E> {
		self.current.read().clone()
	}

	/// Publishes a new value, waking every active subscriber.
	///
	/// Holds the write lock across the broadcast `send` so that a concurrent [`Self::subscribe`]
	/// can never land between "value written" and "subscription started" and miss this update.
	pub fn write(&self, value: CachedValue<A, E>) {
		let mut guard = self.current.write();

		*guard = value.clone();
		// Subscriber count can legitimately be zero; a send with no receivers is not an error.
		let _ = self.sender.send(value);
	}

	/// Subscribes to every update from this point forward, preceded by the current value.
	pub fn subscribe(&self) -> UpdatesStream<A, E> {
		let guard = self.current.read();
		let current = guard.clone();
		let receiver = self.sender.subscribe();

		drop(guard);

		UpdatesStream { leading: Some(current), inner: BroadcastStream::new(receiver) }
	}
}

/// A stream of every [`CachedValue`] a [`Controller`][crate::Controller] has held, starting from
/// whatever was current at subscription time.
///
/// Yields `Err(Lagged)` in place of any updates a slow consumer failed to keep up with, then
/// resumes yielding fresh values; it never terminates on its own.
pub struct UpdatesStream<A, E> {
	leading: Option<CachedValue<A, E>>,
	inner: BroadcastStream<CachedValue<A, E>>,
}
// `UpdatesStream` holds no self-referential state; nothing here relies on the pinning guarantee,
// so it is always safe to treat as `Unpin` regardless of `A`/`E`.
impl<A, E> Unpin for UpdatesStream<A, E> {}
impl<A, E> Stream for UpdatesStream<A, E>
where
	A: Clone + Send + Sync + 'static,
	E: Send + Sync + 'static,
{
	type Item = Result<CachedValue<A, E>, Lagged>;

	fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
		let this = self.get_mut();

		if let Some(leading) = this.leading.take() {
			return Poll::Ready(Some(Ok(leading)));
		}

		match Pin::new(&mut this.inner).poll_next(cx) {
			Poll::Ready(Some(Ok(value))) => Poll::Ready(Some(Ok(value))),
			Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) =>
				Poll::Ready(Some(Err(Lagged(skipped)))),
			Poll::Ready(None) => Poll::Ready(None),
			Poll::Pending => Poll::Pending,
		}
	}
}
