//! Configures and acquires a [`Controller`].

// std
use std::{future::Future, pin::Pin};

// crates.io
use parking_lot::Mutex;
// self
use crate::{
	CachedValue, Controller, _prelude::*,
	controller::Lifecycle,
	refresher,
	retry::{NeverRetry, RetryDetails, RetryPolicy},
	slot::Slot,
};

pub(crate) type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
pub(crate) type ProducerFn<A, E> = dyn Fn() -> BoxFuture<std::result::Result<A, E>> + Send + Sync;
pub(crate) type CadenceFn<A> = dyn Fn(&A) -> Duration + Send + Sync;
pub(crate) type CombineFn<A, E> = dyn Fn(&CachedValue<A, E>, &CachedValue<A, E>) -> A + Send + Sync;
pub(crate) type OnNewValueFn<A> = dyn Fn(&A, Duration) + Send + Sync;
pub(crate) type OnRefreshFailureFn<E> = dyn Fn(&E, &RetryDetails) + Send + Sync;
pub(crate) type OnExhaustedRetriesFn<E> = dyn Fn(&E) + Send + Sync;

/// The shared, immutable configuration driving every refresh cycle, reused across `restart`s.
pub(crate) struct RefresherConfig<A, E> {
	pub producer: Arc<ProducerFn<A, E>>,
	pub cadence: Arc<CadenceFn<A>>,
	pub retry_policy: Arc<dyn RetryPolicy>,
	pub combine: Option<Arc<CombineFn<A, E>>>,
	pub on_new_value: Arc<OnNewValueFn<A>>,
	pub on_refresh_failure: Arc<OnRefreshFailureFn<E>>,
	pub on_exhausted_retries: Arc<OnExhaustedRetriesFn<E>>,
}

const DEFAULT_UPDATES_CAPACITY: usize = 32;

/// Builds a [`Controller`] bound to a user-supplied async producer.
///
/// ```ignore
/// let controller = RefresherBuilder::new(
///     || Box::pin(async { Ok::<_, std::io::Error>(fetch_config().await?) }),
///     |_value| std::time::Duration::from_secs(60),
/// )
/// .retry_policy(ConstantDelayPolicy::new(std::time::Duration::from_secs(5), 3))
/// .acquire()
/// .await?;
/// ```
pub struct RefresherBuilder<A, E> {
	producer: Arc<ProducerFn<A, E>>,
	cadence: Arc<CadenceFn<A>>,
	default_value: Option<A>,
	retry_policy: Arc<dyn RetryPolicy>,
	combine: Option<Arc<CombineFn<A, E>>>,
	on_new_value: Arc<OnNewValueFn<A>>,
	on_refresh_failure: Arc<OnRefreshFailureFn<E>>,
	on_exhausted_retries: Arc<OnExhaustedRetriesFn<E>>,
	updates_capacity: usize,
}
impl<A, E> RefresherBuilder<A, E>
where
	A: Clone + Send + Sync + 'static,
	E: std::fmt::Debug + Send + Sync + 'static,
{
	/// Creates a builder from the required producer and cadence function.
	///
	/// `producer` is called once synchronously during [`Self::acquire`] and thereafter on the
	/// schedule `cadence` derives from the most recently produced value.
	pub fn new<F, Fut, C>(producer: F, cadence: C) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = std::result::Result<A, E>> + Send + 'static,
		C: Fn(&A) -> Duration + Send + Sync + 'static,
	{
		Self {
			producer: Arc::new(move || Box::pin(producer()) as BoxFuture<_>),
			cadence: Arc::new(cadence),
			default_value: None,
			retry_policy: Arc::new(NeverRetry),
			combine: None,
			on_new_value: Arc::new(|_, _| {}),
			on_refresh_failure: Arc::new(|_, _| {}),
			on_exhausted_retries: Arc::new(|_| {}),
			updates_capacity: DEFAULT_UPDATES_CAPACITY,
		}
	}

	/// A fallback value used if the producer's first, synchronous call fails.
	///
	/// Without this, a failing first call surfaces as [`Error::InitialProduction`] from
	/// [`Self::acquire`] and no [`Controller`] is created.
	pub fn default_value(mut self, value: A) -> Self {
		self.default_value = Some(value);
		self
	}

	/// The retry policy governing refresh failures after acquisition. Defaults to
	/// [`NeverRetry`].
	pub fn retry_policy(mut self, policy: impl RetryPolicy) -> Self {
		self.retry_policy = Arc::new(policy);
		self
	}

	/// Combines the previous [`CachedValue`] with a freshly produced one before publishing.
	///
	/// Only invoked on a *successful* production; a failed attempt never reaches this hook.
	pub fn combine(
		mut self,
		combine: impl Fn(&CachedValue<A, E>, &CachedValue<A, E>) -> A + Send + Sync + 'static,
	) -> Self {
		self.combine = Some(Arc::new(combine));
		self
	}

	/// Called after every successful refresh (never for the initial, synchronous production),
	/// with the newly published value and the cadence chosen for it.
	pub fn on_new_value(mut self, callback: impl Fn(&A, Duration) + Send + Sync + 'static) -> Self {
		self.on_new_value = Arc::new(callback);
		self
	}

	/// Called after a refresh attempt fails but the retry policy decided to try again.
	pub fn on_refresh_failure(
		mut self,
		callback: impl Fn(&E, &RetryDetails) + Send + Sync + 'static,
	) -> Self {
		self.on_refresh_failure = Arc::new(callback);
		self
	}

	/// Called once, when the retry policy gives up and the refresher stops.
	pub fn on_exhausted_retries(mut self, callback: impl Fn(&E) + Send + Sync + 'static) -> Self {
		self.on_exhausted_retries = Arc::new(callback);
		self
	}

	/// The backlog size of the broadcast channel backing [`Controller::updates`]. Defaults to 32.
	pub fn updates_capacity(mut self, capacity: usize) -> Self {
		self.updates_capacity = capacity;
		self
	}

	/// Runs the producer once, synchronously, then spawns the background refresher and returns a
	/// bound [`Controller`].
	///
	/// Fails only if the producer's first call fails and no [`Self::default_value`] was
	/// configured.
	pub async fn acquire(self) -> Result<Controller<A, E>, E> {
		let initial = match (self.producer)().await {
			Ok(value) => value,
			Err(cause) => match self.default_value {
				Some(value) => value,
				None => return Err(Error::InitialProduction(cause)),
			},
		};
		let slot = Arc::new(Slot::new(CachedValue::success(initial.clone()), self.updates_capacity));
		let config = Arc::new(RefresherConfig {
			producer: self.producer,
			cadence: self.cadence,
			retry_policy: self.retry_policy,
			combine: self.combine,
			on_new_value: self.on_new_value,
			on_refresh_failure: self.on_refresh_failure,
			on_exhausted_retries: self.on_exhausted_retries,
		});
		let lifecycle = Arc::new(Mutex::new(Lifecycle::Starting));
		let handle = refresher::spawn(slot.clone(), config.clone(), lifecycle.clone(), initial);

		*lifecycle.lock() = Lifecycle::Active(handle);

		Ok(Controller::new(slot, config, lifecycle))
	}
}
