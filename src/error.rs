//! Crate-wide error types and `Result` alias.

/// Library-wide result type.
pub type Result<T, E> = std::result::Result<T, Error<E>>;

/// Errors surfaced directly to the caller by this crate.
///
/// Refresh failures that occur once the cache is running are *not* represented here — they are
/// carried inside [`CachedValue::Error`][crate::CachedValue::Error] instead, since a reader always
/// gets a value back. This type only covers the one failure mode that can prevent a
/// [`Controller`][crate::Controller] from ever existing: the producer's very first, synchronous
/// call failing with no fallback configured.
#[derive(Debug, thiserror::Error)]
pub enum Error<E> {
	/// The producer failed on its first call during acquisition, and no `default_value` was
	/// configured to salvage it.
	#[error("initial production failed: {0}")]
	InitialProduction(E),
}

impl<E> Error<E> {
	/// Returns the producer error carried by this failure.
	pub fn into_inner(self) -> E {
		match self {
			Self::InitialProduction(cause) => cause,
		}
	}
}
