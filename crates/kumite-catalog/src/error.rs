//! Error type for `kumite-catalog`.

use thiserror::Error;

/// A failed catalog action. The cached snapshot is unchanged whenever one of
/// these is returned.
#[derive(Debug, Error)]
pub enum Error<E> {
  /// Rejected at the input boundary; the store was never called.
  #[error("invalid input: {0}")]
  Invalid(#[from] kumite_core::Error),

  /// The store's own error, passed through as-is.
  #[error("store error: {0}")]
  Store(#[source] E),
}

pub type Result<T, E> = std::result::Result<T, Error<E>>;
