use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Errors that can occur when building a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
  /// The cache was configured with a capacity of zero. Capacity must be a
  /// positive number of entries, even for the `Simple` policy where it is
  /// only advisory.
  ZeroCapacity,
  /// A policy name supplied to the configuration did not match any known
  /// eviction policy.
  UnknownPolicy(String),
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::ZeroCapacity => write!(f, "cache capacity cannot be zero"),
      BuildError::UnknownPolicy(name) => write!(f, "unknown eviction policy {name:?}"),
    }
  }
}

impl Error for BuildError {}

/// Errors returned by cache lookups.
///
/// Both variants are ordinary, recoverable outcomes: a miss without a loader
/// and a failed load are reported to the caller and never retried
/// internally.
#[derive(Debug, Clone)]
pub enum CacheError {
  /// The key is not present, and no loader produced a value for it.
  KeyNotFound,
  /// The configured loader failed. The original error is shared so every
  /// waiter on one in-flight load observes the same failure.
  Loader(Arc<dyn Error + Send + Sync + 'static>),
}

impl CacheError {
  pub(crate) fn from_loader(source: Box<dyn Error + Send + Sync + 'static>) -> Self {
    CacheError::Loader(Arc::from(source))
  }

  /// Whether this is the plain "nothing there" outcome.
  pub fn is_not_found(&self) -> bool {
    matches!(self, CacheError::KeyNotFound)
  }
}

impl fmt::Display for CacheError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CacheError::KeyNotFound => write!(f, "key not found"),
      CacheError::Loader(source) => write!(f, "loader failed: {source}"),
    }
  }
}

impl Error for CacheError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      CacheError::KeyNotFound => None,
      CacheError::Loader(source) => {
        let source: &(dyn Error + 'static) = source.as_ref();
        Some(source)
      }
    }
  }
}
