use std::fmt;
use std::sync::Arc;

/// Describes why an entry left the cache without being removed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
  /// The entry was removed to bring the cache back under capacity.
  Capacity,
  /// The entry's time-to-live elapsed and a later operation purged it.
  Expired,
}

impl fmt::Display for EvictionReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EvictionReason::Capacity => write!(f, "evicted due to capacity"),
      EvictionReason::Expired => write!(f, "evicted due to expiration (TTL)"),
    }
  }
}

/// A listener that can be registered with the cache to receive notifications
/// when entries are evicted.
///
/// `on_evict` runs synchronously on the thread whose operation caused the
/// eviction, after the instance lock has been released. A slow or panicking
/// listener stalls or crashes that caller, so keep it fast and non-throwing.
/// Explicit `remove` calls are not evictions and fire nothing.
pub trait EvictionListener<K, V>: Send + Sync {
  fn on_evict(&self, key: K, value: Arc<V>, reason: EvictionReason);
}

/// Wraps a plain closure as an [`EvictionListener`].
///
/// ```
/// use polycache::listener::{listener_fn, EvictionReason};
/// use std::sync::Arc;
///
/// let listener = listener_fn(|key: String, value: Arc<i64>, reason| {
///   eprintln!("{key} -> {value} left the cache: {reason}");
/// });
/// # let _ = listener;
/// ```
pub fn listener_fn<K, V, F>(f: F) -> impl EvictionListener<K, V>
where
  F: Fn(K, Arc<V>, EvictionReason) + Send + Sync,
{
  struct FnListener<F>(F);

  impl<K, V, F> EvictionListener<K, V> for FnListener<F>
  where
    F: Fn(K, Arc<V>, EvictionReason) + Send + Sync,
  {
    fn on_evict(&self, key: K, value: Arc<V>, reason: EvictionReason) {
      (self.0)(key, value, reason)
    }
  }

  FnListener(f)
}
