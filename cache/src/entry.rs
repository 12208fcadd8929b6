use crate::time;

use std::sync::Arc;
use std::time::Duration;

/// A container for one cached value and its bookkeeping metadata.
///
/// Entries are owned by the policy store that indexes them and are only ever
/// touched under the cache's instance lock, so the fields are plain data.
/// The value is wrapped in an `Arc` so lookups can hand it out without a
/// `V: Clone` bound.
#[derive(Debug)]
pub(crate) struct CacheEntry<V> {
  value: Arc<V>,
  created_at: Duration,
  accessed_at: Duration,
  /// Absolute deadline, as a duration since the cache epoch. `None` means
  /// the entry never expires.
  expires_at: Option<Duration>,
}

impl<V> CacheEntry<V> {
  /// Creates an entry whose deadline is `now + ttl`, if a TTL is given.
  pub(crate) fn new(value: V, ttl: Option<Duration>) -> Self {
    let now = time::now();
    Self {
      value: Arc::new(value),
      created_at: now,
      accessed_at: now,
      expires_at: ttl.map(|d| now + d),
    }
  }

  /// Returns a clone of the `Arc` containing the value.
  #[inline]
  pub(crate) fn value(&self) -> Arc<V> {
    self.value.clone()
  }

  /// Marks the entry as just read.
  #[inline]
  pub(crate) fn touch(&mut self) {
    self.accessed_at = time::now();
  }

  /// Whether the entry's deadline has passed at `now`.
  #[inline]
  pub(crate) fn is_expired(&self, now: Duration) -> bool {
    matches!(self.expires_at, Some(deadline) if now >= deadline)
  }

  /// How long the entry has been alive at `now`.
  #[inline]
  pub(crate) fn age(&self, now: Duration) -> Duration {
    now.saturating_sub(self.created_at)
  }

  /// How long ago the entry was last read or written, at `now`.
  #[inline]
  pub(crate) fn idle(&self, now: Duration) -> Duration {
    now.saturating_sub(self.accessed_at)
  }
}
