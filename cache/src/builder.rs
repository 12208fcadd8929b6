use crate::cache::{Cache, CacheShared};
use crate::error::BuildError;
use crate::listener::EvictionListener;
use crate::loader::{Loader, LoaderError};
use crate::policy::{ArcStore, EvictionPolicy, LfuStore, LruStore, PolicyStore, SimpleStore};
use crate::stats::Stats;

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// Assembles a [`Cache`] from its configuration.
///
/// The configuration is immutable once built; capacity and policy cannot be
/// changed on a live cache.
///
/// ```
/// use polycache::CacheBuilder;
///
/// let cache = CacheBuilder::new(64)
///   .lru()
///   .build()
///   .unwrap();
/// cache.set("a", 1);
/// assert_eq!(cache.get(&"a").map(|v| *v).ok(), Some(1));
/// ```
pub struct CacheBuilder<K, V> {
  capacity: usize,
  policy: EvictionPolicy,
  time_to_live: Option<Duration>,
  loader: Option<Loader<K, V>>,
  listener: Option<Arc<dyn EvictionListener<K, V>>>,
}

impl<K, V> fmt::Debug for CacheBuilder<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheBuilder")
      .field("capacity", &self.capacity)
      .field("policy", &self.policy)
      .field("time_to_live", &self.time_to_live)
      .field("has_loader", &self.loader.is_some())
      .field("has_listener", &self.listener.is_some())
      .finish()
  }
}

impl<K, V> CacheBuilder<K, V>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Send + Sync + 'static,
{
  /// Starts a builder for a cache holding up to `capacity` entries.
  /// The policy defaults to [`EvictionPolicy::Simple`].
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity,
      policy: EvictionPolicy::default(),
      time_to_live: None,
      loader: None,
      listener: None,
    }
  }

  /// Selects the eviction policy.
  pub fn policy(mut self, policy: EvictionPolicy) -> Self {
    self.policy = policy;
    self
  }

  /// Selects the unbounded simple policy.
  pub fn simple(self) -> Self {
    self.policy(EvictionPolicy::Simple)
  }

  /// Selects the least-recently-used policy.
  pub fn lru(self) -> Self {
    self.policy(EvictionPolicy::Lru)
  }

  /// Selects the least-frequently-used policy.
  pub fn lfu(self) -> Self {
    self.policy(EvictionPolicy::Lfu)
  }

  /// Selects the adaptive-replacement policy.
  pub fn arc(self) -> Self {
    self.policy(EvictionPolicy::Arc)
  }

  /// Sets a time-to-live applied to every entry written without an
  /// explicit deadline.
  pub fn time_to_live(mut self, ttl: Duration) -> Self {
    self.time_to_live = Some(ttl);
    self
  }

  /// Sets the loader invoked to populate missing keys.
  ///
  /// `get` runs it synchronously on the calling thread; `get_if_present`
  /// runs it on a background thread. Either way it executes outside the
  /// cache's lock.
  pub fn loader(
    mut self,
    loader: impl Fn(&K) -> Result<V, LoaderError> + Send + Sync + 'static,
  ) -> Self {
    self.loader = Some(Arc::new(loader));
    self
  }

  /// Sets the eviction listener. Use
  /// [`listener_fn`](crate::listener::listener_fn) to adapt a plain
  /// closure.
  pub fn eviction_listener<L>(mut self, listener: L) -> Self
  where
    L: EvictionListener<K, V> + 'static,
  {
    self.listener = Some(Arc::new(listener));
    self
  }

  /// Builds the cache, or reports why the configuration is invalid.
  pub fn build(self) -> Result<Cache<K, V>, BuildError> {
    self.validate()?;

    let store: Box<dyn PolicyStore<K, V>> = match self.policy {
      EvictionPolicy::Simple => Box::new(SimpleStore::new(self.capacity)),
      EvictionPolicy::Lru => Box::new(LruStore::new(self.capacity)),
      EvictionPolicy::Lfu => Box::new(LfuStore::new(self.capacity)),
      EvictionPolicy::Arc => Box::new(ArcStore::new(self.capacity)),
    };

    Ok(Cache {
      shared: Arc::new(CacheShared {
        store: Mutex::new(store),
        capacity: self.capacity,
        policy: self.policy,
        time_to_live: self.time_to_live,
        loader: self.loader,
        listener: self.listener,
        pending_loads: Mutex::new(HashMap::default()),
        stats: Stats::default(),
      }),
    })
  }

  fn validate(&self) -> Result<(), BuildError> {
    if self.capacity == 0 {
      return Err(BuildError::ZeroCapacity);
    }
    Ok(())
  }
}
