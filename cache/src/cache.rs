use crate::entry::CacheEntry;
use crate::error::CacheError;
use crate::listener::{EvictionListener, EvictionReason};
use crate::loader::{LoadFuture, Loader};
use crate::policy::{EvictionPolicy, PolicyStore};
use crate::stats::{Stats, StatsSnapshot};
use crate::time;

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, trace, warn};
use parking_lot::Mutex;

/// A thread-safe key/value cache with a pluggable eviction policy.
///
/// `Cache` is a cheap handle over shared state: clone it freely and hand the
/// clones to other threads. All policy bookkeeping happens under one lock
/// per instance; loaders run outside of it so slow loads for different keys
/// can overlap.
///
/// Instances are assembled by [`CacheBuilder`](crate::CacheBuilder).
pub struct Cache<K, V> {
  pub(crate) shared: Arc<CacheShared<K, V>>,
}

impl<K, V> Clone for Cache<K, V> {
  fn clone(&self) -> Self {
    Self {
      shared: self.shared.clone(),
    }
  }
}

impl<K, V> fmt::Debug for Cache<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Cache")
      .field("capacity", &self.shared.capacity)
      .field("policy", &self.shared.policy)
      .field("time_to_live", &self.shared.time_to_live)
      .finish_non_exhaustive()
  }
}

pub(crate) struct CacheShared<K, V> {
  /// Every index and ordering mutation happens under this lock.
  pub(crate) store: Mutex<Box<dyn PolicyStore<K, V>>>,
  pub(crate) capacity: usize,
  pub(crate) policy: EvictionPolicy,
  pub(crate) time_to_live: Option<Duration>,
  pub(crate) loader: Option<Loader<K, V>>,
  pub(crate) listener: Option<Arc<dyn EvictionListener<K, V>>>,
  /// Keys with a background load in flight, so duplicate misses coalesce.
  pub(crate) pending_loads: Mutex<HashMap<K, Arc<LoadFuture<V>>, ahash::RandomState>>,
  pub(crate) stats: Stats,
}

impl<K, V> Cache<K, V>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Send + Sync + 'static,
{
  /// Looks `key` up, loading it on a miss when a loader is configured.
  ///
  /// A live hit refreshes the entry's recency/frequency signal. On a miss
  /// (absent, or present but expired) the loader runs synchronously on the
  /// calling thread, outside the instance lock; its result is written back
  /// with a fresh TTL and returned. Loader failures are returned as
  /// [`CacheError::Loader`] and never retried internally. Without a loader
  /// a miss is [`CacheError::KeyNotFound`].
  ///
  /// Concurrent `get` calls for the same missing key may each run the
  /// loader; last write wins. Use [`get_if_present`](Self::get_if_present)
  /// when single-flight loading matters.
  pub fn get(&self, key: &K) -> Result<Arc<V>, CacheError> {
    if let Some(value) = self.lookup_live(key, true) {
      self.shared.stats.record_hit();
      return Ok(value);
    }
    self.shared.stats.record_miss();

    let Some(loader) = self.shared.loader.clone() else {
      return Err(CacheError::KeyNotFound);
    };
    match (*loader)(key) {
      Ok(value) => {
        self.shared.stats.record_load();
        Ok(self.write(key.clone(), value, self.shared.time_to_live))
      }
      Err(source) => {
        self.shared.stats.record_load_failure();
        debug!("loader failed: {source}");
        Err(CacheError::from_loader(source))
      }
    }
  }

  /// Looks `key` up without ever blocking on the loader.
  ///
  /// A miss returns [`CacheError::KeyNotFound`] immediately. When a loader
  /// is configured the miss also schedules a background load on a detached
  /// thread — at most one per key at a time — whose result is installed for
  /// future calls. [`wait_for_load`](Self::wait_for_load) joins such a load
  /// instead of polling.
  pub fn get_if_present(&self, key: &K) -> Result<Arc<V>, CacheError> {
    if let Some(value) = self.lookup_live(key, true) {
      self.shared.stats.record_hit();
      return Ok(value);
    }
    self.shared.stats.record_miss();

    if self.shared.loader.is_some() {
      self.schedule_load(key);
    }
    Err(CacheError::KeyNotFound)
  }

  /// Joins the in-flight background load for `key`, if any, and returns its
  /// outcome. With nothing in flight this falls back to whatever is cached:
  /// the live value, or [`CacheError::KeyNotFound`].
  ///
  /// Neither path counts toward hit/miss statistics or touches the entry's
  /// eviction signal.
  pub fn wait_for_load(&self, key: &K) -> Result<Arc<V>, CacheError> {
    let pending = self.shared.pending_loads.lock().get(key).cloned();
    match pending {
      Some(future) => future.wait(),
      None => self
        .lookup_live(key, false)
        .ok_or(CacheError::KeyNotFound),
    }
  }

  /// Writes `value` under `key`, evicting as needed to stay within
  /// capacity. The cache-wide TTL, if any, starts counting now.
  pub fn set(&self, key: K, value: V) {
    self.write(key, value, self.shared.time_to_live);
  }

  /// Like [`set`](Self::set), but with an expiration deadline of
  /// `now + ttl` for this entry regardless of the cache-wide TTL.
  pub fn set_with_expire(&self, key: K, value: V, ttl: Duration) {
    self.write(key, value, Some(ttl));
  }

  /// Removes `key`. Explicit removal is not an eviction: no listener
  /// notification fires. Removing an absent key is a no-op.
  pub fn remove(&self, key: &K) -> bool {
    let removed = self.shared.store.lock().remove(key).is_some();
    if removed {
      trace!("removed entry");
    }
    removed
  }

  /// Drops every entry and all policy bookkeeping, ghost history included.
  pub fn purge(&self) {
    self.shared.store.lock().clear();
    debug!("cache purged");
  }

  /// Expiration-aware presence test. Finding an expired entry purges it
  /// (with an `Expired` notification) and reports absence. Neither recency
  /// nor statistics are touched.
  pub fn has(&self, key: &K) -> bool {
    self.lookup_live(key, false).is_some()
  }

  /// The current key set. With `check_expiration` the expired entries are
  /// purged first; without it they are still listed and counts may be
  /// stale until the next access.
  pub fn keys(&self, check_expiration: bool) -> Vec<K> {
    let (keys, purged) = {
      let mut store = self.shared.store.lock();
      let purged = if check_expiration {
        Self::drain_expired(&mut store)
      } else {
        Vec::new()
      };
      (store.keys(), purged)
    };
    self.notify_expired(purged);
    keys
  }

  /// A snapshot of every entry. Semantics of `check_expiration` match
  /// [`keys`](Self::keys).
  pub fn get_all(&self, check_expiration: bool) -> HashMap<K, Arc<V>, ahash::RandomState> {
    let (snapshot, purged) = {
      let mut store = self.shared.store.lock();
      let purged = if check_expiration {
        Self::drain_expired(&mut store)
      } else {
        Vec::new()
      };
      let mut snapshot = HashMap::default();
      for key in store.keys() {
        if let Some(entry) = store.peek(&key) {
          snapshot.insert(key, entry.value());
        }
      }
      (snapshot, purged)
    };
    self.notify_expired(purged);
    snapshot
  }

  /// The number of entries. Semantics of `check_expiration` match
  /// [`keys`](Self::keys).
  pub fn len(&self, check_expiration: bool) -> usize {
    let (len, purged) = {
      let mut store = self.shared.store.lock();
      let purged = if check_expiration {
        Self::drain_expired(&mut store)
      } else {
        Vec::new()
      };
      (store.len(), purged)
    };
    self.notify_expired(purged);
    len
  }

  /// Whether the cache holds no entries at all, expired or not.
  pub fn is_empty(&self) -> bool {
    self.len(false) == 0
  }

  /// Fraction of lookups served from the cache; `0.0` before any lookup.
  pub fn hit_rate(&self) -> f64 {
    self.shared.stats.hit_rate()
  }

  /// A point-in-time snapshot of the cache's counters.
  pub fn stats(&self) -> StatsSnapshot {
    self.shared.stats.snapshot()
  }

  /// The configured capacity.
  pub fn capacity(&self) -> usize {
    self.shared.capacity
  }

  /// The eviction policy this instance runs.
  pub fn policy(&self) -> EvictionPolicy {
    self.shared.policy
  }

  // Returns the live value for `key`, purging (and notifying) an expired
  // entry on the way. `touch` decides whether the lookup refreshes the
  // entry's eviction signal and access time.
  fn lookup_live(&self, key: &K, touch: bool) -> Option<Arc<V>> {
    let mut found = None;
    let mut purged = Vec::new();
    {
      let mut store = self.shared.store.lock();
      let now = time::now();
      let expired = if touch {
        match store.get(key) {
          Some(entry) if entry.is_expired(now) => true,
          Some(entry) => {
            entry.touch();
            found = Some(entry.value());
            false
          }
          None => false,
        }
      } else {
        match store.peek(key) {
          Some(entry) if entry.is_expired(now) => true,
          Some(entry) => {
            found = Some(entry.value());
            false
          }
          None => false,
        }
      };
      if expired {
        if let Some(entry) = store.remove(key) {
          debug!(
            "entry expired after {:?} (idle {:?}); purging",
            entry.age(now),
            entry.idle(now)
          );
          purged.push((key.clone(), entry.value()));
        }
      }
    }
    self.notify_expired(purged);
    found
  }

  // The single write path behind set, set_with_expire and loader
  // completions.
  fn write(&self, key: K, value: V, ttl: Option<Duration>) -> Arc<V> {
    let entry = CacheEntry::new(value, ttl);
    let handle = entry.value();
    let mut evicted = Vec::new();
    {
      let mut store = self.shared.store.lock();
      let outcome = store.set(key, entry);
      if outcome.replaced.is_none() {
        self.shared.stats.record_insert();
      }
      if let Some((k, e)) = outcome.evicted {
        evicted.push((k, e.value()));
      }
      // A correctly sized store runs over by at most one entry per insert;
      // loop anyway so a misbehaving store cannot wedge the cache over
      // capacity.
      while store.len() > self.shared.capacity {
        match store.evict_one() {
          Some((k, e)) => evicted.push((k, e.value())),
          None => break,
        }
      }
    }
    if !evicted.is_empty() {
      self.shared.stats.record_evictions(evicted.len() as u64);
      trace!("evicted {} entries over capacity", evicted.len());
      if let Some(listener) = &self.shared.listener {
        for (k, v) in evicted {
          listener.on_evict(k, v, EvictionReason::Capacity);
        }
      }
    }
    handle
  }

  // Kicks off a background load for `key` unless one is already in flight.
  fn schedule_load(&self, key: &K) {
    let future = {
      let mut pending = self.shared.pending_loads.lock();
      if pending.contains_key(key) {
        trace!("load already in flight; not spawning another");
        return;
      }
      let future = Arc::new(LoadFuture::new());
      pending.insert(key.clone(), future.clone());
      future
    };

    let cache = self.clone();
    let key = key.clone();
    let spawned = thread::Builder::new()
      .name("polycache-load".into())
      .spawn({
        let key = key.clone();
        let future = future.clone();
        move || cache.run_background_load(key, future)
      });
    if let Err(source) = spawned {
      warn!("failed to spawn background load thread: {source}");
      self.shared.pending_loads.lock().remove(&key);
      future.complete(Err(CacheError::KeyNotFound));
    }
  }

  fn run_background_load(&self, key: K, future: Arc<LoadFuture<V>>) {
    // Scheduled only when a loader is configured.
    let Some(loader) = self.shared.loader.clone() else {
      return;
    };
    let result = match (*loader)(&key) {
      Ok(value) => {
        self.shared.stats.record_load();
        Ok(self.write(key.clone(), value, self.shared.time_to_live))
      }
      Err(source) => {
        self.shared.stats.record_load_failure();
        debug!("background load failed: {source}");
        Err(CacheError::from_loader(source))
      }
    };
    // Deregister before waking waiters, so a fresh miss after completion
    // starts a new load instead of joining a finished one.
    self.shared.pending_loads.lock().remove(&key);
    future.complete(result);
  }

  // Purge every expired entry. Runs under the caller's store lock so the
  // sweep and the enumeration it precedes see one consistent snapshot.
  fn drain_expired(store: &mut Box<dyn PolicyStore<K, V>>) -> Vec<(K, Arc<V>)> {
    let now = time::now();
    let mut purged = Vec::new();
    for key in store.keys() {
      let dead = store
        .peek(&key)
        .map(|entry| entry.is_expired(now))
        .unwrap_or(false);
      if dead {
        if let Some(entry) = store.remove(&key) {
          purged.push((key, entry.value()));
        }
      }
    }
    purged
  }

  fn notify_expired(&self, purged: Vec<(K, Arc<V>)>) {
    if purged.is_empty() {
      return;
    }
    self.shared.stats.record_expirations(purged.len() as u64);
    debug!("purged {} expired entries", purged.len());
    if let Some(listener) = &self.shared.listener {
      for (k, v) in purged {
        listener.on_evict(k, v, EvictionReason::Expired);
      }
    }
  }
}
