mod arc;
mod key_list;
mod lfu;
mod lru;
mod simple;

pub(crate) use arc::ArcStore;
pub(crate) use lfu::LfuStore;
pub(crate) use lru::LruStore;
pub(crate) use simple::SimpleStore;

use crate::entry::CacheEntry;
use crate::error::BuildError;

use std::fmt;
use std::str::FromStr;

/// Selects the eviction algorithm a cache instance runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
  /// Index only, no eviction order. Capacity is advisory; callers manage
  /// sizing externally.
  #[default]
  Simple,
  /// Least recently used.
  Lru,
  /// Least frequently used, with FIFO tie-breaking at equal frequency.
  Lfu,
  /// Adaptive replacement: balances recency and frequency using ghost-list
  /// history, which makes it resistant to one-time scans.
  Arc,
}

impl fmt::Display for EvictionPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      EvictionPolicy::Simple => "simple",
      EvictionPolicy::Lru => "lru",
      EvictionPolicy::Lfu => "lfu",
      EvictionPolicy::Arc => "arc",
    };
    write!(f, "{name}")
  }
}

impl FromStr for EvictionPolicy {
  type Err = BuildError;

  fn from_str(name: &str) -> Result<Self, Self::Err> {
    match name.to_ascii_lowercase().as_str() {
      "simple" => Ok(EvictionPolicy::Simple),
      "lru" => Ok(EvictionPolicy::Lru),
      "lfu" => Ok(EvictionPolicy::Lfu),
      "arc" => Ok(EvictionPolicy::Arc),
      _ => Err(BuildError::UnknownPolicy(name.to_string())),
    }
  }
}

/// What a store did with a `set`.
pub(crate) struct SetOutcome<K, V> {
  /// The entry displaced by writing a key that was already live.
  pub(crate) replaced: Option<CacheEntry<V>>,
  /// An entry the store itself had to sacrifice to make room (ARC's
  /// replacement rule runs inside `set`; the other stores never fill this).
  pub(crate) evicted: Option<(K, CacheEntry<V>)>,
}

impl<K, V> SetOutcome<K, V> {
  pub(crate) fn inserted() -> Self {
    Self {
      replaced: None,
      evicted: None,
    }
  }

  pub(crate) fn replaced(entry: CacheEntry<V>) -> Self {
    Self {
      replaced: Some(entry),
      evicted: None,
    }
  }
}

/// The contract shared by the four eviction-order stores.
///
/// A store owns both the key→entry index and the ordering bookkeeping for
/// its policy; every indexed entry lives in exactly one ordering structure.
/// The facade serializes all calls behind the instance lock, so stores are
/// plain single-threaded structures.
pub(crate) trait PolicyStore<K, V>: Send {
  /// Looks a key up and refreshes its recency/frequency signal.
  fn get(&mut self, key: &K) -> Option<&mut CacheEntry<V>>;

  /// Looks a key up without touching any ordering signal.
  fn peek(&self, key: &K) -> Option<&CacheEntry<V>>;

  /// Inserts a new entry, or updates the entry of a live key in place.
  /// Updating refreshes the key's ordering signal but never changes the
  /// store's size.
  fn set(&mut self, key: K, entry: CacheEntry<V>) -> SetOutcome<K, V>;

  /// Removes a key outright. No ghost history is kept for it.
  fn remove(&mut self, key: &K) -> Option<CacheEntry<V>>;

  fn contains(&self, key: &K) -> bool;

  /// The live keys. Expired-but-unpurged entries are included; the facade
  /// filters them when asked to.
  fn keys(&self) -> Vec<K>;

  /// The number of live entries (ghost-list keys do not count).
  fn len(&self) -> usize;

  /// Removes and returns the entry the policy would sacrifice next, or
  /// `None` for stores that never evict.
  fn evict_one(&mut self) -> Option<(K, CacheEntry<V>)>;

  fn clear(&mut self);
}
