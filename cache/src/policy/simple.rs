use super::{PolicyStore, SetOutcome};
use crate::entry::CacheEntry;

use std::collections::HashMap;
use std::hash::Hash;

/// A store with no eviction order: the index alone determines membership.
///
/// `evict_one` never produces a victim, so capacity is advisory for this
/// policy and the facade's over-capacity loop backs off immediately.
#[derive(Debug)]
pub(crate) struct SimpleStore<K, V> {
  items: HashMap<K, CacheEntry<V>, ahash::RandomState>,
}

impl<K: Eq + Hash, V> SimpleStore<K, V> {
  pub(crate) fn new(capacity: usize) -> Self {
    Self {
      items: HashMap::with_capacity_and_hasher(capacity, ahash::RandomState::default()),
    }
  }
}

impl<K, V> PolicyStore<K, V> for SimpleStore<K, V>
where
  K: Eq + Hash + Clone + Send,
  V: Send + Sync,
{
  fn get(&mut self, key: &K) -> Option<&mut CacheEntry<V>> {
    self.items.get_mut(key)
  }

  fn peek(&self, key: &K) -> Option<&CacheEntry<V>> {
    self.items.get(key)
  }

  fn set(&mut self, key: K, entry: CacheEntry<V>) -> SetOutcome<K, V> {
    match self.items.insert(key, entry) {
      Some(old) => SetOutcome::replaced(old),
      None => SetOutcome::inserted(),
    }
  }

  fn remove(&mut self, key: &K) -> Option<CacheEntry<V>> {
    self.items.remove(key)
  }

  fn contains(&self, key: &K) -> bool {
    self.items.contains_key(key)
  }

  fn keys(&self) -> Vec<K> {
    self.items.keys().cloned().collect()
  }

  fn len(&self) -> usize {
    self.items.len()
  }

  fn evict_one(&mut self) -> Option<(K, CacheEntry<V>)> {
    None
  }

  fn clear(&mut self) {
    self.items.clear();
  }
}
