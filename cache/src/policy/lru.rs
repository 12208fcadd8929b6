use super::key_list::KeyList;
use super::{PolicyStore, SetOutcome};
use crate::entry::CacheEntry;

use std::collections::HashMap;
use std::hash::Hash;

/// A store that evicts the least recently used entry.
///
/// A doubly-linked recency list orders the keys; the index maps each key to
/// its entry. Hits move a key to the front of the list, `evict_one` pops the
/// back, both in O(1).
#[derive(Debug)]
pub(crate) struct LruStore<K: Eq + Hash + Clone, V> {
  order: KeyList<K>,
  items: HashMap<K, CacheEntry<V>, ahash::RandomState>,
}

impl<K: Eq + Hash + Clone, V> LruStore<K, V> {
  pub(crate) fn new(capacity: usize) -> Self {
    Self {
      order: KeyList::new(),
      items: HashMap::with_capacity_and_hasher(capacity, ahash::RandomState::default()),
    }
  }
}

impl<K, V> PolicyStore<K, V> for LruStore<K, V>
where
  K: Eq + Hash + Clone + Send,
  V: Send + Sync,
{
  fn get(&mut self, key: &K) -> Option<&mut CacheEntry<V>> {
    let entry = self.items.get_mut(key)?;
    self.order.move_to_front(key);
    Some(entry)
  }

  fn peek(&self, key: &K) -> Option<&CacheEntry<V>> {
    self.items.get(key)
  }

  fn set(&mut self, key: K, entry: CacheEntry<V>) -> SetOutcome<K, V> {
    if self.items.contains_key(&key) {
      // An update counts as a touch, not a fresh insertion.
      self.order.move_to_front(&key);
      match self.items.insert(key, entry) {
        Some(old) => SetOutcome::replaced(old),
        None => SetOutcome::inserted(),
      }
    } else {
      self.order.push_front(key.clone());
      self.items.insert(key, entry);
      SetOutcome::inserted()
    }
  }

  fn remove(&mut self, key: &K) -> Option<CacheEntry<V>> {
    let entry = self.items.remove(key)?;
    self.order.remove(key);
    Some(entry)
  }

  fn contains(&self, key: &K) -> bool {
    self.items.contains_key(key)
  }

  fn keys(&self) -> Vec<K> {
    // Most recent first, matching the recency list.
    self.order.iter().cloned().collect()
  }

  fn len(&self) -> usize {
    self.items.len()
  }

  fn evict_one(&mut self) -> Option<(K, CacheEntry<V>)> {
    let key = self.order.pop_back()?;
    let entry = self.items.remove(&key)?;
    Some((key, entry))
  }

  fn clear(&mut self) {
    self.order.clear();
    self.items.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(value: i32) -> CacheEntry<i32> {
    CacheEntry::new(value, None)
  }

  #[test]
  fn evicts_least_recently_used() {
    let mut store = LruStore::new(3);
    store.set(1, entry(1));
    store.set(2, entry(2));
    store.set(3, entry(3));

    assert_eq!(store.evict_one().map(|(k, _)| k), Some(1));
    assert_eq!(store.evict_one().map(|(k, _)| k), Some(2));
  }

  #[test]
  fn get_refreshes_recency() {
    let mut store = LruStore::new(3);
    store.set(1, entry(1));
    store.set(2, entry(2));
    store.set(3, entry(3));

    assert!(store.get(&1).is_some());
    assert_eq!(
      store.evict_one().map(|(k, _)| k),
      Some(2),
      "1 was touched, so 2 is now the LRU entry"
    );
  }

  #[test]
  fn peek_does_not_refresh_recency() {
    let mut store = LruStore::new(2);
    store.set(1, entry(1));
    store.set(2, entry(2));

    assert!(store.peek(&1).is_some());
    assert_eq!(store.evict_one().map(|(k, _)| k), Some(1));
  }

  #[test]
  fn set_existing_key_touches_without_growing() {
    let mut store = LruStore::new(2);
    store.set(1, entry(1));
    store.set(2, entry(2));

    let outcome = store.set(1, entry(10));
    assert_eq!(outcome.replaced.map(|e| *e.value()), Some(1));
    assert_eq!(store.len(), 2);
    assert_eq!(store.evict_one().map(|(k, _)| k), Some(2));
  }

  #[test]
  fn keys_are_ordered_most_recent_first() {
    let mut store = LruStore::new(3);
    store.set(1, entry(1));
    store.set(2, entry(2));
    store.set(3, entry(3));
    store.get(&1);

    assert_eq!(store.keys(), vec![1, 3, 2]);
  }

  #[test]
  fn remove_unlinks_order_node() {
    let mut store = LruStore::new(3);
    store.set(1, entry(1));
    store.set(2, entry(2));

    assert!(store.remove(&1).is_some());
    assert!(store.remove(&1).is_none());
    assert_eq!(store.keys(), vec![2]);
    assert_eq!(store.len(), 1);
  }
}
