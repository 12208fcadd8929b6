use super::key_list::KeyList;
use super::{PolicyStore, SetOutcome};
use crate::entry::CacheEntry;

use std::collections::HashMap;
use std::hash::Hash;
use std::mem;

#[derive(Debug)]
struct LfuSlot<V> {
  freq: u64,
  entry: CacheEntry<V>,
}

/// A store that evicts the least frequently used entry.
///
/// Keys live in frequency buckets: a map from access count to the ordered
/// set of keys at that count, with the current minimum tracked separately.
/// A hit moves the key one bucket up; eviction pops the oldest key of the
/// minimum bucket, so ties break deterministically in insertion order.
/// `min_freq` only advances lazily, which keeps every operation amortized
/// O(1).
#[derive(Debug)]
pub(crate) struct LfuStore<K: Eq + Hash + Clone, V> {
  items: HashMap<K, LfuSlot<V>, ahash::RandomState>,
  buckets: HashMap<u64, KeyList<K>, ahash::RandomState>,
  min_freq: u64,
}

impl<K: Eq + Hash + Clone, V> LfuStore<K, V> {
  pub(crate) fn new(capacity: usize) -> Self {
    Self {
      items: HashMap::with_capacity_and_hasher(capacity, ahash::RandomState::default()),
      buckets: HashMap::default(),
      min_freq: 1,
    }
  }

  // Drop `key` out of its bucket, removing the bucket once drained.
  // Stale `min_freq` values are fixed up lazily by `evict_one`.
  fn unlink_from_bucket(&mut self, key: &K, freq: u64) {
    if let Some(bucket) = self.buckets.get_mut(&freq) {
      bucket.remove(key);
      if bucket.is_empty() {
        self.buckets.remove(&freq);
      }
    }
  }
}

impl<K, V> PolicyStore<K, V> for LfuStore<K, V>
where
  K: Eq + Hash + Clone + Send,
  V: Send + Sync,
{
  fn get(&mut self, key: &K) -> Option<&mut CacheEntry<V>> {
    let freq = self.items.get(key)?.freq;
    let next = freq + 1;

    self.unlink_from_bucket(key, freq);
    if self.min_freq == freq && !self.buckets.contains_key(&freq) {
      // The old minimum bucket drained; its sole successor is the bucket
      // this key is about to occupy.
      self.min_freq = next;
    }
    self
      .buckets
      .entry(next)
      .or_insert_with(KeyList::new)
      .push_front(key.clone());

    let slot = self.items.get_mut(key)?;
    slot.freq = next;
    Some(&mut slot.entry)
  }

  fn peek(&self, key: &K) -> Option<&CacheEntry<V>> {
    self.items.get(key).map(|slot| &slot.entry)
  }

  fn set(&mut self, key: K, entry: CacheEntry<V>) -> SetOutcome<K, V> {
    if let Some(slot) = self.items.get_mut(&key) {
      // Preserve the access count; a write refreshes the key's position
      // within its bucket but is not a fresh insertion.
      let old = mem::replace(&mut slot.entry, entry);
      let freq = slot.freq;
      if let Some(bucket) = self.buckets.get_mut(&freq) {
        bucket.push_front(key);
      }
      return SetOutcome::replaced(old);
    }

    self.min_freq = 1;
    self
      .buckets
      .entry(1)
      .or_insert_with(KeyList::new)
      .push_front(key.clone());
    self.items.insert(key, LfuSlot { freq: 1, entry });
    SetOutcome::inserted()
  }

  fn remove(&mut self, key: &K) -> Option<CacheEntry<V>> {
    let slot = self.items.remove(key)?;
    self.unlink_from_bucket(key, slot.freq);
    Some(slot.entry)
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
    if self.items.is_empty() {
      return None;
    }
    // Advance past buckets drained by promotions and removals. Every item
    // sits in exactly one bucket, so this terminates.
    while !self.buckets.contains_key(&self.min_freq) {
      self.min_freq += 1;
    }

    let bucket = self.buckets.get_mut(&self.min_freq)?;
    let key = bucket.pop_back()?;
    if bucket.is_empty() {
      self.buckets.remove(&self.min_freq);
    }
    let slot = self.items.remove(&key)?;
    Some((key, slot.entry))
  }

  fn clear(&mut self) {
    self.items.clear();
    self.buckets.clear();
    self.min_freq = 1;
  }
}
