use super::key_list::KeyList;
use super::{PolicyStore, SetOutcome};
use crate::entry::CacheEntry;

use std::collections::HashMap;
use std::hash::Hash;

/// A store running the Adaptive Replacement Cache algorithm.
///
/// Four lists share the directory: T1 holds entries seen once, T2 entries
/// seen at least twice, and B1/B2 are ghost lists remembering keys recently
/// evicted from T1/T2 without their values. The target size of T1 is `p`;
/// a hit in B1 grows `p` (recency is paying off), a hit in B2 shrinks it.
/// One-time scans pass through T1 and its ghosts without ever displacing
/// the frequent set in T2, which is what makes ARC scan-resistant.
#[derive(Debug)]
pub(crate) struct ArcStore<K: Eq + Hash + Clone, V> {
  capacity: usize,
  // Target size of T1, adapted in [0, capacity].
  p: usize,
  t1: KeyList<K>,
  t2: KeyList<K>,
  b1: KeyList<K>,
  b2: KeyList<K>,
  // Values for the keys in T1 ∪ T2. Ghost keys carry no value.
  items: HashMap<K, CacheEntry<V>, ahash::RandomState>,
}

impl<K: Eq + Hash + Clone, V> ArcStore<K, V> {
  pub(crate) fn new(capacity: usize) -> Self {
    Self {
      capacity,
      p: 0,
      t1: KeyList::new(),
      t2: KeyList::new(),
      b1: KeyList::new(),
      b2: KeyList::new(),
      items: HashMap::with_capacity_and_hasher(capacity, ahash::RandomState::default()),
    }
  }

  // Move a live key to the MRU end of T2, wherever it currently sits.
  fn promote(&mut self, key: &K) {
    if self.t1.remove(key) {
      self.t2.push_front(key.clone());
    } else {
      self.t2.move_to_front(key);
    }
  }

  // The standard ARC replacement rule: sacrifice the LRU end of T1 into B1
  // when T1 runs over its target (or exactly meets it on a B2 hit),
  // otherwise the LRU end of T2 into B2. Ghost lists stay within capacity.
  fn replace(&mut self, key_in_b2: bool) -> Option<(K, CacheEntry<V>)> {
    let prefer_t1 = !self.t1.is_empty()
      && (self.t1.len() > self.p || (key_in_b2 && self.t1.len() == self.p));

    let (victim, ghost) = if prefer_t1 {
      (self.t1.pop_back(), &mut self.b1)
    } else if !self.t2.is_empty() {
      (self.t2.pop_back(), &mut self.b2)
    } else {
      (self.t1.pop_back(), &mut self.b1)
    };

    let victim = victim?;
    ghost.push_front(victim.clone());
    if ghost.len() > self.capacity {
      ghost.pop_back();
    }
    let entry = self.items.remove(&victim)?;
    Some((victim, entry))
  }

  // Replacement only runs while the live half of the directory is full;
  // under capacity there is nothing to sacrifice.
  fn replace_if_full(&mut self, key_in_b2: bool) -> Option<(K, CacheEntry<V>)> {
    if self.items.len() < self.capacity {
      return None;
    }
    self.replace(key_in_b2)
  }
}

impl<K, V> PolicyStore<K, V> for ArcStore<K, V>
where
  K: Eq + Hash + Clone + Send,
  V: Send + Sync,
{
  fn get(&mut self, key: &K) -> Option<&mut CacheEntry<V>> {
    if !self.items.contains_key(key) {
      return None;
    }
    // A second sighting graduates the key from the recency list to the
    // frequency list.
    self.promote(key);
    self.items.get_mut(key)
  }

  fn peek(&self, key: &K) -> Option<&CacheEntry<V>> {
    self.items.get(key)
  }

  fn set(&mut self, key: K, entry: CacheEntry<V>) -> SetOutcome<K, V> {
    if self.items.contains_key(&key) {
      // Rewriting a live key counts as another sighting.
      self.promote(&key);
      return match self.items.insert(key, entry) {
        Some(old) => SetOutcome::replaced(old),
        None => SetOutcome::inserted(),
      };
    }

    if self.b1.contains(&key) {
      // Recency ghost hit: T1 was evicting keys we still wanted. Grow its
      // target by the ghost-list ratio, at least one step.
      let delta = (self.b2.len() / self.b1.len()).max(1);
      self.p = (self.p + delta).min(self.capacity);

      let evicted = self.replace_if_full(false);
      self.b1.remove(&key);
      self.t2.push_front(key.clone());
      self.items.insert(key, entry);
      return SetOutcome {
        replaced: None,
        evicted,
      };
    }

    if self.b2.contains(&key) {
      // Frequency ghost hit, symmetric: shrink T1's target.
      let delta = (self.b1.len() / self.b2.len()).max(1);
      self.p = self.p.saturating_sub(delta);

      let evicted = self.replace_if_full(true);
      self.b2.remove(&key);
      self.t2.push_front(key.clone());
      self.items.insert(key, entry);
      return SetOutcome {
        replaced: None,
        evicted,
      };
    }

    // True miss: the key is new to the whole directory.
    let evicted = if self.t1.len() + self.b1.len() >= self.capacity {
      if self.t1.len() < self.capacity {
        // The recency side is full of ghosts; forget the stalest one and
        // make room among the live entries.
        self.b1.pop_back();
        self.replace_if_full(false)
      } else {
        // B1 is empty and T1 alone fills the cache. Its LRU entry never
        // earned a second sighting, so it leaves without a ghost record.
        match self.t1.pop_back() {
          Some(victim) => self.items.remove(&victim).map(|e| (victim, e)),
          None => None,
        }
      }
    } else {
      let directory =
        self.t1.len() + self.t2.len() + self.b1.len() + self.b2.len();
      if directory >= self.capacity {
        if directory >= 2 * self.capacity {
          self.b2.pop_back();
        }
        self.replace_if_full(false)
      } else {
        None
      }
    };

    self.t1.push_front(key.clone());
    self.items.insert(key, entry);
    SetOutcome {
      replaced: None,
      evicted,
    }
  }

  fn remove(&mut self, key: &K) -> Option<CacheEntry<V>> {
    let entry = self.items.remove(key)?;
    if !self.t1.remove(key) {
      self.t2.remove(key);
    }
    Some(entry)
  }

  fn contains(&self, key: &K) -> bool {
    self.items.contains_key(key)
  }

  fn keys(&self) -> Vec<K> {
    self.t1.iter().chain(self.t2.iter()).cloned().collect()
  }

  fn len(&self) -> usize {
    self.items.len()
  }

  fn evict_one(&mut self) -> Option<(K, CacheEntry<V>)> {
    if self.items.is_empty() {
      return None;
    }
    self.replace(false)
  }

  fn clear(&mut self) {
    self.p = 0;
    self.t1.clear();
    self.t2.clear();
    self.b1.clear();
    self.b2.clear();
    self.items.clear();
  }
}
