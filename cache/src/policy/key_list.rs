use std::collections::HashMap;
use std::hash::Hash;

use generational_arena::{Arena, Index};

#[derive(Debug)]
struct Node<K> {
  key: K,
  next: Option<Index>,
  prev: Option<Index>,
}

/// A doubly-linked list of keys with O(1) membership, promotion and removal.
///
/// This is the ordering structure behind the LRU recency list, both ARC live
/// lists, both ARC ghost lists, and every LFU frequency bucket. The front is
/// the most-recently-touched end; `pop_back` takes the oldest key.
#[derive(Debug)]
pub(crate) struct KeyList<K: Eq + Hash + Clone> {
  // Arena stores all nodes contiguously.
  nodes: Arena<Node<K>>,
  // O(1) lookup of a key to its node index in the arena.
  lookup: HashMap<K, Index, ahash::RandomState>,
  head: Option<Index>,
  tail: Option<Index>,
}

impl<K: Eq + Hash + Clone> KeyList<K> {
  pub(crate) fn new() -> Self {
    Self {
      nodes: Arena::new(),
      lookup: HashMap::default(),
      head: None,
      tail: None,
    }
  }

  // Unlink a node from the chain without touching the arena or lookup map.
  fn unlink(&mut self, index: Index) {
    let node = &self.nodes[index];
    let prev_idx = node.prev;
    let next_idx = node.next;

    if let Some(prev) = prev_idx {
      self.nodes[prev].next = next_idx;
    } else {
      self.head = next_idx;
    }

    if let Some(next) = next_idx {
      self.nodes[next].prev = prev_idx;
    } else {
      self.tail = prev_idx;
    }
  }

  // Make an already-allocated node the new head.
  fn link_front(&mut self, index: Index) {
    let old_head = self.head;
    self.nodes[index].next = old_head;
    self.nodes[index].prev = None;
    self.head = Some(index);

    if let Some(old_head) = old_head {
      self.nodes[old_head].prev = Some(index);
    }
    if self.tail.is_none() {
      self.tail = Some(index);
    }
  }

  pub(crate) fn len(&self) -> usize {
    self.lookup.len()
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.lookup.is_empty()
  }

  pub(crate) fn contains(&self, key: &K) -> bool {
    self.lookup.contains_key(key)
  }

  /// Inserts `key` at the front, or moves it there if already present.
  pub(crate) fn push_front(&mut self, key: K) {
    if self.lookup.contains_key(&key) {
      self.move_to_front(&key);
      return;
    }
    let index = self.nodes.insert(Node {
      key: key.clone(),
      next: None,
      prev: None,
    });
    self.lookup.insert(key, index);
    self.link_front(index);
  }

  /// Moves `key` to the front. Absent keys are left alone.
  pub(crate) fn move_to_front(&mut self, key: &K) {
    if let Some(&index) = self.lookup.get(key) {
      if self.head != Some(index) {
        self.unlink(index);
        self.link_front(index);
      }
    }
  }

  /// Removes and returns the oldest key.
  pub(crate) fn pop_back(&mut self) -> Option<K> {
    let tail_index = self.tail?;
    let key = self.nodes[tail_index].key.clone();
    self.remove(&key);
    Some(key)
  }

  /// Removes `key` from the list. Returns whether it was present.
  pub(crate) fn remove(&mut self, key: &K) -> bool {
    match self.lookup.remove(key) {
      Some(index) => {
        self.unlink(index);
        self.nodes.remove(index).is_some()
      }
      None => false,
    }
  }

  pub(crate) fn clear(&mut self) {
    self.nodes.clear();
    self.lookup.clear();
    self.head = None;
    self.tail = None;
  }

  /// Iterates keys from the front (newest) to the back (oldest).
  pub(crate) fn iter(&self) -> Iter<'_, K> {
    Iter {
      list: self,
      next: self.head,
    }
  }
}

pub(crate) struct Iter<'a, K: Eq + Hash + Clone> {
  list: &'a KeyList<K>,
  next: Option<Index>,
}

impl<'a, K: Eq + Hash + Clone> Iterator for Iter<'a, K> {
  type Item = &'a K;

  fn next(&mut self) -> Option<Self::Item> {
    let index = self.next?;
    let node = &self.list.nodes[index];
    self.next = node.next;
    Some(&node.key)
  }
}
