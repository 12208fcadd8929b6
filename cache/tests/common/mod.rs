#![allow(dead_code)]

use polycache::{Cache, CacheBuilder, EvictionPolicy};

pub const ALL_POLICIES: [EvictionPolicy; 4] = [
  EvictionPolicy::Simple,
  EvictionPolicy::Lru,
  EvictionPolicy::Lfu,
  EvictionPolicy::Arc,
];

/// The policies that actually evict; `Simple` treats capacity as advisory.
pub const EVICTING_POLICIES: [EvictionPolicy; 3] = [
  EvictionPolicy::Lru,
  EvictionPolicy::Lfu,
  EvictionPolicy::Arc,
];

pub fn key(i: usize) -> String {
  format!("key-{i}")
}

pub fn value(i: usize) -> String {
  format!("value-{i}")
}

pub fn loaded_value(key: &str) -> String {
  format!("value-for-{key}")
}

pub fn build_cache(policy: EvictionPolicy, capacity: usize) -> Cache<String, String> {
  CacheBuilder::new(capacity)
    .policy(policy)
    .build()
    .expect("valid configuration")
}

pub fn build_loading_cache(policy: EvictionPolicy, capacity: usize) -> Cache<String, String> {
  CacheBuilder::new(capacity)
    .policy(policy)
    .loader(|key: &String| Ok(loaded_value(key)))
    .build()
    .expect("valid configuration")
}
