mod common;

use common::{key, value, ALL_POLICIES};
use polycache::{CacheBuilder, EvictionPolicy};

use std::thread;
use std::time::Duration;

const TTL: Duration = Duration::from_millis(30);

fn sleep_past_ttl() {
  thread::sleep(TTL + Duration::from_millis(30));
}

fn build_ttl_cache(policy: EvictionPolicy, capacity: usize) -> polycache::Cache<String, String> {
  CacheBuilder::new(capacity)
    .policy(policy)
    .time_to_live(TTL)
    .build()
    .expect("valid configuration")
}

#[test]
fn entries_expire_after_the_ttl() {
  for policy in ALL_POLICIES {
    let cache = build_ttl_cache(policy, 8);
    cache.set(key(1), value(1));
    assert_eq!(cache.len(true), 1, "policy {policy}");

    sleep_past_ttl();

    assert_eq!(
      cache.len(false),
      1,
      "policy {policy}: stale entries are visible until purged"
    );
    assert_eq!(cache.len(true), 0, "policy {policy}");
    assert!(cache.get(&key(1)).is_err(), "policy {policy}");
  }
}

#[test]
fn expired_entries_are_filtered_from_enumeration() {
  for policy in ALL_POLICIES {
    let cache = build_ttl_cache(policy, 8);
    for i in 0..4 {
      cache.set(key(i), value(i));
    }
    assert_eq!(cache.keys(true).len(), 4, "policy {policy}");
    assert_eq!(cache.get_all(true).len(), 4, "policy {policy}");

    sleep_past_ttl();

    assert_eq!(
      cache.keys(false).len(),
      4,
      "policy {policy}: unchecked enumeration sees stale entries"
    );
    assert_eq!(cache.keys(true).len(), 0, "policy {policy}");
    assert_eq!(cache.get_all(true).len(), 0, "policy {policy}");
    assert_eq!(cache.len(true), 0, "policy {policy}");
  }
}

#[test]
fn a_cache_stays_usable_after_everything_expires() {
  for policy in ALL_POLICIES {
    let cache = build_ttl_cache(policy, 8);
    for i in 0..4 {
      cache.set(key(i), value(i));
    }
    sleep_past_ttl();
    assert_eq!(cache.len(true), 0, "policy {policy}");

    cache.set(key(1), value(1));
    let all = cache.get_all(true);
    assert_eq!(all.len(), 1, "policy {policy}");
    assert_eq!(
      all.get(&key(1)).map(|v| (**v).clone()),
      Some(value(1)),
      "policy {policy}"
    );
    assert_eq!(cache.len(true), 1, "policy {policy}");
  }
}

#[test]
fn get_on_an_expired_key_reinvokes_the_loader() {
  let cache = CacheBuilder::new(8)
    .lru()
    .time_to_live(TTL)
    .loader(|k: &String| Ok(format!("loaded-{k}")))
    .build()
    .unwrap();

  cache.set(key(1), "original".to_string());
  assert_eq!(*cache.get(&key(1)).unwrap(), "original");

  sleep_past_ttl();

  // The stale value is gone; the miss falls through to the loader.
  assert_eq!(*cache.get(&key(1)).unwrap(), format!("loaded-{}", key(1)));
  let stats = cache.stats();
  assert_eq!(stats.loads, 1);
  assert_eq!(stats.expirations, 1);
}

#[test]
fn set_refreshes_the_expiration_deadline() {
  let cache = build_ttl_cache(EvictionPolicy::Lru, 8);
  cache.set(key(1), value(1));

  // Keep rewriting before the deadline; the entry must stay live.
  for _ in 0..3 {
    thread::sleep(TTL / 2);
    cache.set(key(1), value(2));
  }
  assert!(cache.has(&key(1)), "rewrites push the deadline out");
}

#[test]
fn set_with_expire_overrides_the_cache_wide_ttl() {
  // No cache-wide TTL at all: only the explicit deadline applies.
  let cache: polycache::Cache<String, String> =
    CacheBuilder::new(8).lru().build().unwrap();
  cache.set(key(1), value(1));
  cache.set_with_expire(key(2), value(2), TTL);

  sleep_past_ttl();

  assert!(cache.has(&key(1)), "no TTL means no expiration");
  assert!(!cache.has(&key(2)), "the explicit deadline has passed");
}

#[test]
fn set_with_expire_can_outlive_a_short_cache_ttl() {
  let cache = CacheBuilder::new(8)
    .lru()
    .time_to_live(TTL)
    .build()
    .unwrap();
  cache.set(key(1), value(1));
  cache.set_with_expire(key(2), value(2), Duration::from_secs(60));

  sleep_past_ttl();

  assert!(!cache.has(&key(1)));
  assert!(cache.has(&key(2)), "the per-entry deadline wins");
}
