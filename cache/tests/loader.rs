mod common;

use common::{build_loading_cache, key, loaded_value, ALL_POLICIES};
use polycache::{CacheBuilder, CacheError, EvictionPolicy};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn get_loads_missing_keys_and_caches_the_result() {
  for policy in ALL_POLICIES {
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = {
      let calls = calls.clone();
      CacheBuilder::new(8)
        .policy(policy)
        .loader(move |k: &String| {
          calls.fetch_add(1, Ordering::SeqCst);
          Ok(loaded_value(k))
        })
        .build()
        .unwrap()
    };

    // First read loads, second is served from the cache.
    assert_eq!(*cache.get(&key(1)).unwrap(), loaded_value(&key(1)));
    assert_eq!(*cache.get(&key(1)).unwrap(), loaded_value(&key(1)));
    assert_eq!(calls.load(Ordering::SeqCst), 1, "policy {policy}");

    let stats = cache.stats();
    assert_eq!(stats.misses, 1, "policy {policy}: the load was a miss");
    assert_eq!(stats.hits, 1, "policy {policy}");
    assert_eq!(stats.loads, 1, "policy {policy}");
  }
}

#[test]
fn loader_errors_propagate_and_cache_nothing() {
  let calls = Arc::new(AtomicUsize::new(0));
  let cache: polycache::Cache<String, String> = {
    let calls = calls.clone();
    CacheBuilder::new(8)
      .lru()
      .loader(move |_: &String| {
        calls.fetch_add(1, Ordering::SeqCst);
        Err("backend down".into())
      })
      .build()
      .unwrap()
  };

  assert!(matches!(cache.get(&key(1)), Err(CacheError::Loader(_))));
  assert_eq!(cache.len(false), 0, "a failed load writes nothing");

  // No internal retry: each explicit call invokes the loader once.
  assert!(cache.get(&key(1)).is_err());
  assert_eq!(calls.load(Ordering::SeqCst), 2);
  assert_eq!(cache.stats().load_failures, 2);
}

#[test]
fn get_if_present_misses_immediately_and_populates_in_the_background() {
  for policy in ALL_POLICIES {
    let cache = build_loading_cache(policy, 8);

    let err = cache
      .get_if_present(&key(1))
      .expect_err("the first call must not wait for the loader");
    assert!(err.is_not_found(), "policy {policy}");

    // Join the background load instead of sleeping.
    let loaded = cache.wait_for_load(&key(1)).expect("load should succeed");
    assert_eq!(*loaded, loaded_value(&key(1)), "policy {policy}");

    // The repeated call now observes the populated value.
    assert_eq!(
      *cache.get_if_present(&key(1)).expect("now populated"),
      loaded_value(&key(1)),
      "policy {policy}"
    );
  }
}

#[test]
fn get_if_present_without_a_loader_just_misses() {
  let cache = common::build_cache(EvictionPolicy::Lru, 8);
  assert!(cache.get_if_present(&key(1)).is_err());
  // Nothing was scheduled, so waiting falls back to a plain lookup.
  assert!(matches!(
    cache.wait_for_load(&key(1)),
    Err(CacheError::KeyNotFound)
  ));
}

#[test]
fn concurrent_misses_share_one_background_load() {
  let calls = Arc::new(AtomicUsize::new(0));
  let cache = {
    let calls = calls.clone();
    CacheBuilder::new(8)
      .lru()
      .loader(move |k: &String| {
        calls.fetch_add(1, Ordering::SeqCst);
        // A slow backend, so the second miss lands mid-flight.
        thread::sleep(Duration::from_millis(50));
        Ok(loaded_value(k))
      })
      .build()
      .unwrap()
  };

  assert!(cache.get_if_present(&key(1)).is_err());
  assert!(cache.get_if_present(&key(1)).is_err());

  let waiters: Vec<_> = (0..4)
    .map(|_| {
      let cache = cache.clone();
      thread::spawn(move || cache.wait_for_load(&key(1)).map(|v| (*v).clone()))
    })
    .collect();
  for waiter in waiters {
    let outcome = waiter.join().expect("waiter thread panicked");
    assert_eq!(outcome.ok().as_deref(), Some(loaded_value(&key(1)).as_str()));
  }

  assert_eq!(
    calls.load(Ordering::SeqCst),
    1,
    "duplicate misses must not spawn duplicate loads"
  );
}

#[test]
fn background_load_failures_reach_waiters_and_cache_nothing() {
  let cache: polycache::Cache<String, String> = CacheBuilder::new(8)
    .lru()
    .loader(|_: &String| Err("backend down".into()))
    .build()
    .unwrap();

  assert!(cache.get_if_present(&key(1)).is_err());
  assert!(matches!(
    cache.wait_for_load(&key(1)),
    Err(CacheError::Loader(_)) | Err(CacheError::KeyNotFound)
  ));
  assert_eq!(cache.len(false), 0);

  // A later miss schedules a fresh load; failures are not sticky.
  assert!(cache.get_if_present(&key(1)).is_err());
}

#[test]
fn wait_for_load_returns_the_cached_value_when_nothing_is_in_flight() {
  let cache = build_loading_cache(EvictionPolicy::Lru, 8);
  cache.set(key(1), "direct".to_string());
  assert_eq!(*cache.wait_for_load(&key(1)).unwrap(), "direct");
}
