use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

/// Thread-safe counters for cache activity.
/// All fields are atomic so outcomes can be recorded without extending the
/// instance lock's scope.
#[derive(Debug, Default)]
pub(crate) struct Stats {
  // --- Hit/Miss Ratio ---
  pub(crate) hits: CachePadded<AtomicU64>,
  pub(crate) misses: CachePadded<AtomicU64>,

  // --- Throughput ---
  pub(crate) inserts: CachePadded<AtomicU64>,
  pub(crate) evictions: CachePadded<AtomicU64>,
  pub(crate) expirations: CachePadded<AtomicU64>,

  // --- Loader Activity ---
  pub(crate) loads: CachePadded<AtomicU64>,
  pub(crate) load_failures: CachePadded<AtomicU64>,
}

impl Stats {
  #[inline]
  pub(crate) fn record_hit(&self) {
    self.hits.fetch_add(1, Ordering::Relaxed);
  }

  #[inline]
  pub(crate) fn record_miss(&self) {
    self.misses.fetch_add(1, Ordering::Relaxed);
  }

  #[inline]
  pub(crate) fn record_insert(&self) {
    self.inserts.fetch_add(1, Ordering::Relaxed);
  }

  #[inline]
  pub(crate) fn record_evictions(&self, count: u64) {
    self.evictions.fetch_add(count, Ordering::Relaxed);
  }

  #[inline]
  pub(crate) fn record_expirations(&self, count: u64) {
    self.expirations.fetch_add(count, Ordering::Relaxed);
  }

  #[inline]
  pub(crate) fn record_load(&self) {
    self.loads.fetch_add(1, Ordering::Relaxed);
  }

  #[inline]
  pub(crate) fn record_load_failure(&self) {
    self.load_failures.fetch_add(1, Ordering::Relaxed);
  }

  /// Fraction of lookups answered from the cache. `0.0` before the first
  /// lookup.
  pub(crate) fn hit_rate(&self) -> f64 {
    let hits = self.hits.load(Ordering::Relaxed);
    let misses = self.misses.load(Ordering::Relaxed);
    let lookups = hits + misses;
    if lookups == 0 {
      0.0
    } else {
      hits as f64 / lookups as f64
    }
  }

  /// Creates a point-in-time snapshot of the current counters.
  pub(crate) fn snapshot(&self) -> StatsSnapshot {
    let hits = self.hits.load(Ordering::Relaxed);
    let misses = self.misses.load(Ordering::Relaxed);
    let lookups = hits + misses;

    StatsSnapshot {
      hits,
      misses,
      hit_rate: if lookups == 0 {
        0.0
      } else {
        hits as f64 / lookups as f64
      },
      inserts: self.inserts.load(Ordering::Relaxed),
      evictions: self.evictions.load(Ordering::Relaxed),
      expirations: self.expirations.load(Ordering::Relaxed),
      loads: self.loads.load(Ordering::Relaxed),
      load_failures: self.load_failures.load(Ordering::Relaxed),
    }
  }
}

/// A point-in-time, public-facing view of a cache's counters.
#[derive(Clone, PartialEq)]
pub struct StatsSnapshot {
  /// The number of lookups answered with a live entry.
  pub hits: u64,
  /// The number of lookups that found nothing, or only an expired entry.
  pub misses: u64,
  /// `hits / (hits + misses)`, or `0.0` when no lookups have happened.
  pub hit_rate: f64,
  /// The number of new keys written.
  pub inserts: u64,
  /// The number of entries removed to bring the cache back under capacity.
  pub evictions: u64,
  /// The number of entries purged because their TTL elapsed.
  pub expirations: u64,
  /// The number of successful loader invocations.
  pub loads: u64,
  /// The number of failed loader invocations.
  pub load_failures: u64,
}

impl fmt::Debug for StatsSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StatsSnapshot")
      .field("hits", &self.hits)
      .field("misses", &self.misses)
      .field("hit_rate", &format!("{:.2}%", self.hit_rate * 100.0))
      .field("inserts", &self.inserts)
      .field("evictions", &self.evictions)
      .field("expirations", &self.expirations)
      .field("loads", &self.loads)
      .field("load_failures", &self.load_failures)
      .finish()
  }
}
