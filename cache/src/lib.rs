//! An in-process key/value cache with interchangeable eviction policies.
//!
//! # Features
//! - **Four policies**, selected per instance at build time: unbounded
//!   `Simple`, `Lru`, `Lfu`, and `Arc` (adaptive replacement with
//!   ghost-list history and scan resistance).
//! - **TTL expiration**: lazy, checked on access and enumeration, with
//!   per-entry overrides via `set_with_expire`.
//! - **Autoloading**: a loader closure populates missing keys. `get` loads
//!   synchronously; `get_if_present` schedules a deduplicated background
//!   load and returns immediately.
//! - **Eviction notifications**: a listener observes capacity evictions and
//!   expiration purges, with the reason attached.
//! - **Statistics**: hit/miss counters and derived hit rate.
//!
//! Values are handed out as `Arc<V>`, so `V` never needs to be `Clone`.
//! A [`Cache`] handle is itself cheap to clone and safe to share across
//! threads.
//!
//! ```
//! use polycache::{CacheBuilder, EvictionPolicy};
//!
//! let cache = CacheBuilder::new(2)
//!   .policy(EvictionPolicy::Lru)
//!   .build()
//!   .unwrap();
//!
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.set("c", 3); // "a" is the LRU entry and gets evicted
//!
//! assert_eq!(*cache.get(&"b").unwrap(), 2);
//! assert!(cache.get(&"a").is_err());
//! ```

// Public modules that form the API
pub mod builder;
pub mod error;
pub mod listener;
pub mod policy;
pub mod stats;

// Internal, crate-only modules
mod cache;
mod entry;
mod loader;
mod time;

// Re-export the primary user-facing types for convenience
pub use builder::CacheBuilder;
pub use cache::Cache;
pub use error::{BuildError, CacheError};
pub use listener::{EvictionListener, EvictionReason};
pub use loader::LoaderError;
pub use policy::EvictionPolicy;
pub use stats::StatsSnapshot;
