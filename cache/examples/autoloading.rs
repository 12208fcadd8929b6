//! An autoloading cache: misses are populated by the configured loader, so
//! callers never see `KeyNotFound` unless the loader itself fails.

use polycache::CacheBuilder;

fn main() {
  let cache = CacheBuilder::new(10)
    .lfu()
    .loader(|key: &String| Ok(format!("{key}-value")))
    .build()
    .expect("a positive capacity is a valid configuration");

  let value = cache.get(&"key".to_string()).expect("the loader is infallible");
  println!("{value}");

  // The second read is served from the cache without another load.
  let again = cache.get(&"key".to_string()).expect("now cached");
  println!("{again} (hit rate {:.2})", cache.hit_rate());
}
