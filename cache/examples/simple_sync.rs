//! Basic synchronous usage: build an LRU cache, fill it past capacity, and
//! watch the eviction order.

use polycache::CacheBuilder;

fn main() {
  let cache = CacheBuilder::new(3)
    .lru()
    .build()
    .expect("a positive capacity is a valid configuration");

  for (key, value) in [("a", 1), ("b", 2), ("c", 3)] {
    cache.set(key, value);
  }

  // Touch "a" so "b" becomes the least recently used entry.
  let _ = cache.get(&"a");
  cache.set("d", 4);

  for key in ["a", "b", "c", "d"] {
    match cache.get(&key) {
      Ok(value) => println!("{key} => {value}"),
      Err(err) => println!("{key} => ({err})"),
    }
  }

  println!("hit rate: {:.2}", cache.hit_rate());
}
