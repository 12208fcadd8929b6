use criterion::{black_box, criterion_group, criterion_main, Criterion};

use polycache::{CacheBuilder, EvictionPolicy};

fn bench_set_get(c: &mut Criterion) {
  let mut group = c.benchmark_group("set_get");
  for policy in [
    EvictionPolicy::Simple,
    EvictionPolicy::Lru,
    EvictionPolicy::Lfu,
    EvictionPolicy::Arc,
  ] {
    group.bench_function(policy.to_string(), |b| {
      let cache = CacheBuilder::new(1024).policy(policy).build().unwrap();
      let mut i: usize = 0;
      b.iter(|| {
        cache.set(i % 2048, i);
        black_box(cache.get(&((i / 2) % 2048)).ok());
        i = i.wrapping_add(1);
      });
    });
  }
  group.finish();
}

fn bench_hit_heavy_get(c: &mut Criterion) {
  let mut group = c.benchmark_group("get_hot");
  for policy in [EvictionPolicy::Lru, EvictionPolicy::Lfu, EvictionPolicy::Arc] {
    group.bench_function(policy.to_string(), |b| {
      let cache = CacheBuilder::new(1024).policy(policy).build().unwrap();
      for i in 0..1024usize {
        cache.set(i, i);
      }
      let mut i: usize = 0;
      b.iter(|| {
        black_box(cache.get(&(i % 1024)).ok());
        i = i.wrapping_add(1);
      });
    });
  }
  group.finish();
}

criterion_group!(benches, bench_set_get, bench_hit_heavy_get);
criterion_main!(benches);
