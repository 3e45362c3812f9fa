//! Performance benchmarks for census-kit
//!
//! This benchmark suite measures:
//! - TimedBoundedCache operations (set, get, eviction) across capacities
//! - Client lookups per cache strategy against the in-memory source
//! - Record to entity mapping
//!
//! Run with: cargo bench
//! View results: open target/criterion/report/index.html

use census_kit::ps2::Weapon;
use census_kit::source::InMemorySource;
use census_kit::{CacheConfig, CacheStrategy, CensusEntity, Client, Record, TimedBoundedCache};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use std::hint::black_box;
use std::time::Duration;

// ============================================================================
// Benchmark Fixtures
// ============================================================================

fn weapon_record(id: i64) -> Record {
    Record::from_value(json!({
        "weapon_id": id.to_string(),
        "weapon_group_id": "12",
        "turn_modifier": "1",
        "move_modifier": "0.9",
        "sprint_recovery_ms": "450",
        "equip_ms": "750",
        "unequip_ms": "250",
        "to_iron_sights_ms": "300",
        "from_iron_sights_ms": "300",
        "heat_capacity": "1000",
        "heat_bleed_off_rate": "150",
    }))
    .expect("Fixture must be an object")
}

fn armory(count: i64) -> InMemorySource {
    let source = InMemorySource::new();
    for id in 0..count {
        source.insert("weapon", weapon_record(id));
    }
    source
}

const TTU: Duration = Duration::from_secs(3600);

// ============================================================================
// Group 1: TimedBoundedCache Benchmarks
// ============================================================================

fn cache_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("timed_bounded_cache");

    // tokio's clock needs a runtime context when test-util is enabled
    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    let _guard = rt.enter();

    for capacity in [16usize, 128, 1_024].iter() {
        // SET with a working set larger than capacity, so every set evicts
        group.bench_with_input(
            BenchmarkId::new("set_evicting", capacity),
            capacity,
            |b, &capacity| {
                let mut cache = TimedBoundedCache::new(capacity, TTU);
                let mut key = 0u64;
                b.iter(|| {
                    key += 1;
                    cache.set(black_box(key), black_box(key))
                });
            },
        );

        // GET hit, cycling through a full cache
        group.bench_with_input(
            BenchmarkId::new("get_hit", capacity),
            capacity,
            |b, &capacity| {
                let mut cache = TimedBoundedCache::new(capacity, TTU);
                for key in 0..capacity as u64 {
                    cache.set(key, key);
                }
                let mut key = 0u64;
                b.iter(|| {
                    key = (key + 1) % capacity as u64;
                    cache.get(black_box(&key))
                });
            },
        );
    }

    // GET miss - capacity doesn't matter for misses
    group.bench_function("get_miss", |b| {
        let mut cache: TimedBoundedCache<u64, u64> = TimedBoundedCache::new(128, TTU);
        b.iter(|| cache.get(black_box(&42)));
    });

    group.finish();
}

// ============================================================================
// Group 2: Client Strategy Benchmarks
// ============================================================================

fn client_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("client");

    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    // Refresh strategy - CACHE HIT
    // Measures: registry lookup + cache get
    group.bench_function("refresh_hit", |b| {
        let client = Client::new(armory(1));
        rt.block_on(async {
            client.get::<Weapon>(0).await.expect("Failed to populate cache");
        });

        b.to_async(&rt)
            .iter(|| async { client.get::<Weapon>(black_box(0)).await });
    });

    // Refresh strategy - CACHE MISS
    // Measures: source fetch + record mapping + cache store (capacity 0)
    group.bench_function("refresh_miss", |b| {
        let client = Client::builder(armory(1))
            .with_cache_config::<Weapon>(CacheConfig::disabled())
            .build();

        b.to_async(&rt)
            .iter(|| async { client.get::<Weapon>(black_box(0)).await });
    });

    // Invalidate strategy
    // Measures: cache remove + source fetch + cache store
    group.bench_function("invalidate", |b| {
        let client = Client::new(armory(1));

        b.to_async(&rt).iter(|| async {
            client
                .get_with::<Weapon>(black_box(0), black_box(CacheStrategy::Invalidate))
                .await
        });
    });

    // Fresh strategy - cache hit
    group.bench_function("fresh_hit", |b| {
        let client = Client::new(armory(1));
        rt.block_on(async {
            client.get::<Weapon>(0).await.expect("Failed to populate cache");
        });

        b.to_async(&rt).iter(|| async {
            client
                .get_with::<Weapon>(black_box(0), black_box(CacheStrategy::Fresh))
                .await
        });
    });

    // Batch lookup of a fully cached working set
    group.bench_function("get_many_hit_64", |b| {
        let client = Client::new(armory(64));
        let ids: Vec<i64> = (0..64).collect();
        rt.block_on(async {
            client.get_many::<Weapon>(&ids).await.expect("Failed to populate cache");
        });

        b.to_async(&rt)
            .iter(|| async { client.get_many::<Weapon>(black_box(&ids)).await });
    });

    group.finish();
}

// ============================================================================
// Group 3: Record Mapping Benchmarks
// ============================================================================

fn record_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");

    let record = weapon_record(80);
    group.bench_function("weapon_from_record", |b| {
        b.iter(|| Weapon::from_record(black_box(&record)));
    });

    let payload = serde_json::to_value(&record).expect("Failed to encode record");
    group.bench_function("record_from_value", |b| {
        b.iter(|| Record::from_value(black_box(payload.clone())));
    });

    group.finish();
}

// ============================================================================
// Benchmark Registration
// ============================================================================

criterion_group!(benches, cache_benchmarks, client_benchmarks, record_benchmarks);
criterion_main!(benches);
