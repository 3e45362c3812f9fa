//! Observability hooks for entity resolution.
//!
//! Implement [`CacheMetrics`] to feed cache and fetch statistics into your
//! monitoring system:
//!
//! ```no_run
//! # #[cfg(feature = "inmemory")]
//! # fn example() {
//! use census_kit::observability::CacheMetrics;
//! use census_kit::source::InMemorySource;
//! use census_kit::Client;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str) {
//!         // counter!("census_cache_hits").inc();
//!     }
//!     fn record_fetch(&self, _key: &str, _duration: Duration) {
//!         // histogram!("census_fetch_latency").record(duration);
//!     }
//! }
//!
//! let client = Client::builder(InMemorySource::new())
//!     .with_metrics(Box::new(PrometheusMetrics))
//!     .build();
//! # let _ = client;
//! # }
//! ```
//!
//! Keys have the form `"{collection}:{id}"` for direct lookups and the
//! rendered query for join resolutions. Unless overridden, the client uses
//! [`NoOpMetrics`]; the trait's default bodies log through the `log` crate.

use std::time::Duration;

/// Trait for resolution metrics collection.
pub trait CacheMetrics: Send + Sync {
    /// An entity was served from cache.
    fn record_hit(&self, key: &str) {
        debug!("Cache HIT: {}", key);
    }

    /// A cache lookup found nothing live.
    fn record_miss(&self, key: &str) {
        debug!("Cache MISS: {}", key);
    }

    /// A collaborator round trip completed.
    fn record_fetch(&self, key: &str, duration: Duration) {
        debug!("Census FETCH: {} took {:?}", key, duration);
    }

    /// A direct fetch returned no record.
    fn record_not_found(&self, key: &str) {
        debug!("Census NOT FOUND: {}", key);
    }

    /// A fetch or schema mapping failed.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Census ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str) {}
    fn record_miss(&self, _key: &str) {}
    fn record_fetch(&self, _key: &str, _duration: Duration) {}
    fn record_not_found(&self, _key: &str) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

/// Metrics that only log, using the trait's default bodies.
#[derive(Clone, Default)]
pub struct LogMetrics;

impl CacheMetrics for LogMetrics {}
