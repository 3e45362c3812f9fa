//! Entity resolver - get-or-fetch-or-populate over the cache registry.
//!
//! For an entity type `T` and id `I`, [`Resolver::get`] produces a populated
//! `T`:
//!
//! 1. Look up `(T, I)` in the cache. A hit returns immediately, with no
//!    network activity.
//! 2. On a miss, fetch the record for `I` from the [`CensusSource`].
//! 3. No record: return `Ok(None)`. Nothing is cached, so a later call asks
//!    again.
//! 4. A record: build `T` from it, store it under `(T, I)`, return it.
//!
//! Failed fetches and schema errors propagate and cache nothing.
//!
//! Two concurrent lookups of the same uncached id may both fetch; the second
//! store simply replaces the first. Requests are not coalesced.

use crate::entity::CensusEntity;
use crate::error::{Error, Result};
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::query::Query;
use crate::registry::CacheRegistry;
use crate::source::CensusSource;
use crate::strategy::CacheStrategy;
use std::sync::Arc;
use std::time::Instant;

/// Core resolver - owns the source, the cache registry and the metrics hook.
///
/// Usually reached through a [`Client`](crate::client::Client), which wraps
/// it in an `Arc` for sharing.
pub struct Resolver<S: CensusSource> {
    source: S,
    caches: CacheRegistry,
    metrics: Box<dyn CacheMetrics>,
}

impl<S: CensusSource> Resolver<S> {
    /// Create a resolver with default cache configuration.
    pub fn new(source: S) -> Self {
        Resolver {
            source,
            caches: CacheRegistry::new(),
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Use a pre-configured cache registry.
    pub fn with_registry(mut self, caches: CacheRegistry) -> Self {
        self.caches = caches;
        self
    }

    /// Resolve `id` with the default [`CacheStrategy::Refresh`].
    ///
    /// # Errors
    ///
    /// - `Error::FetchError`: The source failed
    /// - `Error::SchemaError`: The record does not fit `T`
    pub async fn get<T: CensusEntity>(&self, id: &T::Id) -> Result<Option<Arc<T>>> {
        self.get_with(id, CacheStrategy::Refresh).await
    }

    /// Resolve `id` with an explicit strategy.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get). `Fresh` never fails on the network.
    pub async fn get_with<T: CensusEntity>(
        &self,
        id: &T::Id,
        strategy: CacheStrategy,
    ) -> Result<Option<Arc<T>>> {
        let key = T::cache_key(id);
        debug!("» Resolve {} (strategy: {})", key, strategy);

        match strategy {
            CacheStrategy::Fresh => self.cached::<T>(id, &key),
            CacheStrategy::Refresh => match self.cached::<T>(id, &key)? {
                Some(entity) => Ok(Some(entity)),
                None => self.fetch_and_store::<T>(id, &key).await,
            },
            CacheStrategy::Invalidate => {
                self.caches.remove::<T>(id)?;
                debug!("✓ Cache invalidated for {}", key);
                self.fetch_and_store::<T>(id, &key).await
            }
            CacheStrategy::Bypass => self.fetch_and_store::<T>(id, &key).await,
        }
    }

    /// Run a filter/join query and funnel its results through `T`'s cache.
    ///
    /// All records are mapped before anything is stored, so a schema error
    /// leaves the cache untouched.
    ///
    /// # Errors
    ///
    /// - `Error::FetchError`: The source failed
    /// - `Error::SchemaError`: A record does not fit `T`
    /// - `Error::Other`: The query does not target `T`'s collection
    pub async fn find<T: CensusEntity>(&self, query: &Query) -> Result<Vec<Arc<T>>> {
        if query.target_collection() != T::COLLECTION {
            return Err(Error::Other(format!(
                "query targets `{}` but `{}` was requested",
                query.target_collection(),
                T::COLLECTION
            )));
        }

        let key = query.to_string();
        let timer = Instant::now();
        let records = match self.source.fetch_by_join(query).await {
            Ok(records) => records,
            Err(e) => {
                self.metrics.record_error(&key, &e.to_string());
                return Err(e);
            }
        };
        self.metrics.record_fetch(&key, timer.elapsed());

        let entities = records
            .iter()
            .map(|record| T::from_record(record).map(Arc::new))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| {
                self.metrics.record_error(&key, &e.to_string());
                e
            })?;

        for entity in &entities {
            self.store(entity.id(), Arc::clone(entity))?;
        }

        debug!("✓ Query {} resolved {} entities", key, entities.len());
        Ok(entities)
    }

    fn cached<T: CensusEntity>(&self, id: &T::Id, key: &str) -> Result<Option<Arc<T>>> {
        let hit = self.caches.get::<T>(id)?;
        match &hit {
            Some(_) => self.metrics.record_hit(key),
            None => self.metrics.record_miss(key),
        }
        Ok(hit)
    }

    async fn fetch_and_store<T: CensusEntity>(
        &self,
        id: &T::Id,
        key: &str,
    ) -> Result<Option<Arc<T>>> {
        let timer = Instant::now();
        let fetched = self
            .source
            .fetch_by_id(T::COLLECTION, T::ID_FIELD, &id.to_string())
            .await;
        let record = match fetched {
            Ok(record) => record,
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                return Err(e);
            }
        };
        self.metrics.record_fetch(key, timer.elapsed());

        let Some(record) = record else {
            self.metrics.record_not_found(key);
            debug!("Entity not found for {}", key);
            return Ok(None);
        };

        let entity = match T::from_record(&record) {
            Ok(entity) => Arc::new(entity),
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                return Err(e);
            }
        };
        self.store(id.clone(), Arc::clone(&entity))?;

        info!("✓ Resolved {} in {:?}", key, timer.elapsed());
        Ok(Some(entity))
    }

    fn store<T: CensusEntity>(&self, id: T::Id, entity: Arc<T>) -> Result<()> {
        let evicted = self.caches.set::<T>(id, entity)?;
        if !evicted.is_empty() {
            debug!(
                "Cache for {} evicted {} entries",
                T::COLLECTION,
                evicted.len()
            );
        }
        Ok(())
    }

    /// Get the cache registry (for inspection and invalidation).
    pub fn caches(&self) -> &CacheRegistry {
        &self.caches
    }

    /// Get the source reference (for advanced use).
    pub fn source(&self) -> &S {
        &self.source
    }
}
