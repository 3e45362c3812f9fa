//! Per-session registry of entity caches.
//!
//! Every entity type gets its own [`TimedBoundedCache`], created lazily on
//! first use and sized from the type's [`CacheConfig`]. The registry is owned
//! by a [`Client`](crate::client::Client), so two clients never share cached
//! state and dropping a client tears its caches down.
//!
//! Each cache sits behind its own mutex. A get/set/evict sequence runs as one
//! critical section and no lock is ever held across an `.await`.

use crate::cache::{CacheStats, TimedBoundedCache};
use crate::entity::CensusEntity;
use crate::error::{Error, Result};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::sync::Arc;
use std::time::Duration;

/// Capacity and time-to-use of one entity cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub capacity: usize,
    pub ttu: Duration,
}

impl CacheConfig {
    pub fn new(capacity: usize, ttu: Duration) -> Self {
        CacheConfig { capacity, ttu }
    }

    /// A configuration that caches nothing.
    pub fn disabled() -> Self {
        CacheConfig::new(0, Duration::ZERO)
    }
}

/// Cache of one entity type, keyed by entity id.
pub type EntityCache<T> = TimedBoundedCache<<T as CensusEntity>::Id, Arc<T>>;

/// Shared handle to an entity cache.
pub type SharedCache<T> = Arc<Mutex<EntityCache<T>>>;

type ErasedCache = Arc<dyn Any + Send + Sync>;

/// Registry of entity caches, one per entity type.
#[derive(Default)]
pub struct CacheRegistry {
    caches: DashMap<TypeId, ErasedCache>,
    overrides: DashMap<TypeId, CacheConfig>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the cache configuration of `T`.
    ///
    /// An existing cache for `T` is dropped and rebuilt with the new
    /// configuration on next use.
    pub fn configure<T: CensusEntity>(&self, config: CacheConfig) {
        self.overrides.insert(TypeId::of::<T>(), config);
        self.caches.remove(&TypeId::of::<T>());
    }

    /// Effective configuration of `T`: override or the entity default.
    pub fn config_for<T: CensusEntity>(&self) -> CacheConfig {
        self.overrides
            .get(&TypeId::of::<T>())
            .map(|config| *config)
            .unwrap_or_else(T::cache_config)
    }

    /// Cache of `T`, created on first use.
    pub fn cache_for<T: CensusEntity>(&self) -> Result<SharedCache<T>> {
        let erased = self
            .caches
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                let config = self.config_for::<T>();
                debug!(
                    "✓ Registry created cache for {} (capacity {}, ttu {:?})",
                    T::COLLECTION,
                    config.capacity,
                    config.ttu
                );
                let cache: EntityCache<T> = TimedBoundedCache::new(config.capacity, config.ttu);
                let erased: ErasedCache = Arc::new(Mutex::new(cache));
                erased
            })
            .clone();

        erased.downcast::<Mutex<EntityCache<T>>>().map_err(|_| {
            Error::Other(format!(
                "cache registry holds a foreign cache for {}",
                T::COLLECTION
            ))
        })
    }

    pub fn get<T: CensusEntity>(&self, id: &T::Id) -> Result<Option<Arc<T>>> {
        Ok(self.cache_for::<T>()?.lock().get(id))
    }

    /// Store an instance, returning the ids evicted to make room.
    pub fn set<T: CensusEntity>(&self, id: T::Id, entity: Arc<T>) -> Result<Vec<T::Id>> {
        Ok(self.cache_for::<T>()?.lock().set(id, entity))
    }

    pub fn remove<T: CensusEntity>(&self, id: &T::Id) -> Result<Option<Arc<T>>> {
        Ok(self.cache_for::<T>()?.lock().remove(id))
    }

    /// Whether `T`'s cache holds a live entry for `id`, without touching it.
    pub fn contains<T: CensusEntity>(&self, id: &T::Id) -> bool {
        self.caches
            .get(&TypeId::of::<T>())
            .and_then(|erased| erased.clone().downcast::<Mutex<EntityCache<T>>>().ok())
            .is_some_and(|cache| cache.lock().contains(id))
    }

    pub fn clear<T: CensusEntity>(&self) {
        self.caches.remove(&TypeId::of::<T>());
    }

    /// Drop every cache. Overrides are kept.
    pub fn clear_all(&self) {
        self.caches.clear();
        warn!("⚠ Registry CLEAR_ALL executed - all entity caches dropped!");
    }

    pub fn stats<T: CensusEntity>(&self) -> Result<CacheStats> {
        Ok(self.cache_for::<T>()?.lock().stats())
    }

    /// Number of entity types with a live cache.
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}
