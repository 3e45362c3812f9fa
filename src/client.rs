//! High-level census client.
//!
//! Wraps a [`Resolver`] in an `Arc` so a session can be cloned freely across
//! tasks. Each client owns its caches: two clients never share instances.

use crate::cache::CacheStats;
use crate::entity::CensusEntity;
use crate::error::Result;
use crate::observability::CacheMetrics;
use crate::query::Query;
use crate::reference::DeferredReference;
use crate::registry::{CacheConfig, CacheRegistry};
use crate::resolver::Resolver;
use crate::source::CensusSource;
use crate::strategy::CacheStrategy;
use futures::future::try_join_all;
use std::sync::Arc;

/// Census client session.
///
/// # Example
///
/// ```no_run
/// # #[cfg(feature = "http")]
/// # async fn example() -> census_kit::Result<()> {
/// use census_kit::{Client, ps2::Weapon};
/// use census_kit::source::{HttpConfig, HttpSource};
///
/// let client = Client::new(HttpSource::new(HttpConfig::default())?);
///
/// if let Some(weapon) = client.get::<Weapon>(80).await? {
///     let item = weapon.item(&client);
///     println!("{:?}", item.resolve_one().await?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Client<S: CensusSource> {
    resolver: Arc<Resolver<S>>,
}

impl<S: CensusSource> Clone for Client<S> {
    fn clone(&self) -> Self {
        Client {
            resolver: Arc::clone(&self.resolver),
        }
    }
}

impl<S: CensusSource> Client<S> {
    /// Create a client with default cache configuration and no metrics.
    pub fn new(source: S) -> Self {
        Client {
            resolver: Arc::new(Resolver::new(source)),
        }
    }

    pub fn builder(source: S) -> ClientBuilder<S> {
        ClientBuilder::new(source)
    }

    /// Get-or-fetch-or-populate with the default strategy.
    ///
    /// Returns `Ok(None)` when the census has no record for `id`; that outcome
    /// is never cached.
    ///
    /// # Errors
    ///
    /// - `Error::FetchError`: The source failed
    /// - `Error::SchemaError`: The record does not fit `T`
    pub async fn get<T: CensusEntity>(&self, id: impl Into<T::Id>) -> Result<Option<Arc<T>>> {
        self.resolver.get::<T>(&id.into()).await
    }

    pub async fn get_with<T: CensusEntity>(
        &self,
        id: impl Into<T::Id>,
        strategy: CacheStrategy,
    ) -> Result<Option<Arc<T>>> {
        self.resolver.get_with::<T>(&id.into(), strategy).await
    }

    /// Resolve several ids concurrently, preserving order.
    ///
    /// Fails as a whole on the first error.
    pub async fn get_many<T: CensusEntity>(&self, ids: &[T::Id]) -> Result<Vec<Option<Arc<T>>>> {
        try_join_all(ids.iter().map(|id| self.resolver.get::<T>(id))).await
    }

    /// Run a filter/join query for `T`, caching every result.
    pub async fn find<T: CensusEntity>(&self, query: &Query) -> Result<Vec<Arc<T>>> {
        self.resolver.find::<T>(query).await
    }

    /// First result of [`find`](Self::find), if any.
    pub async fn find_first<T: CensusEntity>(&self, query: Query) -> Result<Option<Arc<T>>> {
        let query = query.limit(1);
        Ok(self.resolver.find::<T>(&query).await?.into_iter().next())
    }

    /// Fresh, unresolved reference to the `T` instances `query` selects.
    pub fn reference<T: CensusEntity>(&self, query: Query) -> DeferredReference<T, S> {
        DeferredReference::new(self.clone(), query)
    }

    /// Reference to the single `T` with the given id.
    pub fn reference_by_id<T: CensusEntity>(&self, id: impl Into<T::Id>) -> DeferredReference<T, S> {
        self.reference(Query::by_id(T::COLLECTION, T::ID_FIELD, id.into()))
    }

    /// Drop the cached instance of `T` for `id`, if any.
    pub fn invalidate<T: CensusEntity>(&self, id: impl Into<T::Id>) -> Result<bool> {
        let removed = self.resolver.caches().remove::<T>(&id.into())?;
        Ok(removed.is_some())
    }

    /// Whether a live instance of `T` is cached for `id`.
    pub fn is_cached<T: CensusEntity>(&self, id: impl Into<T::Id>) -> bool {
        self.resolver.caches().contains::<T>(&id.into())
    }

    /// Drop the cache of `T` only.
    pub fn clear_cache<T: CensusEntity>(&self) {
        self.resolver.caches().clear::<T>();
    }

    /// Drop every entity cache of this client.
    pub fn clear_caches(&self) {
        self.resolver.caches().clear_all();
    }

    pub fn cache_stats<T: CensusEntity>(&self) -> Result<CacheStats> {
        self.resolver.caches().stats::<T>()
    }

    /// Remove expired instances of `T`, returning how many were dropped.
    pub fn purge_expired<T: CensusEntity>(&self) -> Result<usize> {
        let purged = self.resolver.caches().cache_for::<T>()?.lock().purge_expired();
        if purged > 0 {
            debug!("✓ Purged {} expired {} entries", purged, T::COLLECTION);
        }
        Ok(purged)
    }

    pub fn source(&self) -> &S {
        self.resolver.source()
    }

    /// Get the underlying resolver (for advanced use).
    pub fn resolver(&self) -> &Resolver<S> {
        &self.resolver
    }
}

/// Builder for a [`Client`] with per-entity cache overrides and metrics.
pub struct ClientBuilder<S: CensusSource> {
    source: S,
    registry: CacheRegistry,
    metrics: Option<Box<dyn CacheMetrics>>,
}

impl<S: CensusSource> ClientBuilder<S> {
    pub fn new(source: S) -> Self {
        ClientBuilder {
            source,
            registry: CacheRegistry::new(),
            metrics: None,
        }
    }

    /// Override capacity and time-to-use of `T`'s cache.
    pub fn with_cache_config<T: CensusEntity>(self, config: CacheConfig) -> Self {
        self.registry.configure::<T>(config);
        self
    }

    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Client<S> {
        let mut resolver = Resolver::new(self.source).with_registry(self.registry);
        if let Some(metrics) = self.metrics {
            resolver = resolver.with_metrics(metrics);
        }
        Client {
            resolver: Arc::new(resolver),
        }
    }
}
