//! Core entity trait that all cached census types implement.

use crate::error::Result;
use crate::record::Record;
use crate::registry::CacheConfig;
use std::fmt::Display;
use std::hash::Hash;
use std::time::Duration;

/// Trait for census entity types resolved through the cache.
///
/// An entity is built from exactly one [`Record`] and never mutated
/// afterwards; re-fetching produces a new instance that replaces the cached
/// one. Relations to other entities are kept as ids and exposed as
/// [`DeferredReference`](crate::reference::DeferredReference) handles, never
/// as embedded objects.
///
/// # Example
///
/// ```
/// use census_kit::{CensusEntity, Result};
/// use census_kit::record::Record;
///
/// pub struct Zone {
///     pub zone_id: i64,
///     pub code: String,
/// }
///
/// impl CensusEntity for Zone {
///     type Id = i64;
///     const COLLECTION: &'static str = "zone";
///     const ID_FIELD: &'static str = "zone_id";
///
///     fn id(&self) -> i64 {
///         self.zone_id
///     }
///
///     fn from_record(record: &Record) -> Result<Self> {
///         let fields = record.fields(Self::COLLECTION);
///         Ok(Zone {
///             zone_id: fields.int("zone_id")?,
///             code: fields.string("code")?,
///         })
///     }
/// }
/// ```
pub trait CensusEntity: Send + Sync + Sized + 'static {
    /// Type of the entity's id, unique within its collection.
    type Id: Display + Clone + Eq + Hash + Send + Sync + 'static;

    /// Census collection the entity lives in, e.g. `"weapon"`.
    const COLLECTION: &'static str;

    /// Field holding the id, e.g. `"weapon_id"`.
    const ID_FIELD: &'static str;

    /// Default maximum number of cached instances.
    const CACHE_SIZE: usize = 128;

    /// Default time-to-use of a cached instance.
    const CACHE_TTU: Duration = Duration::from_secs(3600);

    fn id(&self) -> Self::Id;

    /// Build the entity from its record.
    ///
    /// # Errors
    /// Returns `Error::SchemaError` when a required field is missing or
    /// malformed.
    fn from_record(record: &Record) -> Result<Self>;

    /// Default cache configuration, unless a client overrides it.
    fn cache_config() -> CacheConfig {
        CacheConfig::new(Self::CACHE_SIZE, Self::CACHE_TTU)
    }

    /// Human-readable key used in logs and metrics: `"{collection}:{id}"`.
    fn cache_key(id: &Self::Id) -> String {
        format!("{}:{}", Self::COLLECTION, id)
    }
}
