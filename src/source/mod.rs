//! Census data sources.
//!
//! The [`CensusSource`] trait is the only way records enter the client. It
//! decouples the cache and reference layers from the transport, so the same
//! resolution flow runs against the live REST API ([`HttpSource`], feature
//! `http`) or a fixture store ([`InMemorySource`], feature `inmemory`).
//!
//! # Error Handling
//!
//! Implementations return `Err(Error::FetchError)` for transport and protocol
//! failures, and `Ok(None)` / `Ok(vec![])` when the service simply has no
//! matching records. No timeout is imposed by the client; bound request time
//! inside the source if needed.

use crate::error::Result;
use crate::query::Query;
use crate::record::Record;

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpSource};
#[cfg(feature = "inmemory")]
pub use inmemory::InMemorySource;

/// Collaborator that fetches raw records.
///
/// **ASYNC:** All methods are async and suspend the calling task while the
/// request is in flight.
#[allow(async_fn_in_trait)]
pub trait CensusSource: Send + Sync {
    /// Fetch the records selected by a filter/join query.
    ///
    /// Returns records of [`Query::target_collection`]; an empty vector is a
    /// valid answer.
    ///
    /// # Errors
    /// Returns `Err` if the source is unavailable or the request fails
    async fn fetch_by_join(&self, query: &Query) -> Result<Vec<Record>>;

    /// Fetch a single record by id.
    ///
    /// # Returns
    /// - `Ok(Some(record))` - Record found
    /// - `Ok(None)` - No such record (not an error)
    ///
    /// Default implementation issues a one-term, limit-1 `fetch_by_join`.
    ///
    /// # Errors
    /// Returns `Err` if the source is unavailable or the request fails
    async fn fetch_by_id(
        &self,
        collection: &str,
        id_field: &str,
        id: &str,
    ) -> Result<Option<Record>> {
        let query = Query::by_id(collection, id_field, id);
        Ok(self.fetch_by_join(&query).await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct JoinOnly {
        calls: AtomicUsize,
    }

    impl CensusSource for JoinOnly {
        async fn fetch_by_join(&self, query: &Query) -> Result<Vec<Record>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query.terms.first().map(|(_, v)| v.as_str()) == Some("404") {
                return Ok(Vec::new());
            }
            if query.limit != Some(1) {
                return Err(Error::Other("expected a limit-1 query".to_string()));
            }
            Ok(vec![
                Record::new().with("world_id", "1"),
                Record::new().with("world_id", "2"),
            ])
        }
    }

    #[tokio::test]
    async fn test_fetch_by_id_default_uses_join() {
        let source = JoinOnly {
            calls: AtomicUsize::new(0),
        };

        let found = source
            .fetch_by_id("world", "world_id", "1")
            .await
            .expect("Failed to fetch");
        assert_eq!(found.and_then(|r| r.text("world_id")), Some("1".to_string()));

        let missing = source
            .fetch_by_id("world", "world_id", "404")
            .await
            .expect("Failed to fetch");
        assert!(missing.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
