//! Lazily resolved, memoized references to related entities.
//!
//! A [`DeferredReference`] stands for "the `T` instances a query selects".
//! Creating one does nothing; the first [`resolve`](DeferredReference::resolve)
//! runs the query through the owning client's source, funnels every record
//! through `T`'s cache, and memoizes the result. Later resolves return the
//! memoized list without any network activity, even if it is empty.
//!
//! ```text
//!   Unresolved --resolve()--> Resolving --ok--> Resolved (terminal)
//!        ^                        |
//!        +---------- error -------+
//! ```
//!
//! A failed or cancelled resolution leaves the reference unresolved, so the
//! next call retries. A call made while another resolution of the same
//! reference is in flight fails with [`Error::ResolutionInProgress`] rather
//! than joining it.
//!
//! References are built on demand from an entity's id fields and are never
//! stored on cached instances, so an entity and its references never keep
//! each other alive.

use crate::client::Client;
use crate::entity::CensusEntity;
use crate::error::{Error, Result};
use crate::query::Query;
use crate::source::CensusSource;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Observable lifecycle of a [`DeferredReference`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceState {
    Unresolved,
    Resolving,
    Resolved,
}

impl fmt::Display for ReferenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceState::Unresolved => write!(f, "Unresolved"),
            ReferenceState::Resolving => write!(f, "Resolving"),
            ReferenceState::Resolved => write!(f, "Resolved"),
        }
    }
}

/// Handle to the `T` instances selected by a query, resolved at most once.
pub struct DeferredReference<T: CensusEntity, S: CensusSource> {
    client: Client<S>,
    query: Query,
    slot: OnceCell<Vec<Arc<T>>>,
    resolving: AtomicBool,
}

/// Clears the resolving flag when a resolution ends, including by
/// cancellation.
struct ResolvingGuard<'a>(&'a AtomicBool);

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<T: CensusEntity, S: CensusSource> DeferredReference<T, S> {
    /// Create an unresolved reference. No I/O happens here.
    pub fn new(client: Client<S>, query: Query) -> Self {
        DeferredReference {
            client,
            query,
            slot: OnceCell::new(),
            resolving: AtomicBool::new(false),
        }
    }

    /// Resolve the reference, or return the memoized result.
    ///
    /// The source is asked exactly once per successful resolution; the
    /// returned instances are the ones stored in `T`'s cache.
    ///
    /// # Errors
    ///
    /// - `Error::ResolutionInProgress`: Another resolution of this reference
    ///   is in flight
    /// - `Error::FetchError` / `Error::SchemaError`: Resolution failed; the
    ///   reference stays unresolved
    pub async fn resolve(&self) -> Result<&[Arc<T>]> {
        if let Some(resolved) = self.get() {
            return Ok(resolved);
        }

        if self
            .resolving
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            debug!("✗ Reference {} already resolving", self.query);
            return Err(Error::ResolutionInProgress(self.query.to_string()));
        }
        let _guard = ResolvingGuard(&self.resolving);

        // A resolution may have completed between the check and the swap.
        if let Some(resolved) = self.get() {
            return Ok(resolved);
        }

        let entities = self.client.find::<T>(&self.query).await?;
        debug!(
            "✓ Reference {} resolved to {} {} instances",
            self.query,
            entities.len(),
            T::COLLECTION
        );

        // Only the flag holder ever sets the slot.
        let resolved = self.slot.get_or_init(|| async move { entities }).await;
        Ok(resolved.as_slice())
    }

    /// Resolve and return the first instance, if any.
    pub async fn resolve_one(&self) -> Result<Option<Arc<T>>> {
        Ok(self.resolve().await?.first().cloned())
    }

    /// Memoized result, without resolving.
    pub fn get(&self) -> Option<&[Arc<T>]> {
        self.slot.get().map(Vec::as_slice)
    }

    pub fn state(&self) -> ReferenceState {
        if self.slot.initialized() {
            ReferenceState::Resolved
        } else if self.resolving.load(Ordering::Acquire) {
            ReferenceState::Resolving
        } else {
            ReferenceState::Unresolved
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.initialized()
    }

    pub fn query(&self) -> &Query {
        &self.query
    }
}

impl<T: CensusEntity, S: CensusSource> fmt::Debug for DeferredReference<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredReference")
            .field("collection", &T::COLLECTION)
            .field("query", &self.query.to_string())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Join;
    use crate::record::Record;
    use crate::source::InMemorySource;
    use std::time::Duration;

    #[derive(Debug)]
    struct Item {
        id: i64,
        name: String,
    }

    impl CensusEntity for Item {
        type Id = i64;
        const COLLECTION: &'static str = "item";
        const ID_FIELD: &'static str = "item_id";

        fn id(&self) -> i64 {
            self.id
        }

        fn from_record(record: &Record) -> Result<Self> {
            let fields = record.fields(Self::COLLECTION);
            Ok(Item {
                id: fields.int(Self::ID_FIELD)?,
                name: fields.string("name")?,
            })
        }
    }

    fn source() -> InMemorySource {
        let source = InMemorySource::new();
        source.insert(
            "item",
            Record::new().with("item_id", "7").with("name", "Gauss SAW"),
        );
        source.insert(
            "item_to_weapon",
            Record::new().with("item_id", "7").with("weapon_id", "80"),
        );
        source
    }

    fn item_of_weapon(weapon_id: i64) -> Query {
        Query::new("item_to_weapon")
            .term("weapon_id", weapon_id)
            .join(Join::new("item").on("item_id"))
    }

    #[tokio::test]
    async fn test_resolves_exactly_once() {
        let source = source();
        let client = Client::new(source.clone());
        let reference = client.reference::<Item>(item_of_weapon(80));

        assert_eq!(reference.state(), ReferenceState::Unresolved);
        assert!(reference.get().is_none());
        assert_eq!(source.calls(), 0, "creation must not fetch");

        let first = reference.resolve().await.expect("Failed to resolve");
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name, "Gauss SAW");

        let second = reference.resolve().await.expect("Failed to resolve");
        assert!(Arc::ptr_eq(&first[0], &second[0]));
        assert_eq!(source.fetch_by_join_calls(), 1);
        assert_eq!(reference.state(), ReferenceState::Resolved);
    }

    #[tokio::test]
    async fn test_resolved_instances_are_cached() {
        let source = source();
        let client = Client::new(source.clone());
        let reference = client.reference::<Item>(item_of_weapon(80));

        let resolved = reference.resolve_one().await.expect("Failed to resolve");
        let cached = client.get::<Item>(7).await.expect("Failed to get");

        assert!(Arc::ptr_eq(
            &resolved.expect("Item not resolved"),
            &cached.expect("Item not cached")
        ));
        assert_eq!(source.fetch_by_id_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_result_is_memoized() {
        let source = source();
        let client = Client::new(source.clone());
        let reference = client.reference::<Item>(item_of_weapon(999));

        for _ in 0..3 {
            let resolved = reference.resolve().await.expect("Failed to resolve");
            assert!(resolved.is_empty());
        }
        assert_eq!(source.fetch_by_join_calls(), 1);
        assert!(reference.is_resolved());
    }

    #[tokio::test]
    async fn test_failure_leaves_unresolved_then_retries() {
        let source = source();
        source.fail_next(1);
        let client = Client::new(source.clone());
        let reference = client.reference::<Item>(item_of_weapon(80));

        assert!(matches!(
            reference.resolve().await,
            Err(Error::FetchError(_))
        ));
        assert_eq!(reference.state(), ReferenceState::Unresolved);

        let resolved = reference.resolve().await.expect("Retry failed");
        assert_eq!(resolved.len(), 1);
        assert_eq!(source.fetch_by_join_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_resolve_is_rejected() {
        let source = source().with_latency(Duration::from_millis(50));
        let client = Client::new(source.clone());
        let reference = client.reference::<Item>(item_of_weapon(80));

        let second = async {
            tokio::task::yield_now().await;
            assert_eq!(reference.state(), ReferenceState::Resolving);
            reference.resolve().await.map(|r| r.len())
        };
        let (first, second) = tokio::join!(reference.resolve(), second);

        assert_eq!(first.expect("First resolve failed").len(), 1);
        assert!(matches!(second, Err(Error::ResolutionInProgress(_))));
        assert_eq!(source.fetch_by_join_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_resolution_can_retry() {
        let source = source().with_latency(Duration::from_millis(50));
        let client = Client::new(source.clone());
        let reference = client.reference::<Item>(item_of_weapon(80));

        let timed_out =
            tokio::time::timeout(Duration::from_millis(10), reference.resolve()).await;
        assert!(timed_out.is_err());
        assert_eq!(reference.state(), ReferenceState::Unresolved);

        let resolved = reference.resolve().await.expect("Retry failed");
        assert_eq!(resolved.len(), 1);
    }

    #[tokio::test]
    async fn test_references_are_independent() {
        let source = source();
        let client = Client::new(source.clone());
        let a = client.reference::<Item>(item_of_weapon(80));
        let b = client.reference::<Item>(item_of_weapon(80));

        a.resolve().await.unwrap();
        assert!(!b.is_resolved());
        b.resolve().await.unwrap();
        assert_eq!(source.fetch_by_join_calls(), 2);
    }
}
