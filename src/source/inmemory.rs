//! In-memory census source (fixtures, offline use, tests).
//!
//! Stores records per collection in a DashMap and evaluates equality terms
//! and join chains the way the census service does. Every call is counted,
//! which makes it usable as a call-count spy, and failures can be injected
//! to simulate transport errors.

use super::CensusSource;
use crate::error::{Error, Result};
use crate::query::Query;
use crate::record::Record;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Fixture-backed [`CensusSource`].
///
/// Clones share the same store and counters.
///
/// # Example
///
/// ```no_run
/// use census_kit::record::Record;
/// use census_kit::source::{CensusSource, InMemorySource};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let source = InMemorySource::new();
///     source.insert("world", Record::new().with("world_id", "17").with("state", "online"));
///
///     let record = source.fetch_by_id("world", "world_id", "17").await?;
///     assert!(record.is_some());
///     assert_eq!(source.fetch_by_id_calls(), 1);
///     Ok(())
/// }
/// ```
#[derive(Clone, Default)]
pub struct InMemorySource {
    collections: Arc<DashMap<String, Vec<Record>>>,
    by_id_calls: Arc<AtomicUsize>,
    join_calls: Arc<AtomicUsize>,
    failures: Arc<AtomicUsize>,
    latency: Option<Duration>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response by `latency` (simulates a slow network).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add a record to a collection.
    pub fn insert(&self, collection: &str, record: Record) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    /// Remove every record of a collection.
    pub fn clear_collection(&self, collection: &str) {
        self.collections.remove(collection);
    }

    /// Fail the next `count` calls with [`Error::FetchError`].
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    pub fn fetch_by_id_calls(&self) -> usize {
        self.by_id_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_by_join_calls(&self) -> usize {
        self.join_calls.load(Ordering::SeqCst)
    }

    /// Total collaborator calls of either kind.
    pub fn calls(&self) -> usize {
        self.fetch_by_id_calls() + self.fetch_by_join_calls()
    }

    pub fn reset_calls(&self) {
        self.by_id_calls.store(0, Ordering::SeqCst);
        self.join_calls.store(0, Ordering::SeqCst);
    }

    async fn simulate_transport(&self, what: &str) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            warn!("✗ InMemory {} -> injected failure", what);
            return Err(Error::FetchError(format!("injected failure for {}", what)));
        }
        Ok(())
    }

    fn matching(&self, collection: &str, terms: &[(String, String)]) -> Vec<Record> {
        self.collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| matches_terms(record, terms))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn evaluate(&self, query: &Query) -> Vec<Record> {
        let mut current = self.matching(&query.collection, &query.terms);
        if let Some(limit) = query.limit {
            current.truncate(limit as usize);
        }

        for join in query.joins() {
            let on = join.on_field();
            let to = join.to_field();
            let candidates = self.matching(&join.collection, &join.terms);

            let mut joined = Vec::new();
            for parent in &current {
                let Some(key) = parent.text(&on) else {
                    continue;
                };
                joined.extend(
                    candidates
                        .iter()
                        .filter(|child| child.text(&to).as_deref() == Some(key.as_str()))
                        .cloned(),
                );
            }
            current = joined;
        }
        current
    }
}

fn matches_terms(record: &Record, terms: &[(String, String)]) -> bool {
    terms
        .iter()
        .all(|(field, value)| record.text(field).as_deref() == Some(value.as_str()))
}

impl CensusSource for InMemorySource {
    async fn fetch_by_join(&self, query: &Query) -> Result<Vec<Record>> {
        self.join_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_transport(&query.to_string()).await?;

        let records = self.evaluate(query);
        debug!("✓ InMemory JOIN {} -> {} records", query, records.len());
        Ok(records)
    }

    async fn fetch_by_id(
        &self,
        collection: &str,
        id_field: &str,
        id: &str,
    ) -> Result<Option<Record>> {
        self.by_id_calls.fetch_add(1, Ordering::SeqCst);
        let what = format!("{}:{}", collection, id);
        self.simulate_transport(&what).await?;

        let found = self
            .collections
            .get(collection)
            .and_then(|records| {
                records
                    .iter()
                    .find(|record| record.text(id_field).as_deref() == Some(id))
                    .cloned()
            });

        if found.is_some() {
            debug!("✓ InMemory GET {} -> FOUND", what);
        } else {
            debug!("✓ InMemory GET {} -> NONE", what);
        }
        Ok(found)
    }
}
