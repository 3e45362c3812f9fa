//! Census REST API source.

use super::CensusSource;
use crate::error::{Error, Result};
use crate::query::Query;
use crate::record::Record;
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use std::time::Duration;

/// Public census endpoint.
pub const DEFAULT_BASE_URL: &str = "https://census.daybreakgames.com";

/// Configuration for [`HttpSource`].
#[derive(Clone, Debug)]
pub struct HttpConfig {
    pub base_url: String,
    /// Service id, with or without the `s:` prefix.
    pub service_id: String,
    /// Game namespace, e.g. `ps2:v2`.
    pub namespace: String,
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            service_id: "s:example".to_string(),
            namespace: "ps2:v2".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl HttpConfig {
    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = service_id.into();
        self
    }

    fn normalized_service_id(&self) -> String {
        if self.service_id.starts_with("s:") {
            self.service_id.clone()
        } else {
            format!("s:{}", self.service_id)
        }
    }

    /// URL of the `get` verb for a collection.
    pub fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/{}/get/{}/{}/",
            self.base_url.trim_end_matches('/'),
            self.normalized_service_id(),
            self.namespace,
            collection
        )
    }
}

/// Query-string pairs for a census `get` request.
pub fn query_pairs(query: &Query) -> Vec<(String, String)> {
    let mut pairs = query.terms.clone();
    if let Some(limit) = query.limit {
        pairs.push(("c:limit".to_string(), limit.to_string()));
    }
    if let Some(join) = &query.join {
        pairs.push(("c:join".to_string(), join.to_string()));
    }
    pairs
}

/// Extract the target-collection records from a census response body.
///
/// Join results are injected into their parent under
/// [`Join::inject_key`](crate::query::Join::inject_key) and are flattened
/// here, hop by hop.
pub fn extract_records(query: &Query, body: Value) -> Result<Vec<Record>> {
    if let Some(error) = body.get("error").or_else(|| body.get("errorMessage")) {
        return Err(Error::FetchError(format!("census error: {}", error)));
    }

    let list_key = format!("{}_list", query.collection);
    let mut current: Vec<Value> = match body {
        Value::Object(mut map) => match map.remove(&list_key) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(Error::FetchError(format!(
                    "response is missing `{}`",
                    list_key
                )))
            }
        },
        _ => {
            return Err(Error::FetchError(
                "response body is not a JSON object".to_string(),
            ))
        }
    };

    for join in query.joins() {
        let key = join.inject_key();
        let mut next = Vec::new();
        for mut parent in current {
            match parent.get_mut(&key).map(Value::take) {
                Some(Value::Array(children)) => next.extend(children),
                Some(child @ Value::Object(_)) => next.push(child),
                _ => {}
            }
        }
        current = next;
    }

    current.into_iter().map(Record::from_value).collect()
}

/// Census REST source over `reqwest`.
///
/// # Example
///
/// ```no_run
/// # use census_kit::source::{HttpConfig, HttpSource};
/// # use census_kit::error::Result;
/// # fn example() -> Result<()> {
/// let source = HttpSource::new(HttpConfig::default().with_service_id("my_service"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpSource {
    http: ReqwestClient,
    config: HttpConfig,
}

impl HttpSource {
    /// Create a source from configuration.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` for an empty service id or namespace, or if
    /// the HTTP client cannot be built.
    pub fn new(config: HttpConfig) -> Result<Self> {
        if config.service_id.trim().is_empty() || config.service_id == "s:" {
            return Err(Error::ConfigError("service id must not be empty".to_string()));
        }
        if config.namespace.trim().is_empty() {
            return Err(Error::ConfigError("namespace must not be empty".to_string()));
        }

        let http = ReqwestClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            "✓ Census source initialized: {} ({})",
            config.base_url, config.namespace
        );

        Ok(HttpSource { http, config })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

impl CensusSource for HttpSource {
    async fn fetch_by_join(&self, query: &Query) -> Result<Vec<Record>> {
        let url = self.config.collection_url(&query.collection);
        debug!("» Census GET {}", query);

        let body: Value = self
            .http
            .get(&url)
            .query(&query_pairs(query))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let records = extract_records(query, body)?;
        debug!("✓ Census GET {} -> {} records", query, records.len());
        Ok(records)
    }
}
