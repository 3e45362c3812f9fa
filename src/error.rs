//! Error types for the census client.

use std::fmt;

/// Result type for census operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the census client.
///
/// A direct fetch that finds nothing is **not** an error: it surfaces as
/// `Ok(None)`. Likewise a deferred reference that resolves to zero entities
/// is a normal, memoized `Ok(&[])`.
///
/// None of these failures leave anything behind in a cache. A caller may
/// retry the same operation safely.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The collaborator failed to deliver a response.
    ///
    /// Common causes:
    /// - Connection lost or refused
    /// - Non-success HTTP status
    /// - The census service replied with an `error` body
    /// - The payload could not be decoded
    ///
    /// **Recovery:** Retry; nothing was cached.
    FetchError(String),

    /// A record was returned but does not satisfy its entity's schema.
    ///
    /// Raised when a required field is absent or cannot be interpreted as the
    /// expected type. Not retryable without an upstream fix.
    SchemaError {
        /// Collection the record came from
        collection: String,
        /// Offending field name
        field: String,
        /// What went wrong with it
        reason: String,
    },

    /// `resolve()` was called on a deferred reference whose resolution is
    /// still in flight.
    ///
    /// A reference resolves from a single task at a time; concurrent
    /// resolution of the same handle is a caller error.
    ResolutionInProgress(String),

    /// Invalid configuration of a client or collaborator.
    ConfigError(String),

    /// Generic error with custom message.
    Other(String),
}

impl Error {
    /// Build a schema error for `collection.field`.
    pub fn schema(collection: &str, field: &str, reason: impl Into<String>) -> Self {
        Error::SchemaError {
            collection: collection.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether retrying the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::FetchError(_) | Error::ResolutionInProgress(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FetchError(msg) => write!(f, "Fetch error: {}", msg),
            Error::SchemaError {
                collection,
                field,
                reason,
            } => write!(f, "Schema error: {}.{}: {}", collection, field, reason),
            Error::ResolutionInProgress(query) => {
                write!(f, "Resolution already in progress: {}", query)
            }
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::FetchError(format!("undecodable payload: {}", e))
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::FetchError(format!("HTTP error: {}", e))
    }
}
