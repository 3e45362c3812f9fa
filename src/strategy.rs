//! Cache strategies for direct entity lookups.
//!
//! Every [`Client::get_with`](crate::client::Client::get_with) call names one
//! of four strategies:
//!
//! ```
//! use census_kit::strategy::CacheStrategy;
//!
//! // 1. Fresh - Use cache only
//! let _s = CacheStrategy::Fresh;
//!
//! // 2. Refresh - Cache-first with census fallback (default)
//! let _s = CacheStrategy::Refresh;
//!
//! // 3. Invalidate - Drop the cached entry, fetch and replace
//! let _s = CacheStrategy::Invalidate;
//!
//! // 4. Bypass - Always fetch, still store the result
//! let _s = CacheStrategy::Bypass;
//! ```
//!
//! | Strategy | Cache Hit | Cache Miss | Use Case |
//! |----------|-----------|-----------|----------|
//! | **Fresh** | Return | Return None | Offline reads; never touch the network |
//! | **Refresh** | Return | Fetch | Default |
//! | **Invalidate** | Drop + Fetch | Fetch | Known-stale data (e.g. world state) |
//! | **Bypass** | Fetch | Fetch | Read-through without trusting the cache |
//!
//! Whatever the strategy, a fetch that finds no record never populates the
//! cache, and a failed fetch leaves it untouched.

/// Strategy enum controlling cache lookup and fetch behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CacheStrategy {
    /// **Fresh**: Cache only, never fetch.
    ///
    /// Flow:
    /// 1. Check cache
    /// 2. If hit: return cached instance
    /// 3. If miss: return None
    Fresh,

    /// **Refresh**: Cache first, fetch on miss.
    ///
    /// Flow:
    /// 1. Check cache
    /// 2. If hit: return cached instance (no network activity)
    /// 3. If miss: fetch by id, populate, store, return
    #[default]
    Refresh,

    /// **Invalidate**: Drop the cached instance, then fetch and replace it.
    ///
    /// A re-fetch replaces the cached instance wholesale; nothing is patched.
    Invalidate,

    /// **Bypass**: Skip the cache lookup, always fetch.
    ///
    /// The fetched instance is still stored for later callers.
    Bypass,
}

impl CacheStrategy {
    /// Whether this strategy consults the cache before fetching.
    pub fn reads_cache(&self) -> bool {
        matches!(self, CacheStrategy::Fresh | CacheStrategy::Refresh)
    }
}

impl std::fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheStrategy::Fresh => write!(f, "Fresh"),
            CacheStrategy::Refresh => write!(f, "Refresh"),
            CacheStrategy::Invalidate => write!(f, "Invalidate"),
            CacheStrategy::Bypass => write!(f, "Bypass"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_display() {
        assert_eq!(CacheStrategy::Fresh.to_string(), "Fresh");
        assert_eq!(CacheStrategy::Refresh.to_string(), "Refresh");
        assert_eq!(CacheStrategy::Invalidate.to_string(), "Invalidate");
        assert_eq!(CacheStrategy::Bypass.to_string(), "Bypass");
    }

    #[test]
    fn test_strategy_default() {
        assert_eq!(CacheStrategy::default(), CacheStrategy::Refresh);
    }

    #[test]
    fn test_reads_cache() {
        assert!(CacheStrategy::Fresh.reads_cache());
        assert!(CacheStrategy::Refresh.reads_cache());
        assert!(!CacheStrategy::Invalidate.reads_cache());
        assert!(!CacheStrategy::Bypass.reads_cache());
    }
}
