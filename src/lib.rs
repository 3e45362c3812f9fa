//! # census-kit
//!
//! Typed, cached client core for the Daybreak Games census REST API.
//!
//! ## Features
//!
//! - **Typed entities:** Map census collections onto Rust types through
//!   [`CensusEntity`]
//! - **Bounded, timed caching:** One [`TimedBoundedCache`] per entity type,
//!   evicting least-recently-used instances and expiring them after a
//!   per-type time-to-use
//! - **Deferred references:** Relations resolve lazily, exactly once, and
//!   feed the same caches as direct lookups
//! - **Transport agnostic:** Any [`CensusSource`] works; the live REST API
//!   ships behind the `http` feature, an in-memory fixture store behind
//!   `inmemory`
//! - **Observable:** `log` output throughout and a [`CacheMetrics`] hook
//!
//! ## Quick Start
//!
//! ```no_run
//! # #[cfg(feature = "http")]
//! # async fn example() -> census_kit::Result<()> {
//! use census_kit::{Client, ps2::Weapon, source::{HttpConfig, HttpSource}};
//!
//! let source = HttpSource::new(HttpConfig::default().with_service_id("my_id"))?;
//! let client = Client::new(source);
//!
//! // Get-or-fetch-or-populate; a second call is served from cache
//! let weapon = client.get::<Weapon>(80).await?;
//!
//! // Lazily resolved relation, memoized on the handle
//! if let Some(weapon) = weapon {
//!     let item = weapon.item(&client);
//!     println!("{}", item.resolve_one().await?.map(|i| i.name.to_string()).unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Cache control
//!
//! ```no_run
//! # #[cfg(feature = "inmemory")]
//! # async fn example() -> census_kit::Result<()> {
//! use census_kit::{CacheStrategy, Client, registry::CacheConfig, ps2::World};
//! use census_kit::source::InMemorySource;
//! use std::time::Duration;
//!
//! let source = InMemorySource::new();
//! let client = Client::builder(source)
//!     .with_cache_config::<World>(CacheConfig::new(20, Duration::from_secs(30)))
//!     .build();
//!
//! // World state changes often: drop the cached instance and re-fetch
//! let world = client.get_with::<World>(17, CacheStrategy::Invalidate).await?;
//! # let _ = world;
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

pub mod cache;
pub mod client;
pub mod entity;
pub mod error;
pub mod locale;
pub mod observability;
pub mod ps2;
pub mod query;
pub mod record;
pub mod reference;
pub mod registry;
pub mod resolver;
pub mod source;
pub mod strategy;

// Re-exports for convenience
pub use cache::{CacheStats, TimedBoundedCache};
pub use client::{Client, ClientBuilder};
pub use entity::CensusEntity;
pub use error::{Error, Result};
pub use locale::LocaleData;
pub use observability::{CacheMetrics, LogMetrics, NoOpMetrics};
pub use query::{Join, Query};
pub use record::Record;
pub use reference::{DeferredReference, ReferenceState};
pub use registry::CacheConfig;
pub use resolver::Resolver;
pub use source::CensusSource;
pub use strategy::CacheStrategy;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
