//! # URL vocabularies
//!
//! Read-mostly, per-tenant catalogs consulted by the route resolver:
//!
//! * [`TagDictionary`]: URL segment to semantic property filter, global or tenant-owned, with
//!   per-language aliases.
//! * [`NavigationRegistry`]: content prefix to hierarchical depth, with per-language aliases.
//!
//! Both are injected with their repository and keep one immutable index per tenant in a `moka`
//! cache. Indexes are built on first use and rebuilt only through an explicit `reload`, which
//! completes before it returns.

mod error;
pub mod navigation;
pub mod tags;

pub use crate::error::{CatalogError, CatalogErrorExt};
pub use crate::navigation::{NavigationConflict, NavigationRegistry, NavigationScope};
pub use crate::tags::{TagConflict, TagDictionary, TagScope};

use clic_domain::config::CatalogConfig;
use moka::future::{Cache, CacheBuilder};
use std::hash::Hash;
use std::time::Duration;

/// Cache of per-tenant indexes sized by [`CatalogConfig`].
pub(crate) fn index_cache<K, V>(config: &CatalogConfig) -> Cache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    let builder = CacheBuilder::new(config.cache_capacity);
    match config.cache_ttl_seconds {
        Some(ttl) => builder.time_to_live(Duration::from_secs(ttl)).build(),
        None => builder.build(),
    }
}
