//! In-memory reference adapter for the engine's storage contracts.
//!
//! [`MemoryStore`] implements [`TagSource`](clic_kernel::TagSource),
//! [`NavigationSource`](clic_kernel::NavigationSource),
//! [`ComponentSource`](clic_kernel::ComponentSource) and
//! [`ContentSource`](clic_kernel::ContentSource) over a [`SiteFixture`]: the catalogs, the
//! component records and the content of one or more tenants, usually loaded from a JSON file.
//!
//! It evaluates every filter operator, paginates lists, counts categories and computes the
//! `stats` and `carrusel` aggregates, so a whole site can be resolved without a database.
//!
//! # Examples
//!
//! ```rust
//! use clic_kernel::{TagSource, TenantId};
//! use clic_store::MemoryStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::from_json(r#"{
//!     "tags": [{
//!         "slug": "venta", "category": "operation", "targetField": "operacion",
//!         "operator": "=", "value": "venta", "languageAliases": { "es": "comprar" }
//!     }]
//! }"#)?;
//!
//! let global = store.list_tags(None).await?;
//! assert_eq!(global.len(), 1);
//! assert!(store.list_tags(Some(&TenantId::from("demo"))).await?.is_empty());
//! # Ok(())
//! # }
//! ```

mod error;
mod filter;
mod fixture;
mod store;

pub use error::{StoreError, StoreErrorExt};
pub use fixture::{CategoryEntry, ContentEntry, SiteFixture};
pub use store::{FEATURED_FIELD, MemoryStore, PRICE_FIELD};
