//! Facade crate for the site composition engine.
//! Re-exports domain/kernel primitives and wires the feature slices into one [`SiteEngine`].
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! ```rust,ignore
//! let store = clic::store::MemoryStore::load("fixtures/demo-site.json").await?;
//! let engine = SiteEngine::builder(EngineConfig::default()).with_store(store).build()?;
//! match engine.resolve_page(&TenantId::from("demo"), "es", "/comprar/apartamento").await? {
//!     PageOutcome::Found(page) => render(page),
//!     PageOutcome::NotFound(route) => not_found(route),
//! }
//! ```

mod engine;
mod error;

pub use clic_domain as domain;
pub use clic_kernel as kernel;
#[cfg(feature = "memory")]
pub use clic_store as store;

pub use crate::engine::{PageOutcome, SiteEngine, SiteEngineBuilder};
pub use crate::error::{EngineError, EngineErrorExt};

/// Feature slices, for callers that need a single stage of the pipeline.
pub mod features {
    pub use clic_catalog as catalog;
    pub use clic_composition as composition;
    pub use clic_hydration as hydration;
    pub use clic_routing as routing;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "catalog",
        "routing",
        "composition",
        "hydration",
        #[cfg(feature = "memory")]
        "memory",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}
