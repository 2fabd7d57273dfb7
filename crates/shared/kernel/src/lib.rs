//! Kernel utilities shared across slices.
//! Keep this crate lightweight: configuration loading, URL path normalization and the
//! data-access contracts the engine consumes from external storage collaborators.
//!
//! ## Path normalization
//! ```rust
//! # use clic_kernel::path::split_path;
//! let segments = split_path("/comprar/apartamento/?utm=x").unwrap();
//! assert_eq!(segments, vec!["comprar", "apartamento"]);
//! ```
//!
//! ## Config loading
//! ```rust,ignore
//! use clic_kernel::config::load_config;
//! let cfg: clic_domain::config::EngineConfig = load_config(Some("config/engine")).unwrap();
//! ```
pub mod config;
pub mod path;
pub mod prelude;
pub mod repository;

pub use crate::path::split_path;
pub use crate::repository::{
    ComponentSource, ContentSource, NavigationSource, RepositoryError, RepositoryErrorExt,
    TagSource,
};
pub use clic_domain as domain;
pub use clic_domain::config::EngineConfig;
pub use clic_domain::{PageIdentity, TenantId};
