//! Read contracts of the external storage collaborators.
//!
//! The engine never owns persistence: tags, navigation configs, component records and
//! content are read through these traits. Implementations must be cheap to share
//! (`Arc<dyn ...>`) and safe for concurrent reads. Any `Err` is an infrastructure fault;
//! "nothing found" is always expressed through the `Ok` value.

mod error;

pub use error::{RepositoryError, RepositoryErrorExt};

use async_trait::async_trait;
use clic_domain::{
    ComponentRecord, ContentPayload, ContentQuery, NavigationConfig, PageIdentity, Tag, TenantId,
};
use std::fmt::Debug;

#[async_trait]
pub trait TagSource: Debug + Send + Sync {
    /// Lists the tags owned by `tenant`, or the global vocabulary when `tenant` is `None`.
    ///
    /// Inactive tags may be returned; callers filter them.
    async fn list_tags(&self, tenant: Option<&TenantId>) -> Result<Vec<Tag>, RepositoryError>;
}

#[async_trait]
pub trait NavigationSource: Debug + Send + Sync {
    /// Lists the navigation overrides of `tenant`, or the system defaults when `None`.
    async fn list_navigation_configs(
        &self,
        tenant: Option<&TenantId>,
    ) -> Result<Vec<NavigationConfig>, RepositoryError>;
}

#[async_trait]
pub trait ComponentSource: Debug + Send + Sync {
    /// Lists the component records that may apply to `identity`.
    ///
    /// Implementations may over-fetch (e.g. every record of the tenant); scope filtering
    /// happens in the engine.
    async fn list_component_records(
        &self,
        tenant: &TenantId,
        identity: &PageIdentity,
    ) -> Result<Vec<ComponentRecord>, RepositoryError>;
}

#[async_trait]
pub trait ContentSource: Debug + Send + Sync {
    /// Runs a content fetch. The payload shape must match the query's strategy.
    async fn fetch_content(&self, query: &ContentQuery) -> Result<ContentPayload, RepositoryError>;

    /// Whether `slug` is a category of `content_type` for `tenant`.
    async fn has_category(
        &self,
        tenant: &TenantId,
        content_type: &str,
        slug: &str,
    ) -> Result<bool, RepositoryError>;
}
