use crate::error::{EngineError, EngineErrorExt};
use clic_catalog::{NavigationConflict, NavigationRegistry, TagConflict, TagDictionary};
use clic_composition::ComponentResolver;
use clic_domain::config::EngineConfig;
use clic_domain::{ResolvedPage, TenantId};
use clic_hydration::DataResolver;
use clic_kernel::{ComponentSource, ContentSource, NavigationSource, TagSource};
use clic_routing::{NotFoundRoute, RouteResolution, RouteResolver};
use serde::Serialize;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{info, instrument};

/// Result of a page request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PageOutcome {
    Found(ResolvedPage),
    NotFound(NotFoundRoute),
}

impl PageOutcome {
    #[must_use]
    pub const fn page(&self) -> Option<&ResolvedPage> {
        match self {
            Self::Found(page) => Some(page),
            Self::NotFound(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct SiteEngineInner {
    config: EngineConfig,
    routes: RouteResolver,
    components: ComponentResolver,
    data: DataResolver,
}

/// The full pipeline: path → page identity → components → hydrated components.
///
/// Cheap to clone; clones share catalog caches.
#[derive(Debug, Clone)]
pub struct SiteEngine {
    inner: Arc<SiteEngineInner>,
}

impl Deref for SiteEngine {
    type Target = SiteEngineInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl SiteEngine {
    #[must_use]
    pub fn builder(config: EngineConfig) -> SiteEngineBuilder {
        SiteEngineBuilder { config, ..SiteEngineBuilder::default() }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolves `path` for `tenant` into a renderable page.
    ///
    /// # Errors
    /// Returns [`EngineError`] only when a storage collaborator fails while routing or while
    /// listing components. Unknown paths and failed component fetches are not errors.
    #[instrument(skip(self, tenant), fields(%tenant), err)]
    pub async fn resolve_page(
        &self,
        tenant: &TenantId,
        language: &str,
        path: &str,
    ) -> Result<PageOutcome, EngineError> {
        let identity = match self.routes.resolve_path(tenant, language, path).await? {
            RouteResolution::Found(identity) => identity,
            RouteResolution::NotFound(route) => {
                info!(reason = %route.reason, "Page not found");
                return Ok(PageOutcome::NotFound(route));
            },
        };

        let records = self.components.resolve_components(tenant, &identity).await?;
        let components = self.data.resolve_all(tenant, language, &identity, records).await;

        let failed = components.iter().filter(|c| c.is_failed()).count();
        info!(
            page_type = %identity.page_type,
            page_id = %identity.page_id(),
            components = components.len(),
            failed,
            "Page resolved"
        );
        Ok(PageOutcome::Found(ResolvedPage { page_identity: identity, components }))
    }

    /// Rebuilds the tenant's tag dictionary and navigation registry from their sources.
    ///
    /// # Errors
    /// Returns [`EngineError::Catalog`] when either rebuild fails.
    #[instrument(skip_all, fields(%tenant))]
    pub async fn reload_tenant(&self, tenant: &TenantId) -> Result<(), EngineError> {
        self.routes.tags().reload(tenant).await.context("Reloading tags")?;
        self.routes.navigation().reload(tenant).await.context("Reloading navigation")?;
        Ok(())
    }

    /// Drops every cached tenant index.
    pub fn invalidate_all(&self) {
        self.routes.tags().invalidate_all();
        self.routes.navigation().invalidate_all();
        info!("Catalog caches invalidated");
    }

    /// Tag alias and slug collisions detected while indexing the tenant's vocabulary.
    ///
    /// # Errors
    /// Returns [`EngineError::Catalog`] when the tag index cannot be built.
    pub async fn tag_conflicts(&self, tenant: &TenantId) -> Result<Vec<TagConflict>, EngineError> {
        Ok(self.routes.tags().conflicts(tenant).await?)
    }

    /// Prefixes declared twice in the system defaults or in the tenant's overrides.
    ///
    /// # Errors
    /// Returns [`EngineError::Catalog`] when the navigation index cannot be built.
    pub async fn navigation_conflicts(
        &self,
        tenant: &TenantId,
    ) -> Result<Vec<NavigationConflict>, EngineError> {
        Ok(self.routes.navigation().conflicts(tenant).await?)
    }
}

/// Collects the four storage collaborators.
#[derive(Debug, Default)]
pub struct SiteEngineBuilder {
    config: EngineConfig,
    tags: Option<Arc<dyn TagSource>>,
    navigation: Option<Arc<dyn NavigationSource>>,
    components: Option<Arc<dyn ComponentSource>>,
    content: Option<Arc<dyn ContentSource>>,
}

impl SiteEngineBuilder {
    #[must_use]
    pub fn tags(mut self, source: Arc<dyn TagSource>) -> Self {
        self.tags = Some(source);
        self
    }

    #[must_use]
    pub fn navigation(mut self, source: Arc<dyn NavigationSource>) -> Self {
        self.navigation = Some(source);
        self
    }

    #[must_use]
    pub fn components(mut self, source: Arc<dyn ComponentSource>) -> Self {
        self.components = Some(source);
        self
    }

    #[must_use]
    pub fn content(mut self, source: Arc<dyn ContentSource>) -> Self {
        self.content = Some(source);
        self
    }

    /// Uses one in-memory store for every collaborator.
    #[cfg(feature = "memory")]
    #[must_use]
    pub fn with_store(self, store: clic_store::MemoryStore) -> Self {
        let store = Arc::new(store);
        self.tags(store.clone()).navigation(store.clone()).components(store.clone()).content(store)
    }

    /// # Errors
    /// Returns [`EngineError::Internal`] when a collaborator was not provided.
    pub fn build(self) -> Result<SiteEngine, EngineError> {
        let Self { config, tags, navigation, components, content } = self;
        let tags = tags.ok_or("Tag source not configured")?;
        let navigation = navigation.ok_or("Navigation source not configured")?;
        let components = components.ok_or("Component source not configured")?;
        let content = content.ok_or("Content source not configured")?;

        let routes = RouteResolver::new(
            TagDictionary::new(tags, &config.catalog, &config.resolution),
            NavigationRegistry::new(navigation, &config.catalog, &config.resolution),
            Arc::clone(&content),
            &config.resolution,
        );
        let components = ComponentResolver::new(components, &config.composition);
        let data = DataResolver::new(content, &config.resolution);

        Ok(SiteEngine { inner: Arc::new(SiteEngineInner { config, routes, components, data }) })
    }
}
