use crate::error::{CompositionError, CompositionErrorExt};
use clic_domain::config::CompositionConfig;
use clic_domain::{ComponentRecord, ComponentScope, PageIdentity, TenantId};
use clic_kernel::ComponentSource;
use fxhash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Scopes in lookup order, most specific first.
const CASCADE: [ComponentScope; 3] =
    [ComponentScope::Page, ComponentScope::PageType, ComponentScope::Tenant];

/// Resolves the ordered component list of a page.
#[derive(Debug, Clone)]
pub struct ComponentResolver {
    source: Arc<dyn ComponentSource>,
    global_types: Arc<FxHashSet<String>>,
}

impl ComponentResolver {
    #[must_use]
    pub fn new(source: Arc<dyn ComponentSource>, config: &CompositionConfig) -> Self {
        Self { source, global_types: Arc::new(config.global_types.iter().cloned().collect()) }
    }

    /// Fetches the tenant's records and keeps, per type, the one from the most specific scope.
    ///
    /// The result is sorted by `order_index`, ties by type name. An empty list is a valid page.
    ///
    /// # Errors
    /// Returns [`CompositionError::Repository`] when the component source fails.
    #[instrument(skip_all, fields(%tenant, page_type = %identity.page_type))]
    pub async fn resolve_components(
        &self,
        tenant: &TenantId,
        identity: &PageIdentity,
    ) -> Result<Vec<ComponentRecord>, CompositionError> {
        let records = self
            .source
            .list_component_records(tenant, identity)
            .await
            .context("Listing component records")?;

        let components = self.compose(tenant, identity, records);
        if components.is_empty() {
            debug!(page_id = %identity.page_id(), "No components resolved for page");
        } else {
            debug!(count = components.len(), "Components resolved");
        }
        Ok(components)
    }

    /// Pure cascade over already fetched records.
    #[must_use]
    pub fn compose(
        &self,
        tenant: &TenantId,
        identity: &PageIdentity,
        records: Vec<ComponentRecord>,
    ) -> Vec<ComponentRecord> {
        let page_id = identity.page_id();
        let page_type_key = identity.page_type.key();

        let mut layers: FxHashMap<ComponentScope, Vec<ComponentRecord>> = FxHashMap::default();
        for record in records {
            if !record.active || &record.tenant_id != tenant {
                continue;
            }
            if !record.has_consistent_scope() {
                warn!(
                    id = %record.id,
                    scope = ?record.scope,
                    "Skipping component record whose locators disagree with its scope"
                );
                continue;
            }
            let applies = match record.scope {
                ComponentScope::Tenant => true,
                ComponentScope::PageType => {
                    record.page_type_key.as_deref() == Some(page_type_key.as_ref())
                },
                ComponentScope::Page => record.page_id.as_deref() == Some(page_id.as_str()),
            };
            if applies {
                layers.entry(record.scope).or_default().push(record);
            }
        }

        let mut chosen: FxHashMap<String, ComponentRecord> = FxHashMap::default();
        for scope in CASCADE {
            let Some(mut layer) = layers.remove(&scope) else {
                continue;
            };
            layer.sort_by(|a, b| a.order_index.cmp(&b.order_index).then_with(|| a.id.cmp(&b.id)));

            for record in layer {
                let is_global = self.global_types.contains(&record.component_type);
                if is_global && scope != ComponentScope::Tenant {
                    debug!(
                        id = %record.id,
                        component = %record.component_type,
                        "Global type ignored outside tenant scope"
                    );
                    continue;
                }
                chosen.entry(record.component_type.clone()).or_insert(record);
            }
        }

        let mut components: Vec<ComponentRecord> = chosen.into_values().collect();
        components.sort_by(|a, b| {
            a.order_index.cmp(&b.order_index).then_with(|| a.component_type.cmp(&b.component_type))
        });
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stub::NoSource;
    use clic_domain::ComponentConfig;
    use serde_json::json;

    mod stub {
        use clic_domain::{ComponentRecord, PageIdentity, TenantId};
        use clic_kernel::{ComponentSource, RepositoryError};

        #[derive(Debug)]
        pub(super) struct NoSource;

        #[async_trait::async_trait]
        impl ComponentSource for NoSource {
            async fn list_component_records(
                &self,
                _tenant: &TenantId,
                _identity: &PageIdentity,
            ) -> Result<Vec<ComponentRecord>, RepositoryError> {
                Ok(Vec::new())
            }
        }
    }

    fn record(id: &str, kind: &str, scope: ComponentScope, order: i32) -> ComponentRecord {
        ComponentRecord {
            id: id.to_owned(),
            tenant_id: TenantId::from("demo"),
            component_type: kind.to_owned(),
            variant: "default".to_owned(),
            scope,
            page_type_key: (scope == ComponentScope::PageType).then(|| "homepage".to_owned()),
            page_id: (scope == ComponentScope::Page).then(|| "/".to_owned()),
            order_index: order,
            active: true,
            config: ComponentConfig {
                static_data: json!({ "id": id }),
                ..ComponentConfig::default()
            },
        }
    }

    fn resolver() -> ComponentResolver {
        ComponentResolver::new(Arc::new(NoSource), &CompositionConfig::default())
    }

    fn ids(records: &[ComponentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn most_specific_scope_wins_per_type() {
        let out = resolver().compose(
            &TenantId::from("demo"),
            &PageIdentity::homepage(),
            vec![
                record("hero-tenant", "hero", ComponentScope::Tenant, 1),
                record("hero-type", "hero", ComponentScope::PageType, 1),
                record("hero-page", "hero", ComponentScope::Page, 1),
                record("grid-type", "grid", ComponentScope::PageType, 2),
                record("grid-tenant", "grid", ComponentScope::Tenant, 2),
            ],
        );
        assert_eq!(ids(&out), vec!["hero-page", "grid-type"]);
        assert_eq!(out[0].config.static_data, json!({ "id": "hero-page" }));
    }

    #[test]
    fn global_types_only_come_from_tenant_scope() {
        let out = resolver().compose(
            &TenantId::from("demo"),
            &PageIdentity::homepage(),
            vec![
                record("header-page", "header", ComponentScope::Page, 0),
                record("header-tenant", "header", ComponentScope::Tenant, 0),
                record("footer-type", "footer", ComponentScope::PageType, 9),
            ],
        );
        assert_eq!(ids(&out), vec!["header-tenant"]);
    }

    #[test]
    fn inactive_inconsistent_and_foreign_records_are_dropped() {
        let mut inactive = record("hero-off", "hero", ComponentScope::Page, 0);
        inactive.active = false;
        let mut inconsistent = record("banner", "banner", ComponentScope::Page, 0);
        inconsistent.page_id = None;
        let mut foreign = record("cta", "cta", ComponentScope::Tenant, 0);
        foreign.tenant_id = TenantId::from("otra");

        let out = resolver().compose(
            &TenantId::from("demo"),
            &PageIdentity::homepage(),
            vec![inactive, inconsistent, foreign, record("hero", "hero", ComponentScope::Tenant, 0)],
        );
        assert_eq!(ids(&out), vec!["hero"]);
    }

    #[test]
    fn ordering_uses_index_then_type_name() {
        let out = resolver().compose(
            &TenantId::from("demo"),
            &PageIdentity::homepage(),
            vec![
                record("z", "zeta", ComponentScope::Tenant, 1),
                record("a", "alpha", ComponentScope::Tenant, 1),
                record("first", "intro", ComponentScope::Tenant, -5),
            ],
        );
        assert_eq!(ids(&out), vec!["first", "a", "z"]);
    }

    #[test]
    fn no_records_is_an_empty_page() {
        let out =
            resolver().compose(&TenantId::from("demo"), &PageIdentity::homepage(), Vec::new());
        assert!(out.is_empty());
    }
}
