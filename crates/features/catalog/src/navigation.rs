//! Navigation level registry: per-tenant content prefixes and their depth.
//!
//! The effective configuration of a tenant is the set of system defaults with tenant overrides
//! replacing them prefix by prefix. A disabled override hides its prefix entirely. Two rows of
//! one set declaring the same prefix are recorded as a [`NavigationConflict`].

use crate::error::{CatalogError, CatalogErrorExt};
use crate::index_cache;
use clic_domain::config::{CatalogConfig, ResolutionConfig};
use clic_domain::{NavLevel, NavigationConfig, TenantId};
use clic_kernel::NavigationSource;
use fxhash::FxHashMap;
use moka::future::Cache;
use serde::Serialize;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Which row set a navigation config was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationScope {
    System,
    Tenant,
}

/// Two rows of the same scope declaring one prefix. Only `kept` takes effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationConflict {
    pub scope: NavigationScope,
    pub prefix: String,
    pub kept: NavLevel,
    pub shadowed: NavLevel,
}

/// Effective navigation of one tenant.
#[derive(Debug, Default)]
pub(crate) struct NavigationIndex {
    by_prefix: FxHashMap<String, Arc<NavigationConfig>>,
    /// language → alias → config
    aliases: FxHashMap<String, FxHashMap<String, Arc<NavigationConfig>>>,
    conflicts: Vec<NavigationConflict>,
}

impl NavigationIndex {
    fn build(defaults: Vec<NavigationConfig>, overrides: Vec<NavigationConfig>) -> Self {
        let mut index = Self::default();
        let mut effective = dedupe(NavigationScope::System, defaults, &mut index.conflicts);
        effective.extend(dedupe(NavigationScope::Tenant, overrides, &mut index.conflicts));

        for config in effective.into_values().filter(|c| c.enabled).map(Arc::new) {
            for (language, alias) in &config.language_aliases {
                let slot = index.aliases.entry(language.clone()).or_default();
                match slot.get(alias) {
                    Some(current) if !outranks(&config, current) => {
                        warn!(
                            alias,
                            language,
                            kept = %current.prefix,
                            shadowed = %config.prefix,
                            "Navigation alias conflict"
                        );
                    },
                    Some(current) => {
                        warn!(
                            alias,
                            language,
                            kept = %config.prefix,
                            shadowed = %current.prefix,
                            "Navigation alias conflict"
                        );
                        slot.insert(alias.clone(), Arc::clone(&config));
                    },
                    None => {
                        slot.insert(alias.clone(), Arc::clone(&config));
                    },
                }
            }
            index.by_prefix.insert(config.prefix.clone(), config);
        }
        index
    }

    /// Requested-language alias, default-language alias, canonical prefix, then any alias.
    fn match_segment(
        &self,
        language: &str,
        default_language: &str,
        segment: &str,
    ) -> Option<&Arc<NavigationConfig>> {
        let localized = |lang: &str| self.aliases.get(lang).and_then(|m| m.get(segment));

        localized(language)
            .or_else(|| localized(default_language))
            .or_else(|| self.by_prefix.get(segment))
            .or_else(|| {
                self.by_prefix
                    .values()
                    .filter(|c| c.matches(segment))
                    .reduce(|best, c| if outranks(c, best) { c } else { best })
            })
    }
}

/// One config per prefix within a row set. Higher `priority` wins, then the earlier row.
fn dedupe(
    scope: NavigationScope,
    rows: Vec<NavigationConfig>,
    conflicts: &mut Vec<NavigationConflict>,
) -> FxHashMap<String, NavigationConfig> {
    let mut unique: FxHashMap<String, NavigationConfig> = FxHashMap::default();
    for config in rows {
        let Some(current) = unique.get(&config.prefix) else {
            unique.insert(config.prefix.clone(), config);
            continue;
        };
        let replaces = config.priority > current.priority;
        let (kept, shadowed) =
            if replaces { (config.level, current.level) } else { (current.level, config.level) };
        warn!(?scope, prefix = %config.prefix, ?kept, ?shadowed, "Duplicate navigation prefix");
        conflicts.push(NavigationConflict { scope, prefix: config.prefix.clone(), kept, shadowed });
        if replaces {
            unique.insert(config.prefix.clone(), config);
        }
    }
    unique
}

/// Higher `priority` wins; ties fall back to the prefix for a stable answer.
fn outranks(candidate: &NavigationConfig, current: &NavigationConfig) -> bool {
    candidate
        .priority
        .cmp(&current.priority)
        .then_with(|| current.prefix.cmp(&candidate.prefix))
        .is_gt()
}

#[derive(Debug)]
pub struct NavigationRegistryInner {
    source: Arc<dyn NavigationSource>,
    default_language: String,
    indexes: Cache<TenantId, Arc<NavigationIndex>>,
}

/// Per-tenant navigation levels backed by a [`NavigationSource`].
#[derive(Debug, Clone)]
pub struct NavigationRegistry {
    inner: Arc<NavigationRegistryInner>,
}

impl Deref for NavigationRegistry {
    type Target = NavigationRegistryInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl NavigationRegistry {
    #[must_use]
    pub fn new(
        source: Arc<dyn NavigationSource>,
        catalog: &CatalogConfig,
        resolution: &ResolutionConfig,
    ) -> Self {
        Self {
            inner: Arc::new(NavigationRegistryInner {
                source,
                default_language: resolution.default_language.clone(),
                indexes: index_cache(catalog),
            }),
        }
    }

    /// Effective configuration of a canonical prefix: tenant override first, then the system
    /// default. `None` when the prefix is unknown or disabled.
    ///
    /// # Errors
    /// Returns [`CatalogError::Repository`] when the tenant index cannot be built.
    pub async fn get_level(
        &self,
        tenant: &TenantId,
        prefix: &str,
    ) -> Result<Option<NavigationConfig>, CatalogError> {
        let index = self.index(tenant).await?;
        Ok(index.by_prefix.get(prefix).map(|c| c.as_ref().clone()))
    }

    /// Matches a decoded URL segment against canonical prefixes and their aliases.
    ///
    /// # Errors
    /// Returns [`CatalogError::Repository`] when the tenant index cannot be built.
    pub async fn match_prefix(
        &self,
        tenant: &TenantId,
        language: &str,
        segment: &str,
    ) -> Result<Option<NavigationConfig>, CatalogError> {
        let index = self.index(tenant).await?;
        let hit = index.match_segment(language, &self.default_language, segment);
        debug!(%tenant, language, segment, prefix = hit.map(|c| c.prefix.as_str()), "Prefix match");
        Ok(hit.map(|c| c.as_ref().clone()))
    }

    /// Duplicate prefixes found in the system defaults or in the tenant's overrides.
    ///
    /// # Errors
    /// Returns [`CatalogError::Repository`] when the tenant index cannot be built.
    pub async fn conflicts(
        &self,
        tenant: &TenantId,
    ) -> Result<Vec<NavigationConflict>, CatalogError> {
        Ok(self.index(tenant).await?.conflicts.clone())
    }

    /// Drops and synchronously rebuilds the tenant index.
    ///
    /// # Errors
    /// Returns [`CatalogError::Repository`] when the rebuild fails.
    #[instrument(skip_all, fields(%tenant))]
    pub async fn reload(&self, tenant: &TenantId) -> Result<(), CatalogError> {
        self.indexes.invalidate(tenant).await;
        let index = self.index(tenant).await?;
        info!(prefixes = index.by_prefix.len(), "Navigation index reloaded");
        Ok(())
    }

    pub fn invalidate_all(&self) {
        self.indexes.invalidate_all();
    }

    async fn index(&self, tenant: &TenantId) -> Result<Arc<NavigationIndex>, CatalogError> {
        self.indexes
            .try_get_with(tenant.clone(), async {
                let defaults = self
                    .source
                    .list_navigation_configs(None)
                    .await
                    .context("Listing default navigation")?;
                let overrides = self
                    .source
                    .list_navigation_configs(Some(tenant))
                    .await
                    .context("Listing tenant navigation")?;
                let index = NavigationIndex::build(defaults, overrides);
                debug!(%tenant, prefixes = index.by_prefix.len(), "Navigation index built");
                Ok::<_, CatalogError>(Arc::new(index))
            })
            .await
            .map_err(CatalogError::from_shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(
        prefix: &str,
        level: NavLevel,
        priority: i32,
        aliases: &[(&str, &str)],
    ) -> NavigationConfig {
        NavigationConfig {
            tenant_id: None,
            prefix: prefix.to_owned(),
            level,
            language_aliases: aliases
                .iter()
                .map(|(l, a)| ((*l).to_owned(), (*a).to_owned()))
                .collect(),
            enabled: true,
            priority,
        }
    }

    #[test]
    fn overrides_replace_defaults_and_disabled_hides() {
        let mut hidden = nav("blog", NavLevel::Items, 0, &[]);
        hidden.enabled = false;
        let index = NavigationIndex::build(
            vec![nav("blog", NavLevel::Items, 0, &[]), nav("videos", NavLevel::Items, 0, &[])],
            vec![hidden, nav("videos", NavLevel::Categorized, 0, &[])],
        );

        assert!(!index.by_prefix.contains_key("blog"));
        assert_eq!(index.by_prefix["videos"].level, NavLevel::Categorized);
    }

    #[test]
    fn duplicate_prefixes_in_one_row_set_are_reported() {
        let index = NavigationIndex::build(
            vec![nav("blog", NavLevel::Items, 0, &[]), nav("blog", NavLevel::Categorized, 0, &[])],
            vec![
                nav("videos", NavLevel::Items, 0, &[]),
                nav("videos", NavLevel::Categorized, 5, &[]),
            ],
        );

        assert_eq!(index.by_prefix["blog"].level, NavLevel::Items);
        assert_eq!(index.by_prefix["videos"].level, NavLevel::Categorized);
        assert_eq!(
            index.conflicts,
            vec![
                NavigationConflict {
                    scope: NavigationScope::System,
                    prefix: "blog".to_owned(),
                    kept: NavLevel::Items,
                    shadowed: NavLevel::Categorized,
                },
                NavigationConflict {
                    scope: NavigationScope::Tenant,
                    prefix: "videos".to_owned(),
                    kept: NavLevel::Categorized,
                    shadowed: NavLevel::Items,
                },
            ]
        );
    }

    #[test]
    fn an_override_of_a_default_is_not_a_conflict() {
        let index = NavigationIndex::build(
            vec![nav("blog", NavLevel::Items, 0, &[])],
            vec![nav("blog", NavLevel::Static, 0, &[])],
        );

        assert!(index.conflicts.is_empty());
        assert_eq!(index.by_prefix["blog"].level, NavLevel::Static);
    }

    #[test]
    fn alias_collisions_prefer_higher_priority() {
        let index = NavigationIndex::build(
            vec![
                nav("noticias", NavLevel::Items, 0, &[("es", "novedades")]),
                nav("blog", NavLevel::Items, 3, &[("es", "novedades")]),
            ],
            Vec::new(),
        );

        let hit = index.match_segment("es", "es", "novedades").map(|c| c.prefix.as_str());
        assert_eq!(hit, Some("blog"));
    }

    #[test]
    fn requested_language_before_canonical_prefix() {
        let index = NavigationIndex::build(
            vec![
                nav("contacto", NavLevel::Static, 0, &[("en", "contact")]),
                nav("contact", NavLevel::Static, 0, &[]),
            ],
            Vec::new(),
        );

        let en = index.match_segment("en", "es", "contact").map(|c| c.prefix.as_str());
        assert_eq!(en, Some("contacto"));
        let es = index.match_segment("es", "es", "contact").map(|c| c.prefix.as_str());
        assert_eq!(es, Some("contact"));
        let fr = index.match_segment("fr", "es", "contacto").map(|c| c.prefix.as_str());
        assert_eq!(fr, Some("contacto"));
    }
}
