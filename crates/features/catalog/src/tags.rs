//! Tag dictionary: maps URL segments to semantic property filters.
//!
//! Lookup tiers, first hit wins:
//! 1. tenant alias in the requested language, then global alias in that language;
//! 2. the same two tiers in the default language;
//! 3. exact slug, tenant first, then global.
//!
//! Segments are compared verbatim. Inside a tier, colliding tags are ranked by category
//! (`operation > propertyType > location > filter > amenity`), then `order`, then slug; every
//! collision is kept as a [`TagConflict`] for authoring audits.

use crate::error::{CatalogError, CatalogErrorExt};
use crate::index_cache;
use clic_domain::config::{CatalogConfig, ResolutionConfig};
use clic_domain::{Tag, TenantId};
use clic_kernel::TagSource;
use fxhash::FxHashMap;
use moka::future::Cache;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Ownership tier of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagScope {
    Tenant,
    Global,
}

/// Two active tags claiming the same segment inside one lookup tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagConflict {
    pub scope: TagScope,
    /// Alias language, `None` for slug collisions.
    pub language: Option<String>,
    pub segment: String,
    /// Slug of the tag that wins lookups.
    pub kept: String,
    pub shadowed: String,
}

impl fmt::Display for TagConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self.scope {
            TagScope::Tenant => "tenant",
            TagScope::Global => "global",
        };
        match &self.language {
            Some(lang) => write!(f, "{scope} alias '{}' [{lang}]", self.segment)?,
            None => write!(f, "{scope} slug '{}'", self.segment)?,
        }
        write!(f, ": '{}' shadows '{}'", self.kept, self.shadowed)
    }
}

/// Ranking inside a tier; `Less` wins.
fn precedence(a: &Tag, b: &Tag) -> Ordering {
    a.category
        .priority()
        .cmp(&b.category.priority())
        .then(a.order.cmp(&b.order))
        .then_with(|| a.slug.cmp(&b.slug))
}

/// Segment lookups of one ownership tier.
#[derive(Debug, Default)]
struct Tier {
    /// language → alias → tag
    aliases: FxHashMap<String, FxHashMap<String, Arc<Tag>>>,
    slugs: FxHashMap<String, Arc<Tag>>,
}

impl Tier {
    fn build(scope: TagScope, tags: Vec<Tag>, conflicts: &mut Vec<TagConflict>) -> Self {
        let mut tier = Self::default();
        for tag in tags.into_iter().filter(|t| t.active).map(Arc::new) {
            for (language, alias) in &tag.language_aliases {
                let slot = tier.aliases.entry(language.clone()).or_default();
                insert_ranked(slot, alias, &tag, scope, Some(language.as_str()), conflicts);
            }
            insert_ranked(&mut tier.slugs, &tag.slug, &tag, scope, None, conflicts);
        }
        tier
    }

    fn alias(&self, language: &str, segment: &str) -> Option<&Arc<Tag>> {
        self.aliases.get(language)?.get(segment)
    }
}

fn insert_ranked(
    slot: &mut FxHashMap<String, Arc<Tag>>,
    segment: &str,
    candidate: &Arc<Tag>,
    scope: TagScope,
    language: Option<&str>,
    conflicts: &mut Vec<TagConflict>,
) {
    let Some(current) = slot.get(segment) else {
        slot.insert(segment.to_owned(), Arc::clone(candidate));
        return;
    };
    if current.slug == candidate.slug {
        return;
    }

    let (kept, shadowed) = if precedence(candidate, current).is_lt() {
        (Arc::clone(candidate), Arc::clone(current))
    } else {
        (Arc::clone(current), Arc::clone(candidate))
    };
    conflicts.push(TagConflict {
        scope,
        language: language.map(str::to_owned),
        segment: segment.to_owned(),
        kept: kept.slug.clone(),
        shadowed: shadowed.slug.clone(),
    });
    slot.insert(segment.to_owned(), kept);
}

/// Immutable lookup index of one tenant (its own tags plus the global vocabulary).
#[derive(Debug)]
pub(crate) struct TagIndex {
    tenant: Tier,
    global: Tier,
    conflicts: Vec<TagConflict>,
}

impl TagIndex {
    fn build(own: Vec<Tag>, global: Vec<Tag>) -> Self {
        let mut conflicts = Vec::new();
        let tenant = Tier::build(TagScope::Tenant, own, &mut conflicts);
        let global = Tier::build(TagScope::Global, global, &mut conflicts);
        Self { tenant, global, conflicts }
    }

    fn lookup(&self, language: &str, default_language: &str, segment: &str) -> Option<&Arc<Tag>> {
        let mut languages = vec![language];
        if default_language != language {
            languages.push(default_language);
        }

        languages
            .into_iter()
            .find_map(|lang| {
                self.tenant.alias(lang, segment).or_else(|| self.global.alias(lang, segment))
            })
            .or_else(|| self.tenant.slugs.get(segment))
            .or_else(|| self.global.slugs.get(segment))
    }
}

#[derive(Debug)]
pub struct TagDictionaryInner {
    source: Arc<dyn TagSource>,
    default_language: String,
    indexes: Cache<TenantId, Arc<TagIndex>>,
}

/// Per-tenant tag vocabulary backed by a [`TagSource`].
///
/// Cheap to clone; clones share the same cache.
///
/// # Example
/// ```rust
/// # use clic_catalog::TagDictionary;
/// # use clic_domain::config::{CatalogConfig, ResolutionConfig};
/// # use clic_domain::TenantId;
/// # use std::sync::Arc;
/// # async fn run(store: Arc<dyn clic_kernel::TagSource>) -> Result<(), clic_catalog::CatalogError> {
/// let tags = TagDictionary::new(store, &CatalogConfig::default(), &ResolutionConfig::default());
/// let venta = tags.lookup_tag(&TenantId::from("demo"), "es", "comprar").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TagDictionary {
    inner: Arc<TagDictionaryInner>,
}

impl Deref for TagDictionary {
    type Target = TagDictionaryInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl TagDictionary {
    #[must_use]
    pub fn new(
        source: Arc<dyn TagSource>,
        catalog: &CatalogConfig,
        resolution: &ResolutionConfig,
    ) -> Self {
        Self {
            inner: Arc::new(TagDictionaryInner {
                source,
                default_language: resolution.default_language.clone(),
                indexes: index_cache(catalog),
            }),
        }
    }

    /// Resolves a decoded URL segment to the tag it designates, if any.
    ///
    /// # Errors
    /// Returns [`CatalogError::Repository`] when the tenant index has to be built and the
    /// tag source fails.
    pub async fn lookup_tag(
        &self,
        tenant: &TenantId,
        language: &str,
        segment: &str,
    ) -> Result<Option<Tag>, CatalogError> {
        let index = self.index(tenant).await?;
        let hit = index.lookup(language, &self.default_language, segment);
        debug!(%tenant, language, segment, tag = hit.map(|t| t.slug.as_str()), "Tag lookup");
        Ok(hit.map(|tag| tag.as_ref().clone()))
    }

    /// Every alias or slug collision of the tenant index.
    ///
    /// # Errors
    /// Returns [`CatalogError::Repository`] when the index cannot be built.
    pub async fn conflicts(&self, tenant: &TenantId) -> Result<Vec<TagConflict>, CatalogError> {
        Ok(self.index(tenant).await?.conflicts.clone())
    }

    /// Drops and synchronously rebuilds the tenant index.
    ///
    /// # Errors
    /// Returns [`CatalogError::Repository`] when the rebuild fails; the tenant then has no
    /// cached index and the next lookup retries.
    #[instrument(skip_all, fields(%tenant))]
    pub async fn reload(&self, tenant: &TenantId) -> Result<(), CatalogError> {
        self.indexes.invalidate(tenant).await;
        let index = self.index(tenant).await?;
        info!(conflicts = index.conflicts.len(), "Tag index reloaded");
        Ok(())
    }

    /// Drops every cached index; each tenant rebuilds on next use.
    pub fn invalidate_all(&self) {
        self.indexes.invalidate_all();
    }

    async fn index(&self, tenant: &TenantId) -> Result<Arc<TagIndex>, CatalogError> {
        self.indexes
            .try_get_with(tenant.clone(), async {
                let own = self.source.list_tags(Some(tenant)).await.context("Listing tenant tags")?;
                let global = self.source.list_tags(None).await.context("Listing global tags")?;
                let index = TagIndex::build(own, global);

                for conflict in &index.conflicts {
                    warn!(%tenant, %conflict, "Tag alias conflict");
                }
                debug!(%tenant, conflicts = index.conflicts.len(), "Tag index built");
                Ok::<_, CatalogError>(Arc::new(index))
            })
            .await
            .map_err(CatalogError::from_shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clic_domain::{FilterOperator, TagCategory};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn tag(slug: &str, category: TagCategory, order: i32, aliases: &[(&str, &str)]) -> Tag {
        Tag {
            slug: slug.to_owned(),
            category,
            target_field: "field".to_owned(),
            operator: FilterOperator::Eq,
            value: json!(slug),
            language_aliases: aliases
                .iter()
                .map(|(l, a)| ((*l).to_owned(), (*a).to_owned()))
                .collect::<BTreeMap<_, _>>(),
            tenant_id: None,
            order,
            active: true,
        }
    }

    #[test]
    fn category_priority_decides_collisions() {
        let index = TagIndex::build(
            Vec::new(),
            vec![
                tag("club", TagCategory::Amenity, 0, &[("es", "premium")]),
                tag("lujo", TagCategory::Filter, 5, &[("es", "premium")]),
            ],
        );

        let hit = index.lookup("es", "es", "premium").map(|t| t.slug.as_str());
        assert_eq!(hit, Some("lujo"));
        assert_eq!(index.conflicts.len(), 1);
        assert_eq!(index.conflicts[0].kept, "lujo");
        assert_eq!(index.conflicts[0].shadowed, "club");
    }

    #[test]
    fn order_breaks_ties_inside_a_category() {
        let index = TagIndex::build(
            Vec::new(),
            vec![
                tag("b", TagCategory::Filter, 2, &[("es", "x")]),
                tag("a", TagCategory::Filter, 1, &[("es", "x")]),
            ],
        );
        assert_eq!(index.lookup("es", "es", "x").map(|t| t.slug.as_str()), Some("a"));
    }

    #[test]
    fn tenant_alias_beats_global_alias() {
        let index = TagIndex::build(
            vec![tag("venta-directa", TagCategory::Amenity, 9, &[("es", "comprar")])],
            vec![tag("venta", TagCategory::Operation, 0, &[("es", "comprar")])],
        );
        assert_eq!(index.lookup("es", "es", "comprar").map(|t| t.slug.as_str()), Some("venta-directa"));
        assert!(index.conflicts.is_empty());
    }

    #[test]
    fn default_language_then_slug_fallback() {
        let index = TagIndex::build(
            Vec::new(),
            vec![tag("venta", TagCategory::Operation, 0, &[("es", "comprar"), ("en", "buy")])],
        );

        assert_eq!(index.lookup("fr", "es", "comprar").map(|t| t.slug.as_str()), Some("venta"));
        assert_eq!(index.lookup("en", "es", "venta").map(|t| t.slug.as_str()), Some("venta"));
        assert!(index.lookup("en", "en", "comprar").is_none());
    }

    #[test]
    fn inactive_tags_are_not_indexed() {
        let mut hidden = tag("penthouse", TagCategory::PropertyType, 0, &[("es", "penthouse")]);
        hidden.active = false;
        let index = TagIndex::build(Vec::new(), vec![hidden]);
        assert!(index.lookup("es", "es", "penthouse").is_none());
    }
}
