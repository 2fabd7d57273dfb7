use crate::error::{StoreError, StoreErrorExt};
use crate::filter::{lookup, matches_all};
use crate::fixture::{CategoryEntry, ContentEntry, SiteFixture, is_kind, same_collection};
use async_trait::async_trait;
use clic_domain::{
    AggregateKind, CATEGORY_FIELD, CategoryCount, ComponentRecord, ContentKind, ContentPayload,
    ContentQuery, DataType, NavigationConfig, Tag,
};
use clic_kernel::prelude::*;
use parking_lot::RwLock;
use serde_json::{Map, Value, json};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Numeric item field summarized by the `stats` aggregate.
pub const PRICE_FIELD: &str = "price";
/// Boolean item field selecting the `carrusel` aggregate.
pub const FEATURED_FIELD: &str = "featured";

/// A thread-safe, cheaply clonable in-memory site store.
///
/// Reads take a shared lock and never await while holding it. The `replace_*` methods swap a
/// whole table at once, which is how tests simulate catalog edits between reloads.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<SiteFixture>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(fixture: SiteFixture) -> Self {
        Self { tables: Arc::new(RwLock::new(fixture)) }
    }

    /// Parses a JSON [`SiteFixture`].
    ///
    /// # Errors
    /// Returns [`StoreError::Json`] when the document does not match the fixture layout.
    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        let fixture: SiteFixture = serde_json::from_str(raw).context("Parsing site fixture")?;
        Ok(Self::new(fixture))
    }

    /// Reads and parses a JSON fixture file.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] when the file cannot be read and [`StoreError::Json`] when
    /// it is not a valid fixture.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .context(format!("Reading fixture {}", path.display()))?;
        let store = Self::from_json(&raw)?;

        {
            let tables = store.tables.read();
            info!(
                fixture = %path.display(),
                tags = tables.tags.len(),
                navigation = tables.navigation.len(),
                components = tables.components.len(),
                content = tables.content.len(),
                "Site fixture loaded"
            );
        }
        Ok(store)
    }

    /// A copy of every table.
    #[must_use]
    pub fn snapshot(&self) -> SiteFixture {
        self.tables.read().clone()
    }

    /// Every tenant referenced by any table, sorted.
    #[must_use]
    pub fn tenants(&self) -> Vec<TenantId> {
        let tables = self.tables.read();
        let mut tenants: Vec<TenantId> = tables
            .tags
            .iter()
            .filter_map(|t| t.tenant_id.clone())
            .chain(tables.navigation.iter().filter_map(|n| n.tenant_id.clone()))
            .chain(tables.components.iter().map(|c| c.tenant_id.clone()))
            .chain(tables.content.iter().map(|c| c.tenant_id.clone()))
            .chain(tables.categories.iter().map(|c| c.tenant_id.clone()))
            .collect();
        tenants.sort();
        tenants.dedup();
        tenants
    }

    pub fn replace_tags(&self, tags: Vec<Tag>) {
        self.tables.write().tags = tags;
    }

    pub fn replace_navigation(&self, navigation: Vec<NavigationConfig>) {
        self.tables.write().navigation = navigation;
    }

    pub fn replace_components(&self, components: Vec<ComponentRecord>) {
        self.tables.write().components = components;
    }

    pub fn replace_content(&self, content: Vec<ContentEntry>) {
        self.tables.write().content = content;
    }

    pub fn replace_categories(&self, categories: Vec<CategoryEntry>) {
        self.tables.write().categories = categories;
    }

    fn answer(&self, query: &ContentQuery) -> ContentPayload {
        let tables = self.tables.read();
        let items_of = |kind: ContentKind| {
            tables
                .content
                .iter()
                .filter(move |e| e.tenant_id == query.tenant_id && is_kind(&e.collection, kind))
                .map(|e| &e.data)
                .filter(move |data| matches_all(data, &query.filters))
        };

        match query.data_type {
            DataType::List(kind) => {
                let matching: Vec<&Map<String, Value>> = items_of(kind).collect();
                let total = matching.len() as u64;
                let window = match query.page {
                    Some(page) => {
                        matching.into_iter().skip(page.offset()).take(page.limit as usize).collect()
                    },
                    None => matching,
                };
                let items = window.into_iter().cloned().map(Value::Object).collect();
                ContentPayload::Page { items, total }
            },
            DataType::Single(kind) => {
                ContentPayload::Item(items_of(kind).next().cloned().map(Value::Object))
            },
            DataType::Category(kind) => {
                ContentPayload::Categories(category_counts(&tables, query, items_of(kind)))
            },
            DataType::Aggregate(AggregateKind::Stats) => {
                ContentPayload::Aggregate(stats(&tables, query, items_of(ContentKind::Properties)))
            },
            DataType::Aggregate(AggregateKind::Carousel) => {
                let featured = items_of(ContentKind::Properties)
                    .filter(|data| data.get(FEATURED_FIELD).and_then(Value::as_bool) == Some(true))
                    .cloned()
                    .map(Value::Object)
                    .collect();
                ContentPayload::Aggregate(Value::Array(featured))
            },
            DataType::Aggregate(AggregateKind::LooseText) => ContentPayload::Aggregate(Value::Null),
        }
    }
}

/// Declared categories first (in table order), then slugs only found on items.
fn category_counts<'a>(
    tables: &SiteFixture,
    query: &ContentQuery,
    items: impl Iterator<Item = &'a Map<String, Value>>,
) -> Vec<CategoryCount> {
    let DataType::Category(kind) = query.data_type else {
        return Vec::new();
    };

    let mut counts: Vec<CategoryCount> = tables
        .categories
        .iter()
        .filter(|c| c.tenant_id == query.tenant_id && is_kind(&c.collection, kind))
        .map(|c| CategoryCount { slug: c.slug.clone(), label: c.label.clone(), count: 0 })
        .collect();

    for slug in items.filter_map(|data| lookup(data, CATEGORY_FIELD).and_then(Value::as_str)) {
        match counts.iter_mut().find(|c| c.slug == slug) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount { slug: slug.to_owned(), label: None, count: 1 }),
        }
    }
    counts
}

/// Item count per collection plus price range of the matching properties.
fn stats<'a>(
    tables: &SiteFixture,
    query: &ContentQuery,
    properties: impl Iterator<Item = &'a Map<String, Value>>,
) -> Value {
    let mut counts = Map::new();
    for entry in tables.content.iter().filter(|e| e.tenant_id == query.tenant_id) {
        let key = ContentKind::from_str(&entry.collection)
            .map_or_else(|_| entry.collection.clone(), |kind| kind.to_string());
        let slot = counts.entry(key).or_insert_with(|| json!(0));
        *slot = json!(slot.as_u64().unwrap_or_default() + 1);
    }

    let prices: Vec<f64> =
        properties.filter_map(|data| data.get(PRICE_FIELD).and_then(Value::as_f64)).collect();
    let price = if prices.is_empty() {
        Value::Null
    } else {
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        #[allow(clippy::cast_precision_loss)]
        let avg = prices.iter().sum::<f64>() / prices.len() as f64;
        json!({ "min": min, "max": max, "avg": avg })
    };

    json!({ "counts": counts, "price": price })
}

#[async_trait]
impl TagSource for MemoryStore {
    async fn list_tags(&self, tenant: Option<&TenantId>) -> Result<Vec<Tag>, RepositoryError> {
        let tables = self.tables.read();
        Ok(tables.tags.iter().filter(|t| t.tenant_id.as_ref() == tenant).cloned().collect())
    }
}

#[async_trait]
impl NavigationSource for MemoryStore {
    async fn list_navigation_configs(
        &self,
        tenant: Option<&TenantId>,
    ) -> Result<Vec<NavigationConfig>, RepositoryError> {
        let tables = self.tables.read();
        Ok(tables.navigation.iter().filter(|n| n.tenant_id.as_ref() == tenant).cloned().collect())
    }
}

#[async_trait]
impl ComponentSource for MemoryStore {
    async fn list_component_records(
        &self,
        tenant: &TenantId,
        _identity: &PageIdentity,
    ) -> Result<Vec<ComponentRecord>, RepositoryError> {
        let tables = self.tables.read();
        Ok(tables.components.iter().filter(|c| &c.tenant_id == tenant).cloned().collect())
    }
}

#[async_trait]
impl ContentSource for MemoryStore {
    async fn fetch_content(&self, query: &ContentQuery) -> Result<ContentPayload, RepositoryError> {
        debug!(
            tenant = %query.tenant_id,
            data_type = %query.data_type,
            filters = query.filters.len(),
            "Serving content query"
        );
        Ok(self.answer(query))
    }

    async fn has_category(
        &self,
        tenant: &TenantId,
        content_type: &str,
        slug: &str,
    ) -> Result<bool, RepositoryError> {
        let tables = self.tables.read();
        let declared = tables.categories.iter().any(|c| {
            &c.tenant_id == tenant && c.slug == slug && same_collection(&c.collection, content_type)
        });
        let used = || {
            tables.content.iter().any(|e| {
                &e.tenant_id == tenant
                    && same_collection(&e.collection, content_type)
                    && lookup(&e.data, CATEGORY_FIELD).and_then(Value::as_str) == Some(slug)
            })
        };
        Ok(declared || used())
    }
}
