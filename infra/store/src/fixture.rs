//! Serializable snapshot of everything a site needs.

use clic_domain::{ComponentRecord, ContentKind, NavigationConfig, Tag, TenantId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Tables of a [`MemoryStore`](crate::MemoryStore).
///
/// Every table is optional in JSON; a missing one is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteFixture {
    pub tags: Vec<Tag>,
    pub navigation: Vec<NavigationConfig>,
    pub components: Vec<ComponentRecord>,
    pub content: Vec<ContentEntry>,
    pub categories: Vec<CategoryEntry>,
}

/// One content item of a collection.
///
/// `collection` accepts any label of [`ContentKind`] (`properties`, `testimonios`, ...) or a
/// free-form prefix for collections only reachable through navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub tenant_id: TenantId,
    pub collection: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// A taxonomy entry declared independently of the items that use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntry {
    pub tenant_id: TenantId,
    pub collection: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Whether two collection labels designate the same collection.
///
/// Labels match verbatim or when both parse to the same [`ContentKind`], so
/// `testimonios` and `testimonials` are interchangeable.
pub(crate) fn same_collection(stored: &str, requested: &str) -> bool {
    stored == requested
        || matches!(
            (ContentKind::from_str(stored), ContentKind::from_str(requested)),
            (Ok(a), Ok(b)) if a == b
        )
}

/// Whether a stored collection label designates `kind`.
pub(crate) fn is_kind(stored: &str, kind: ContentKind) -> bool {
    ContentKind::from_str(stored).is_ok_and(|parsed| parsed == kind)
}
