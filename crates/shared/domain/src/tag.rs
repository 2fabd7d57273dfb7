use crate::content::ContentFilter;
use crate::tenant::TenantId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Semantic family of a tag.
///
/// The declaration order is the collision priority: when one alias maps to tags of
/// several categories, the earliest category wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagCategory {
    Operation,
    PropertyType,
    Location,
    Filter,
    Amenity,
}

impl TagCategory {
    /// Collision rank, lower wins.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Operation => 0,
            Self::PropertyType => 1,
            Self::Location => 2,
            Self::Filter => 3,
            Self::Amenity => 4,
        }
    }
}

/// Comparison applied by a filter against a content field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "=", alias = "eq")]
    Eq,
    #[serde(rename = "!=", alias = "ne")]
    Ne,
    #[serde(rename = ">", alias = "gt")]
    Gt,
    #[serde(rename = ">=", alias = "gte")]
    Gte,
    #[serde(rename = "<", alias = "lt")]
    Lt,
    #[serde(rename = "<=", alias = "lte")]
    Lte,
    /// Array containment (`amenidades @> ['gym']`).
    #[serde(rename = "@>", alias = "contains")]
    Contains,
    #[serde(rename = "in")]
    In,
}

impl FilterOperator {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Contains => "@>",
            Self::In => "in",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A URL vocabulary entry mapping a path segment to a content filter.
///
/// `slug` is the default-language form of the segment; `language_aliases` holds the
/// localized forms keyed by language code. A tag without `tenant_id` is global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub slug: String,
    pub category: TagCategory,
    pub target_field: String,
    pub operator: FilterOperator,
    pub value: Value,
    #[serde(default)]
    pub language_aliases: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "enabled")]
    pub active: bool,
}

impl Tag {
    /// Localized alias for `language`, if one is configured.
    #[must_use]
    pub fn alias(&self, language: &str) -> Option<&str> {
        self.language_aliases.get(language).map(String::as_str)
    }

    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.tenant_id.is_none()
    }

    /// The content filter this tag stands for.
    #[must_use]
    pub fn to_filter(&self) -> ContentFilter {
        ContentFilter {
            field: self.target_field.clone(),
            operator: self.operator,
            value: self.value.clone(),
        }
    }
}

const fn enabled() -> bool {
    true
}
