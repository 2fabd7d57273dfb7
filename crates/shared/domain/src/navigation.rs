use crate::tenant::TenantId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Hierarchical depth of a content prefix.
///
/// Serialized as its numeric depth (`0`, `1`, `2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NavLevel {
    /// `/{prefix}` is a single static page with no children.
    Static,
    /// `/{prefix}` lists, `/{prefix}/{item}` is a single item.
    Items,
    /// `/{prefix}` lists, `/{prefix}/{category}` lists by category,
    /// `/{prefix}/{category}/{item}` is a single item.
    Categorized,
}

impl NavLevel {
    #[must_use]
    pub const fn depth(self) -> u8 {
        match self {
            Self::Static => 0,
            Self::Items => 1,
            Self::Categorized => 2,
        }
    }

    #[must_use]
    pub const fn from_depth(depth: u8) -> Option<Self> {
        match depth {
            0 => Some(Self::Static),
            1 => Some(Self::Items),
            2 => Some(Self::Categorized),
            _ => None,
        }
    }
}

impl Serialize for NavLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.depth())
    }
}

impl<'de> Deserialize<'de> for NavLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let depth = u8::deserialize(deserializer)?;
        Self::from_depth(depth).ok_or_else(|| {
            serde::de::Error::custom(format!("navigation level must be 0, 1 or 2, got {depth}"))
        })
    }
}

/// Declares how a tenant's URL prefix is structured.
///
/// A config without `tenant_id` is the system default for that prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    /// Canonical prefix, also the content type key (e.g. `testimonios`).
    pub prefix: String,
    pub level: NavLevel,
    #[serde(default)]
    pub language_aliases: BTreeMap<String, String>,
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Breaks alias collisions between prefixes; higher wins.
    #[serde(default)]
    pub priority: i32,
}

impl NavigationConfig {
    #[must_use]
    pub fn alias(&self, language: &str) -> Option<&str> {
        self.language_aliases.get(language).map(String::as_str)
    }

    /// Prefix as it appears in URLs for `language`.
    #[must_use]
    pub fn localized_prefix(&self, language: &str) -> &str {
        self.alias(language).unwrap_or(&self.prefix)
    }

    /// Whether `segment` is the canonical prefix or any of its aliases.
    #[must_use]
    pub fn matches(&self, segment: &str) -> bool {
        self.prefix == segment || self.language_aliases.values().any(|alias| alias == segment)
    }
}

const fn enabled() -> bool {
    true
}
