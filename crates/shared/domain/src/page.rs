use crate::component::ResolvedComponent;
use crate::navigation::NavLevel;
use crate::tag::Tag;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// What kind of page a URL refers to.
///
/// Content variants carry the canonical prefix, which doubles as the content type key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageType {
    Homepage,
    PropertySearch,
    PropertySingle,
    Static(String),
    ContentList(String),
    ContentCategory(String),
    ContentSingle(String),
}

impl PageType {
    /// Key matched against `pageTypeKey` of page-type scoped components.
    #[must_use]
    pub fn key(&self) -> Cow<'_, str> {
        match self {
            Self::Homepage => Cow::Borrowed("homepage"),
            Self::PropertySearch => Cow::Borrowed("property_search"),
            Self::PropertySingle => Cow::Borrowed("property_single"),
            Self::Static(prefix) => Cow::Borrowed(prefix),
            Self::ContentList(prefix) => Cow::Owned(format!("{prefix}_list")),
            Self::ContentCategory(prefix) => Cow::Owned(format!("{prefix}_category")),
            Self::ContentSingle(prefix) => Cow::Owned(format!("{prefix}_single")),
        }
    }

    /// Canonical content prefix for pages resolved through the navigation registry.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::Homepage | Self::PropertySearch | Self::PropertySingle => None,
            Self::Static(prefix)
            | Self::ContentList(prefix)
            | Self::ContentCategory(prefix)
            | Self::ContentSingle(prefix) => Some(prefix),
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl Serialize for PageType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.key())
    }
}

/// In-memory description of what a URL refers to. Built per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageIdentity {
    pub page_type: PageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<NavLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_slug: Option<String>,
    pub filters: Vec<Tag>,
}

impl PageIdentity {
    #[must_use]
    pub const fn homepage() -> Self {
        Self {
            page_type: PageType::Homepage,
            level: None,
            category_slug: None,
            item_slug: None,
            filters: Vec::new(),
        }
    }

    /// Property search page, or a single property when `item_slug` is present.
    #[must_use]
    pub fn property(filters: Vec<Tag>, item_slug: Option<String>) -> Self {
        let page_type =
            if item_slug.is_some() { PageType::PropertySingle } else { PageType::PropertySearch };
        Self { page_type, level: None, category_slug: None, item_slug, filters }
    }

    /// Page resolved through a navigation prefix.
    #[must_use]
    pub const fn content(
        page_type: PageType,
        level: NavLevel,
        category_slug: Option<String>,
        item_slug: Option<String>,
    ) -> Self {
        Self { page_type, level: Some(level), category_slug, item_slug, filters: Vec::new() }
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.page_type.content_type()
    }

    /// Canonical path of the concrete page, used to match page-scoped components.
    ///
    /// Built from canonical prefixes and tag slugs, so every localized URL of a page
    /// shares one id. Tags are ordered by category priority, then slug, so segment order
    /// in the URL does not change the id.
    #[must_use]
    pub fn page_id(&self) -> String {
        let mut tags: Vec<&Tag> = self.filters.iter().collect();
        tags.sort_by(|a, b| {
            (a.category.priority(), a.slug.as_str()).cmp(&(b.category.priority(), b.slug.as_str()))
        });

        let mut segments: Vec<&str> = Vec::new();
        if let Some(prefix) = self.content_type() {
            segments.push(prefix);
        }
        segments.extend(tags.iter().map(|tag| tag.slug.as_str()));
        segments.extend(self.category_slug.as_deref());
        segments.extend(self.item_slug.as_deref());
        format!("/{}", segments.join("/"))
    }
}

/// The hydrated page handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPage {
    pub page_identity: PageIdentity,
    pub components: Vec<ResolvedComponent>,
}
