use crate::error::{RoutingError, RoutingErrorExt};
use clic_catalog::{NavigationRegistry, TagDictionary};
use clic_domain::config::ResolutionConfig;
use clic_domain::{NavLevel, NavigationConfig, PageIdentity, PageType, TenantId};
use clic_kernel::ContentSource;
use clic_kernel::path::split_path;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Outcome of [`RouteResolver::resolve_path`].
#[derive(Debug, Clone, PartialEq)]
pub enum RouteResolution {
    Found(PageIdentity),
    NotFound(NotFoundRoute),
}

impl RouteResolution {
    #[must_use]
    pub const fn identity(&self) -> Option<&PageIdentity> {
        match self {
            Self::Found(identity) => Some(identity),
            Self::NotFound(_) => None,
        }
    }
}

/// A path that maps to no page of the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotFoundRoute {
    pub path: String,
    pub reason: NotFoundReason,
}

impl fmt::Display for NotFoundRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' not found: {}", self.path, self.reason)
    }
}

/// Why a path did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NotFoundReason {
    /// A segment is not valid percent-encoded UTF-8.
    MalformedPath { detail: String },
    /// The segment count after a navigation prefix does not fit its level.
    #[serde(rename_all = "camelCase")]
    SegmentCount { prefix: String, level: u8, extra_segments: usize },
    /// A single segment under a level-2 prefix that is not a known category.
    UnknownCategory { prefix: String, category: String },
    /// A property-search segment that is neither a tag nor a trailing item slug.
    UnmatchedSegment { segment: String, position: usize },
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedPath { detail } => write!(f, "malformed path ({detail})"),
            Self::SegmentCount { prefix, level, extra_segments } => write!(
                f,
                "'{prefix}' is a level {level} prefix and cannot take {extra_segments} segment(s)"
            ),
            Self::UnknownCategory { prefix, category } => {
                write!(f, "'{category}' is not a category of '{prefix}'")
            },
            Self::UnmatchedSegment { segment, position } => {
                write!(f, "segment {position} '{segment}' matches no tag")
            },
        }
    }
}

/// Resolves request paths against a tenant's tag dictionary and navigation registry.
#[derive(Debug, Clone)]
pub struct RouteResolver {
    tags: TagDictionary,
    navigation: NavigationRegistry,
    content: Arc<dyn ContentSource>,
    fetch_timeout: Duration,
}

impl RouteResolver {
    /// `content` is consulted to tell level-2 category listings from stray item slugs, bounded
    /// by `resolution.fetch_timeout_ms`.
    #[must_use]
    pub fn new(
        tags: TagDictionary,
        navigation: NavigationRegistry,
        content: Arc<dyn ContentSource>,
        resolution: &ResolutionConfig,
    ) -> Self {
        Self { tags, navigation, content, fetch_timeout: resolution.fetch_timeout() }
    }

    #[must_use]
    pub const fn tags(&self) -> &TagDictionary {
        &self.tags
    }

    #[must_use]
    pub const fn navigation(&self) -> &NavigationRegistry {
        &self.navigation
    }

    /// Maps `path` to the page it designates for `tenant`.
    ///
    /// # Errors
    /// Only infrastructure faults are errors: [`RoutingError::Catalog`] when a catalog index
    /// cannot be built, [`RoutingError::Repository`] when the category check fails and
    /// [`RoutingError::Timeout`] when it does not answer within the fetch timeout.
    #[instrument(skip(self, tenant), fields(%tenant), err)]
    pub async fn resolve_path(
        &self,
        tenant: &TenantId,
        language: &str,
        path: &str,
    ) -> Result<RouteResolution, RoutingError> {
        let segments = match split_path(path) {
            Ok(segments) => segments,
            Err(err) => {
                let reason = NotFoundReason::MalformedPath { detail: err.to_string() };
                return Ok(not_found(path, reason));
            },
        };

        let Some((head, rest)) = segments.split_first() else {
            return Ok(RouteResolution::Found(PageIdentity::homepage()));
        };

        let prefix = self
            .navigation
            .match_prefix(tenant, language, head)
            .await
            .context("Matching navigation prefix")?;

        let resolution = match prefix {
            Some(nav) => self.classify_content(tenant, path, nav, rest).await?,
            None => self.classify_search(tenant, language, path, &segments).await?,
        };

        match &resolution {
            RouteResolution::Found(identity) => {
                debug!(
                    page_type = %identity.page_type,
                    page_id = %identity.page_id(),
                    "Route resolved"
                );
            },
            RouteResolution::NotFound(route) => debug!(reason = %route.reason, "Route not found"),
        }
        Ok(resolution)
    }

    async fn classify_content(
        &self,
        tenant: &TenantId,
        path: &str,
        nav: NavigationConfig,
        rest: &[String],
    ) -> Result<RouteResolution, RoutingError> {
        let NavigationConfig { prefix, level, .. } = nav;

        let identity = match (level, rest) {
            (NavLevel::Static, []) => {
                PageIdentity::content(PageType::Static(prefix), level, None, None)
            },
            (NavLevel::Items | NavLevel::Categorized, []) => {
                PageIdentity::content(PageType::ContentList(prefix), level, None, None)
            },
            (NavLevel::Items, [item]) => PageIdentity::content(
                PageType::ContentSingle(prefix),
                level,
                None,
                Some(item.clone()),
            ),
            (NavLevel::Categorized, [category]) => {
                let check = self.content.has_category(tenant, &prefix, category);
                let known = tokio::time::timeout(self.fetch_timeout, check)
                    .await
                    .map_err(|_| RoutingError::Timeout {
                        message: format!("no answer within {} ms", self.fetch_timeout.as_millis())
                            .into(),
                        context: Some(format!("Checking category '{prefix}/{category}'").into()),
                    })?
                    .context("Checking category")?;
                if !known {
                    let reason =
                        NotFoundReason::UnknownCategory { prefix, category: category.clone() };
                    return Ok(not_found(path, reason));
                }
                PageIdentity::content(
                    PageType::ContentCategory(prefix),
                    level,
                    Some(category.clone()),
                    None,
                )
            },
            (NavLevel::Categorized, [category, item]) => PageIdentity::content(
                PageType::ContentSingle(prefix),
                level,
                Some(category.clone()),
                Some(item.clone()),
            ),
            _ => {
                let reason = NotFoundReason::SegmentCount {
                    prefix,
                    level: level.depth(),
                    extra_segments: rest.len(),
                };
                return Ok(not_found(path, reason));
            },
        };
        Ok(RouteResolution::Found(identity))
    }

    async fn classify_search(
        &self,
        tenant: &TenantId,
        language: &str,
        path: &str,
        segments: &[String],
    ) -> Result<RouteResolution, RoutingError> {
        let mut filters = Vec::with_capacity(segments.len());

        for (position, segment) in segments.iter().enumerate() {
            let tag = self
                .tags
                .lookup_tag(tenant, language, segment)
                .await
                .context("Looking up tag")?;
            if let Some(tag) = tag {
                filters.push(tag);
                continue;
            }

            let is_last = position + 1 == segments.len();
            if is_last && !filters.is_empty() {
                let identity = PageIdentity::property(filters, Some(segment.clone()));
                return Ok(RouteResolution::Found(identity));
            }
            let reason = NotFoundReason::UnmatchedSegment { segment: segment.clone(), position };
            return Ok(not_found(path, reason));
        }

        Ok(RouteResolution::Found(PageIdentity::property(filters, None)))
    }
}

fn not_found(path: &str, reason: NotFoundReason) -> RouteResolution {
    RouteResolution::NotFound(NotFoundRoute { path: path.to_owned(), reason })
}
