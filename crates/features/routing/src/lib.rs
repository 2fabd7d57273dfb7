//! # Route resolution
//!
//! Turns a request path into a [`PageIdentity`](clic_domain::PageIdentity):
//!
//! 1. The path is normalized and percent-decoded. An empty path is the homepage.
//! 2. A leading segment matching a navigation prefix selects a content page, classified by the
//!    prefix's level and the exact number of remaining segments.
//! 3. Anything else is a property search: segments are consumed as tags; a single trailing
//!    non-tag segment after at least one tag is the property slug.
//!
//! URLs that do not fit are a typed [`RouteResolution::NotFound`], never an error.

mod error;
mod resolver;

pub use crate::error::{RoutingError, RoutingErrorExt};
pub use crate::resolver::{NotFoundReason, NotFoundRoute, RouteResolution, RouteResolver};
