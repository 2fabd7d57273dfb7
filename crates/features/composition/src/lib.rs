//! # Component composition
//!
//! Picks the components of a page from three scopes. For each component type the most specific
//! scope wins outright: a `page` record (matched by canonical page id) replaces a `pageType`
//! record (matched by page type key), which replaces a `tenant` record. Configurations are never
//! merged field by field.
//!
//! Site chrome types (`header`, `footer` by default) only ever come from tenant scope.

mod error;
mod resolver;

pub use crate::error::{CompositionError, CompositionErrorExt};
pub use crate::resolver::ComponentResolver;
