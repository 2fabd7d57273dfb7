use clic_catalog::CatalogError;
use clic_kernel::RepositoryError;
use std::borrow::Cow;

/// Infrastructure faults while resolving a route. Unknown URLs are not errors.
#[clic_derive::clic_error]
pub enum RoutingError {
    #[error("Catalog lookup failed{}: {source}", format_context(.context))]
    Catalog {
        #[source]
        source: CatalogError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Content source failed{}: {source}", format_context(.context))]
    Repository {
        #[source]
        source: RepositoryError,
        context: Option<Cow<'static, str>>,
    },

    /// The content source did not answer the category check in time.
    #[error("Category check timed out{}: {message}", format_context(.context))]
    Timeout { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
