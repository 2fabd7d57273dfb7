use clic_kernel::RepositoryError;
use std::borrow::Cow;

/// A specialized [`CatalogError`] enum of this crate.
#[clic_derive::clic_error]
pub enum CatalogError {
    /// The tag or navigation source failed while an index was being built.
    #[error("Catalog source failed{}: {source}", format_context(.context))]
    Repository {
        #[source]
        source: RepositoryError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal catalog error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CatalogError {
    /// Recovers an owned error from the shared one handed out by the cache loader.
    pub(crate) fn from_shared(shared: std::sync::Arc<Self>) -> Self {
        std::sync::Arc::try_unwrap(shared).unwrap_or_else(|arc| Self::Internal {
            message: arc.to_string().into(),
            context: Some("Index loader error was shared by concurrent callers".into()),
        })
    }
}
