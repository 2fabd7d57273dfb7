use clic_kernel::RepositoryError;
use std::borrow::Cow;

#[clic_derive::clic_error]
pub enum CompositionError {
    #[error("Component source failed{}: {source}", format_context(.context))]
    Repository {
        #[source]
        source: RepositoryError,
        context: Option<Cow<'static, str>>,
    },
}
