use clic_domain::UnsupportedDataType;
use clic_kernel::RepositoryError;
use std::borrow::Cow;

/// Why one component could not be hydrated. Never fatal for the page: every variant ends up as
/// a [`DataErrorMarker`](clic_domain::DataErrorMarker) whose `kind` is [`HydrationError::kind`].
#[clic_derive::clic_error]
pub enum HydrationError {
    #[error("Unsupported data type{}: {source}", format_context(.context))]
    UnsupportedDataType {
        #[source]
        source: UnsupportedDataType,
        context: Option<Cow<'static, str>>,
    },

    /// A single-item fetch had neither an `id`/`slug` filter nor a page item slug.
    #[error("Missing item identifier{}: {message}", format_context(.context))]
    MissingIdentifier { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Content fetch timed out{}: {message}", format_context(.context))]
    Timeout { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Content source failed{}: {source}", format_context(.context))]
    Repository {
        #[source]
        source: RepositoryError,
        context: Option<Cow<'static, str>>,
    },

    /// The content source answered with a payload of another strategy.
    #[error("Unexpected content payload{}: {message}", format_context(.context))]
    UnexpectedPayload { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal hydration error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
