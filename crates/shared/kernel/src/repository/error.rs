use std::borrow::Cow;

/// Infrastructure faults raised by storage collaborators.
#[clic_derive::clic_error]
pub enum RepositoryError {
    /// The backing store could not be reached or answered with a transport failure.
    #[error("Repository unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A stored row could not be decoded into its domain type.
    #[error("Malformed record{}: {message}", format_context(.context))]
    Malformed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal repository error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
