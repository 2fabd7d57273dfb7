use std::borrow::Cow;

/// A specialized [`StoreError`] enum of this crate.
#[clic_derive::clic_error]
pub enum StoreError {
    #[error("Fixture I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid fixture{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
}
