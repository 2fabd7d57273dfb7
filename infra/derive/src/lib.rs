#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the engine crates.
//!
//! Every crate of the workspace declares its error enum with [`clic_error`], which keeps the
//! error surface uniform: contextual messages, `?`-friendly conversions from upstream errors,
//! and a stable machine-readable [`kind`](#generated-items) used by observability markers.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! clic-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining crate-level error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field
///   (or a field marked `#[source]`/`#[from]`), enabling the `?` operator for upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant is present.
/// * **Kind**: A `kind(&self) -> &'static str` method returning the snake-cased variant name.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. Variants that carry a source must also carry `context: Option<Cow<'static, str>>`.
/// 3. Only one error enum per module: a private `format_context` helper is emitted next to it.
///
/// # Generated Items
///
/// * `<Name>Ext` trait with `.context(...)` for `Result<T, Name>` and `Result<T, Source>`.
/// * `From<Source>` impls for variants with a source field.
/// * `From<&'static str>` / `From<String>` for the `Internal` variant.
/// * `Name::kind()`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[clic_derive::clic_error]
/// pub enum StoreError {
///     #[error("Fixture parse error{}: {source}", format_context(.context))]
///     Parse { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load(raw: &str) -> Result<Fixture, StoreError> {
///     serde_json::from_str(raw).context("Parsing site fixture")
/// }
/// ```
#[proc_macro_attribute]
pub fn clic_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
