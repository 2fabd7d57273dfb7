//! URL path normalization.
//!
//! Leading, trailing and repeated slashes are insignificant; the query string and fragment
//! are dropped; every segment is percent-decoded before any catalog lookup. Decoding is the
//! only transformation: case and accents are kept as-is so that an unmapped variant never
//! matches implicitly.

use std::borrow::Cow;

#[clic_derive::clic_error]
pub enum PathError {
    #[error("Malformed path segment{}: {message}", format_context(.context))]
    Malformed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Splits a raw request path into decoded, non-empty segments.
///
/// An empty result means the site root.
///
/// # Errors
/// Returns [`PathError::Malformed`] when a segment does not decode to valid UTF-8.
pub fn split_path(raw: &str) -> Result<Vec<String>, PathError> {
    let path = raw.split(['?', '#']).next().unwrap_or_default();

    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            urlencoding::decode(segment).map(Cow::into_owned).map_err(|e| PathError::Malformed {
                message: e.to_string().into(),
                context: Some(format!("Decoding segment '{segment}'").into()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_variants_are_empty() {
        assert!(split_path("").unwrap().is_empty());
        assert!(split_path("/").unwrap().is_empty());
        assert!(split_path("//").unwrap().is_empty());
        assert!(split_path("/?page=2").unwrap().is_empty());
    }

    #[test]
    fn percent_encoded_segments_decode() {
        assert_eq!(split_path("/propiedades/jard%C3%ADn").unwrap(), vec!["propiedades", "jardín"]);
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        assert!(matches!(split_path("/%FF%FE"), Err(PathError::Malformed { .. })));
    }
}
