//! Evaluation of [`ContentFilter`] predicates against JSON items.

use clic_domain::{ContentFilter, FilterOperator};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Whether `item` satisfies every filter.
pub(crate) fn matches_all(item: &Map<String, Value>, filters: &[ContentFilter]) -> bool {
    filters.iter().all(|filter| matches(item, filter))
}

/// Evaluates one predicate. A missing field only satisfies `!=`.
pub(crate) fn matches(item: &Map<String, Value>, filter: &ContentFilter) -> bool {
    let actual = lookup(item, &filter.field);
    let expected = &filter.value;

    match filter.operator {
        FilterOperator::Eq => actual.is_some_and(|a| loosely_equal(a, expected)),
        FilterOperator::Ne => !actual.is_some_and(|a| loosely_equal(a, expected)),
        FilterOperator::Gt => ordering(actual, expected).is_some_and(Ordering::is_gt),
        FilterOperator::Gte => ordering(actual, expected).is_some_and(Ordering::is_ge),
        FilterOperator::Lt => ordering(actual, expected).is_some_and(Ordering::is_lt),
        FilterOperator::Lte => ordering(actual, expected).is_some_and(Ordering::is_le),
        FilterOperator::Contains => actual.is_some_and(|a| contains(a, expected)),
        FilterOperator::In => actual.is_some_and(|a| {
            expected.as_array().map_or_else(
                || loosely_equal(a, expected),
                |candidates| candidates.iter().any(|c| loosely_equal(a, c)),
            )
        }),
    }
}

/// Resolves a dotted field path (`location.city`).
pub(crate) fn lookup<'a>(item: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    let mut keys = field.split('.');
    let first = item.get(keys.next()?)?;
    keys.try_fold(first, |value, key| value.get(key)).filter(|v| !v.is_null())
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
        _ => a == b,
    }
}

fn ordering(actual: Option<&Value>, expected: &Value) -> Option<Ordering> {
    let actual = actual?;
    match (actual.as_f64(), expected.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y),
        _ => Some(actual.as_str()?.cmp(expected.as_str()?)),
    }
}

/// `@>`: every expected element is present in the actual array.
///
/// A scalar field behaves as a one-element array, so strings compare whole, never by substring.
fn contains(actual: &Value, expected: &Value) -> bool {
    let haystack = actual.as_array().map_or_else(|| std::slice::from_ref(actual), Vec::as_slice);
    let needles = expected.as_array().map_or_else(|| std::slice::from_ref(expected), Vec::as_slice);
    needles.iter().all(|needle| haystack.iter().any(|v| loosely_equal(v, needle)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filter(field: &str, operator: FilterOperator, value: Value) -> ContentFilter {
        ContentFilter { field: field.to_owned(), operator, value }
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn comparison_operators_are_numeric() {
        let item = object(json!({ "habitaciones": 3, "precio": 120000.5 }));

        assert!(matches(&item, &filter("habitaciones", FilterOperator::Gte, json!(2))));
        assert!(matches(&item, &filter("habitaciones", FilterOperator::Eq, json!(3.0))));
        assert!(!matches(&item, &filter("habitaciones", FilterOperator::Gt, json!(3))));
        assert!(matches(&item, &filter("precio", FilterOperator::Lt, json!(200000))));
        assert!(matches(&item, &filter("habitaciones", FilterOperator::Lte, json!(3))));
    }

    #[test]
    fn contains_requires_every_element() {
        let item = object(json!({ "amenidades": ["gym", "piscina"] }));

        assert!(matches(&item, &filter("amenidades", FilterOperator::Contains, json!(["gym"]))));
        assert!(matches(&item, &filter("amenidades", FilterOperator::Contains, json!("piscina"))));
        assert!(!matches(
            &item,
            &filter("amenidades", FilterOperator::Contains, json!(["gym", "terraza"]))
        ));
    }

    #[test]
    fn contains_on_a_scalar_field_compares_whole_values() {
        let item = object(json!({ "amenidades": "gymnasium", "zona": "chapinero" }));

        assert!(!matches(&item, &filter("amenidades", FilterOperator::Contains, json!("gym"))));
        assert!(!matches(&item, &filter("amenidades", FilterOperator::Contains, json!(["gym"]))));
        assert!(matches(&item, &filter("zona", FilterOperator::Contains, json!("chapinero"))));
        assert!(matches(&item, &filter("zona", FilterOperator::Contains, json!(["chapinero"]))));
        assert!(!matches(
            &item,
            &filter("zona", FilterOperator::Contains, json!(["chapinero", "usaquen"]))
        ));
    }

    #[test]
    fn missing_fields_only_satisfy_inequality() {
        let item = object(json!({ "ciudad": { "slug": "bogota" } }));

        assert!(matches(&item, &filter("ciudad.slug", FilterOperator::In, json!(["cali", "bogota"]))));
        assert!(!matches(&item, &filter("zona", FilterOperator::Eq, json!("norte"))));
        assert!(matches(&item, &filter("zona", FilterOperator::Ne, json!("norte"))));
        assert!(!matches(&item, &filter("zona", FilterOperator::Gte, json!(1))));
    }
}
