//! Predicates sent along with a component fetch.
//!
//! Authored filters come from the component's `dynamicData.filters` map. Page filters come from
//! the resolved page itself: the tag filters of a property search and the category slug of a
//! content category listing.

use clic_domain::{
    CATEGORY_FIELD, ContentFilter, ContentKind, FilterOperator, PageIdentity, PageType, Tag,
};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Fields that identify a single item.
const IDENTIFIER_FIELDS: [&str; 2] = ["id", "slug"];

/// `{"field": "x"}` is an equality, `{"field": [..]}` a membership test and
/// `{"field": {"operator": ">=", "value": 2}}` an explicit comparison.
pub(crate) fn authored_filters(filters: &Map<String, Value>) -> Vec<ContentFilter> {
    filters
        .iter()
        .map(|(field, value)| match value {
            Value::Array(_) => ContentFilter {
                field: field.clone(),
                operator: FilterOperator::In,
                value: value.clone(),
            },
            Value::Object(spec) => comparison(field, spec)
                .unwrap_or_else(|| ContentFilter::eq(field.as_str(), value.clone())),
            _ => ContentFilter::eq(field.as_str(), value.clone()),
        })
        .collect()
}

fn comparison(field: &str, spec: &Map<String, Value>) -> Option<ContentFilter> {
    let operator = serde_json::from_value::<FilterOperator>(spec.get("operator")?.clone()).ok()?;
    let value = spec.get("value")?.clone();
    Some(ContentFilter { field: field.to_owned(), operator, value })
}

/// Filters implied by the page a list is rendered on.
pub(crate) fn page_filters(kind: ContentKind, identity: &PageIdentity) -> Vec<ContentFilter> {
    match &identity.page_type {
        PageType::PropertySearch if kind == ContentKind::Properties => {
            identity.filters.iter().map(Tag::to_filter).collect()
        },
        PageType::ContentCategory(prefix)
            if ContentKind::from_str(prefix).is_ok_and(|listed| listed == kind) =>
        {
            identity
                .category_slug
                .iter()
                .map(|slug| ContentFilter::eq(CATEGORY_FIELD, slug.as_str()))
                .collect()
        },
        _ => Vec::new(),
    }
}

/// The item slug of the page, when the page is a single of the requested `kind`.
pub(crate) fn page_item_slug(kind: ContentKind, identity: &PageIdentity) -> Option<&str> {
    let page_kind = match &identity.page_type {
        PageType::PropertySingle => ContentKind::Properties,
        PageType::ContentSingle(prefix) => ContentKind::from_str(prefix).ok()?,
        _ => return None,
    };
    if page_kind == kind { identity.item_slug.as_deref() } else { None }
}

pub(crate) fn has_identifier(filters: &[ContentFilter]) -> bool {
    filters.iter().any(|f| IDENTIFIER_FIELDS.contains(&f.field.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clic_domain::NavLevel;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn authored_values_pick_their_operator() {
        let filters = authored_filters(&map(json!({
            "featured": true,
            "ciudad": ["bogota", "chia"],
            "habitaciones": { "operator": ">=", "value": 3 },
            "meta": { "unrelated": 1 }
        })));

        let find = |field: &str| filters.iter().find(|f| f.field == field).unwrap();
        assert_eq!(find("featured").operator, FilterOperator::Eq);
        assert_eq!(find("ciudad").operator, FilterOperator::In);
        assert_eq!(find("habitaciones").operator, FilterOperator::Gte);
        assert_eq!(find("habitaciones").value, json!(3));
        assert_eq!(find("meta").operator, FilterOperator::Eq);
        assert_eq!(find("meta").value, json!({ "unrelated": 1 }));
    }

    #[test]
    fn category_listing_filters_only_its_own_collection() {
        let identity = PageIdentity::content(
            PageType::ContentCategory("testimonios".to_owned()),
            NavLevel::Categorized,
            Some("inversionistas".to_owned()),
            None,
        );

        let own = page_filters(ContentKind::Testimonials, &identity);
        assert_eq!(own, vec![ContentFilter::eq(CATEGORY_FIELD, "inversionistas")]);
        assert!(page_filters(ContentKind::Properties, &identity).is_empty());
    }

    #[test]
    fn page_item_slug_requires_a_matching_single_page() {
        let testimonial = PageIdentity::content(
            PageType::ContentSingle("testimonios".to_owned()),
            NavLevel::Categorized,
            Some("clientes-felices".to_owned()),
            Some("juan-perez".to_owned()),
        );
        let property = PageIdentity::property(Vec::new(), Some("apto-chapinero-201".to_owned()));

        assert_eq!(page_item_slug(ContentKind::Testimonials, &testimonial), Some("juan-perez"));
        assert_eq!(page_item_slug(ContentKind::Agents, &testimonial), None);
        assert_eq!(page_item_slug(ContentKind::Properties, &testimonial), None);
        assert_eq!(page_item_slug(ContentKind::Properties, &property), Some("apto-chapinero-201"));
        assert_eq!(page_item_slug(ContentKind::Testimonials, &property), None);
        assert_eq!(page_item_slug(ContentKind::Properties, &PageIdentity::homepage()), None);
    }

    #[test]
    fn identifiers_are_id_or_slug() {
        assert!(has_identifier(&[ContentFilter::eq("slug", "juan-perez")]));
        assert!(has_identifier(&[ContentFilter::eq("id", "t1")]));
        assert!(!has_identifier(&[ContentFilter::eq("category", "inversionistas")]));
    }
}
