//! Dynamic data contract between components and the content collaborator.
//!
//! A component declares a [`DynamicDataSpec`] whose `dataType` label is parsed into the
//! closed [`DataType`] union at request time. The resolver turns it into a [`ContentQuery`],
//! the collaborator answers with a [`ContentPayload`], and the component ends up carrying
//! [`ResolvedData`].

use crate::tag::FilterOperator;
use crate::tenant::TenantId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};

/// Content collections served by the platform.
///
/// Parsing accepts English and Spanish labels, plural or singular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
pub enum ContentKind {
    #[strum(to_string = "properties", serialize = "propiedades", serialize = "property", serialize = "propiedad")]
    Properties,
    #[strum(to_string = "articles", serialize = "articulos", serialize = "article", serialize = "articulo")]
    Articles,
    #[strum(to_string = "videos", serialize = "video")]
    Videos,
    #[strum(to_string = "testimonials", serialize = "testimonios", serialize = "testimonial", serialize = "testimonio")]
    Testimonials,
    #[strum(to_string = "faqs", serialize = "faq", serialize = "preguntas")]
    Faqs,
    #[strum(to_string = "agents", serialize = "asesores", serialize = "agent", serialize = "asesor")]
    Agents,
    #[strum(to_string = "locations", serialize = "ubicaciones", serialize = "location", serialize = "ubicacion")]
    Locations,
}

/// Aggregate sources that do not paginate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
pub enum AggregateKind {
    #[strum(to_string = "stats")]
    Stats,
    #[strum(to_string = "carrusel", serialize = "carousel")]
    Carousel,
    /// Free text authored in the component itself.
    #[strum(to_string = "texto_suelto", serialize = "loose_text")]
    LooseText,
}

/// Closed union of every data requirement a component can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    List(ContentKind),
    Single(ContentKind),
    Category(ContentKind),
    Aggregate(AggregateKind),
}

/// Item field holding the taxonomy slug of categorized content.
pub const CATEGORY_FIELD: &str = "category";

const SINGLE_SUFFIX: &str = "_single";
const CATEGORY_PREFIXES: [&str; 2] = ["categorias_", "categories_"];

impl FromStr for DataType {
    type Err = UnsupportedDataType;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let unsupported = || UnsupportedDataType(label.to_owned());

        if let Some(stem) = label.strip_suffix(SINGLE_SUFFIX) {
            return ContentKind::from_str(stem).map(Self::Single).map_err(|_| unsupported());
        }
        if let Some(stem) = CATEGORY_PREFIXES.iter().find_map(|p| label.strip_prefix(p)) {
            return ContentKind::from_str(stem).map(Self::Category).map_err(|_| unsupported());
        }
        if let Ok(aggregate) = AggregateKind::from_str(label) {
            return Ok(Self::Aggregate(aggregate));
        }
        ContentKind::from_str(label).map(Self::List).map_err(|_| unsupported())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(kind) => write!(f, "{kind}"),
            Self::Single(kind) => write!(f, "{kind}{SINGLE_SUFFIX}"),
            Self::Category(kind) => write!(f, "{}{kind}", CATEGORY_PREFIXES[0]),
            Self::Aggregate(kind) => write!(f, "{kind}"),
        }
    }
}

/// A `dataType` label outside the [`DataType`] union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedDataType(pub String);

impl fmt::Display for UnsupportedDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported data type '{}'", self.0)
    }
}

impl std::error::Error for UnsupportedDataType {}

/// Requested page of a list, as authored on the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

const fn first_page() -> u32 {
    1
}

/// Declared data requirement of a component.
///
/// `data_type` stays a raw label so that an unknown value surfaces as a per-component
/// failure instead of making the whole record unreadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicDataSpec {
    pub data_type: String,
    #[serde(default)]
    pub filters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl DynamicDataSpec {
    /// Parses the declared label.
    ///
    /// # Errors
    /// Returns [`UnsupportedDataType`] for labels outside the union.
    pub fn parsed_type(&self) -> Result<DataType, UnsupportedDataType> {
        self.data_type.parse()
    }
}

/// One predicate sent to the content collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFilter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl ContentFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { field: field.into(), operator: FilterOperator::Eq, value: value.into() }
    }
}

/// Effective pagination after defaults and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    #[must_use]
    pub const fn offset(self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.limit as usize)
    }
}

/// A fetch issued to the content collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentQuery {
    pub tenant_id: TenantId,
    pub language: String,
    #[serde(serialize_with = "serialize_display")]
    pub data_type: DataType,
    pub filters: Vec<ContentFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageRequest>,
}

fn serialize_display<S: serde::Serializer>(value: &DataType, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}

/// Taxonomy entry with its item count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub count: u64,
}

/// Raw answer of the content collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPayload {
    Page { items: Vec<Value>, total: u64 },
    Item(Option<Value>),
    Categories(Vec<CategoryCount>),
    Aggregate(Value),
}

/// Data attached to a hydrated component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "camelCase")]
pub enum ResolvedData {
    List {
        items: Vec<Value>,
        total: u64,
        page: u32,
        #[serde(rename = "pageCount")]
        page_count: u32,
    },
    Single {
        item: Option<Value>,
    },
    Categories {
        categories: Vec<CategoryCount>,
    },
    Aggregate {
        value: Value,
    },
    /// Placeholder kept by a component whose resolution failed.
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_into_strategies() {
        assert_eq!("properties".parse(), Ok(DataType::List(ContentKind::Properties)));
        assert_eq!("testimonios".parse(), Ok(DataType::List(ContentKind::Testimonials)));
        assert_eq!("property_single".parse(), Ok(DataType::Single(ContentKind::Properties)));
        assert_eq!("articulo_single".parse(), Ok(DataType::Single(ContentKind::Articles)));
        assert_eq!("categorias_videos".parse(), Ok(DataType::Category(ContentKind::Videos)));
        assert_eq!("carrusel".parse(), Ok(DataType::Aggregate(AggregateKind::Carousel)));
        assert_eq!("texto_suelto".parse(), Ok(DataType::Aggregate(AggregateKind::LooseText)));
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert_eq!("widgets".parse::<DataType>(), Err(UnsupportedDataType("widgets".to_owned())));
        assert!("widgets_single".parse::<DataType>().is_err());
        assert!("categorias_".parse::<DataType>().is_err());
        assert!("".parse::<DataType>().is_err());
    }

    #[test]
    fn display_uses_canonical_labels() {
        assert_eq!(DataType::List(ContentKind::Agents).to_string(), "agents");
        assert_eq!(DataType::Single(ContentKind::Properties).to_string(), "properties_single");
        assert_eq!(DataType::Category(ContentKind::Articles).to_string(), "categorias_articles");
        assert_eq!(DataType::Aggregate(AggregateKind::Stats).to_string(), "stats");
    }

    #[test]
    fn page_request_offset_is_zero_based() {
        assert_eq!(PageRequest { page: 1, limit: 12 }.offset(), 0);
        assert_eq!(PageRequest { page: 3, limit: 10 }.offset(), 20);
        assert_eq!(PageRequest { page: 0, limit: 10 }.offset(), 0);
    }
}
