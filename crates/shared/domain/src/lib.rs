//! # Domain Models
//!
//! Pure types shared by every stage of the site composition pipeline:
//! tags and navigation catalogs, the derived page identity, component records
//! and the dynamic data contract.
//! Keep it lean: no I/O, networking, or heavy logic, just data and simple helpers.

pub mod component;
pub mod config;
pub mod content;
pub mod navigation;
pub mod page;
pub mod tag;
pub mod tenant;

pub use component::{ComponentConfig, ComponentRecord, ComponentScope, DataErrorMarker, ResolvedComponent};
pub use content::{
    AggregateKind, CATEGORY_FIELD, CategoryCount, ContentFilter, ContentKind, ContentPayload, ContentQuery, DataType,
    DynamicDataSpec, PageRequest, Pagination, ResolvedData, UnsupportedDataType,
};
pub use navigation::{NavLevel, NavigationConfig};
pub use page::{PageIdentity, PageType, ResolvedPage};
pub use tag::{FilterOperator, Tag, TagCategory};
pub use tenant::TenantId;
