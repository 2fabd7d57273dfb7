use crate::content::{DynamicDataSpec, ResolvedData};
use crate::tenant::TenantId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Breadth of applicability of a component record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentScope {
    Tenant,
    PageType,
    Page,
}

/// Authored configuration of a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfig {
    #[serde(default)]
    pub static_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_data: Option<DynamicDataSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggles: Option<BTreeMap<String, bool>>,
}

/// A stored component placement.
///
/// `scope` decides which locator is set: none for `tenant`, `page_type_key` for
/// `pageType`, `page_id` for `page`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    pub id: String,
    pub tenant_id: TenantId,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default = "default_variant")]
    pub variant: String,
    pub scope: ComponentScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_type_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default = "enabled")]
    pub active: bool,
    #[serde(default)]
    pub config: ComponentConfig,
}

impl ComponentRecord {
    /// Whether the locators agree with the declared scope.
    #[must_use]
    pub const fn has_consistent_scope(&self) -> bool {
        match self.scope {
            ComponentScope::Tenant => self.page_type_key.is_none() && self.page_id.is_none(),
            ComponentScope::PageType => self.page_type_key.is_some() && self.page_id.is_none(),
            ComponentScope::Page => self.page_id.is_some() && self.page_type_key.is_none(),
        }
    }
}

fn default_variant() -> String {
    "default".to_owned()
}

const fn enabled() -> bool {
    true
}

/// Observability marker left on a component whose data could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataErrorMarker {
    pub kind: String,
    pub message: String,
}

/// A winning component record, annotated with hydrated data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub variant: String,
    pub scope: ComponentScope,
    pub order_index: i32,
    pub config: ComponentConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ResolvedData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DataErrorMarker>,
}

impl ResolvedComponent {
    /// Wraps a record that has no dynamic data requirement.
    #[must_use]
    pub fn from_record(record: ComponentRecord) -> Self {
        Self {
            id: record.id,
            component_type: record.component_type,
            variant: record.variant,
            scope: record.scope,
            order_index: record.order_index,
            config: record.config,
            resolved: None,
            error: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: ResolvedData) -> Self {
        self.resolved = Some(data);
        self.error = None;
        self
    }

    /// Keeps the component renderable with empty data and records why.
    #[must_use]
    pub fn with_failure(mut self, marker: DataErrorMarker) -> Self {
        self.resolved = Some(ResolvedData::Empty);
        self.error = Some(marker);
        self
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
