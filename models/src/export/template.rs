//! Export template as submitted to `POST /api/3/export_templates`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportTemplate {
    pub name: String,
    pub options: ExportOptions,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub auto_select_picklists: bool,
}

impl Default for ExportMetadata {
    fn default() -> Self {
        Self {
            auto_select_picklists: true,
        }
    }
}

/// Everything an export can include. Sections the client never fills are
/// still sent as empty lists; the platform expects the full shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub modules: Vec<ModuleSelection>,
    pub picklist_names: Vec<String>,
    pub connectors: Vec<ConnectorSelection>,
    pub playbooks: PlaybookSelection,
    pub view_templates: Vec<String>,
    pub record_sets: Vec<Value>,
    pub views: Vec<Value>,
    pub reports: Vec<Value>,
    pub dashboards: Vec<Value>,
    pub roles: Vec<Value>,
    pub teams: Vec<Value>,
    pub actors: Vec<Value>,
    pub widgets: Vec<Value>,
    pub app_settings: Vec<Value>,
    pub show_only_configured: Vec<Value>,
    pub preprocessing_rules: Vec<Value>,
    pub rule_channels: Vec<Value>,
    pub rules: Vec<Value>,
    pub playbook_blocks: PlaybookBlocks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSelection {
    pub value: String,
    pub included_attributes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorSelection {
    pub label: String,
    pub value: String,
    pub rpm: bool,
    pub configurations: bool,
    pub config_count: u32,
    pub version: String,
    pub include: bool,
    pub record_count: u32,
}

impl ConnectorSelection {
    /// Selection including the connector's configurations and rpm.
    pub fn full(
        label: impl Into<String>,
        value: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            rpm: true,
            configurations: true,
            config_count: 1,
            version: version.into(),
            include: true,
            record_count: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookSelection {
    pub collections: Vec<PlaybookCollectionSelection>,
    pub global_variables: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookCollectionSelection {
    pub label: String,
    pub value: String,
    pub include_global_variables: bool,
    pub include_schedules: bool,
    pub include_versions: bool,
    pub include: bool,
    pub record_count: u32,
}

impl PlaybookCollectionSelection {
    /// Selection including variables, schedules and versions.
    pub fn full(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            include_global_variables: true,
            include_schedules: true,
            include_versions: true,
            include: true,
            record_count: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookBlocks {
    pub blocks: Vec<Value>,
    pub include_global_variables: bool,
}

impl Default for PlaybookBlocks {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            include_global_variables: true,
        }
    }
}
