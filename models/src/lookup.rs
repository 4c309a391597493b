//! Records fetched while resolving human-readable names to platform identifiers.

use crate::hydra::iri_last_segment;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Entry of `/api/3/picklist_names`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PicklistNameRecord {
    #[serde(rename = "@id")]
    pub iri: String,
    #[serde(default)]
    pub name: String,
}

/// Entry of `/api/integration/connectors/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorRecord {
    pub name: String,
    pub label: String,
    pub version: String,
}

impl ConnectorRecord {
    /// Identifier the export template expects for a connector.
    pub fn export_value(&self) -> String {
        format!("cyops-connector-{}-{}", self.name, self.version)
    }
}

/// Entry of `/api/3/workflow_collections`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowCollectionRecord {
    #[serde(rename = "@id")]
    pub iri: String,
    pub name: String,
}

/// Entry of `/api/3/export_templates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportTemplateRecord {
    #[serde(rename = "@id")]
    pub iri: String,
    pub name: String,
    #[serde(rename = "createDate", default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<Value>,
}

impl ExportTemplateRecord {
    pub fn uuid(&self) -> &str {
        iri_last_segment(&self.iri)
    }

    /// Creation timestamp; missing or non-numeric dates sort oldest.
    pub fn created_at(&self) -> f64 {
        self.create_date
            .as_ref()
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }
}

/// Resolved connector, as cached by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorInfo {
    pub value: String,
    pub version: String,
    pub label: String,
}

impl From<&ConnectorRecord> for ConnectorInfo {
    fn from(record: &ConnectorRecord) -> Self {
        Self {
            value: record.export_value(),
            version: record.version.clone(),
            label: record.label.clone(),
        }
    }
}

/// Resolved playbook collection, as cached by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybookCollectionInfo {
    pub label: String,
    pub value: String,
}

impl From<&WorkflowCollectionRecord> for PlaybookCollectionInfo {
    fn from(record: &WorkflowCollectionRecord) -> Self {
        Self {
            label: record.name.clone(),
            value: iri_last_segment(&record.iri).to_string(),
        }
    }
}
