use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A solution pack as returned by `/api/query/solutionpacks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionPack {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PackTemplate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SolutionPack {
    pub fn is_installed(&self) -> bool {
        self.installed.unwrap_or(false)
    }

    /// Uuid of the export template bundled with the pack, if it has one.
    pub fn template_uuid(&self) -> Option<&str> {
        self.template
            .as_ref()
            .map(|template| template.uuid.as_str())
            .filter(|uuid| !uuid.is_empty())
    }

    /// Default export file name: `<name>_<version>.json`, or `<name>.json`
    /// when the platform reports no version.
    pub fn export_file_name(&self) -> String {
        let version = self.version.trim();
        if version.is_empty() {
            format!("{}.json", self.name)
        } else {
            format!("{}_{version}.json", self.name)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackTemplate {
    #[serde(default)]
    pub uuid: String,
}
