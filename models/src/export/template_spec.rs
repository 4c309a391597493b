use crate::error::model_error::ModelError;
use crate::export::template::ModuleSelection;
use crate::ErrorLocation;

use std::collections::BTreeMap;
use std::panic::Location;

/// Human-readable description of an export template.
///
/// Picklists, connectors and playbook collections are given by name; the
/// client resolves them to platform identifiers before creating the template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTemplateSpec {
    pub name: String,
    pub modules: Vec<String>,
    pub module_attributes: BTreeMap<String, Vec<String>>,
    pub picklists: Vec<String>,
    pub connectors: Vec<String>,
    pub playbook_collections: Vec<String>,
    pub view_templates: Vec<String>,
}

impl ExportTemplateSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.modules.push(module.into());
        self
    }

    /// Restrict a module's export to the given attributes.
    pub fn with_module_attributes<I, S>(mut self, module: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module_attributes
            .insert(module.into(), attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_picklist(mut self, name: impl Into<String>) -> Self {
        self.picklists.push(name.into());
        self
    }

    pub fn with_connector(mut self, label: impl Into<String>) -> Self {
        self.connectors.push(label.into());
        self
    }

    pub fn with_playbook_collection(mut self, name: impl Into<String>) -> Self {
        self.playbook_collections.push(name.into());
        self
    }

    pub fn with_view_template(mut self, name: impl Into<String>) -> Self {
        self.view_templates.push(name.into());
        self
    }

    /// Module selections with their attribute restrictions applied.
    pub fn module_selections(&self) -> Vec<ModuleSelection> {
        self.modules
            .iter()
            .map(|module| ModuleSelection {
                value: module.clone(),
                included_attributes: self
                    .module_attributes
                    .get(module)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Export file name derived from the template name: lowercased, spaces
    /// replaced by underscores, `.json` appended.
    pub fn export_file_name(&self) -> String {
        format!("{}.json", self.name.to_lowercase().replace(' ', "_"))
    }

    #[track_caller]
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::InvalidTemplate {
                template: self.name.clone(),
                message: String::from("Export template name is required"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(module) = self
            .module_attributes
            .keys()
            .find(|module| !self.modules.contains(module))
        {
            return Err(ModelError::InvalidTemplate {
                template: self.name.clone(),
                message: format!("Attributes given for module '{module}' which is not exported"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}
