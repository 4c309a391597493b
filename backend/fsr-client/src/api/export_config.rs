//! Configuration export: templates, export jobs and the end-to-end workflow.
//!
//! Every workflow is create → trigger → poll → download. A failure at any
//! step aborts the workflow; resources created by earlier steps (such as a
//! new template) are left in place.

use super::files::write_artifact;
use super::resolver::{EXPORT_TEMPLATES_ENDPOINT, NameResolver};
use crate::DEFAULT_API_PREFIX;
use crate::auth::Operation;
use crate::client::{ApiRequest, FortiSoar};
use crate::error::FsrError;
use crate::export::poller::poll_until_complete;
use crate::export::{ExportOutcome, ExportPhase, PollOptions};

use models::{
    ConnectorSelection, ExportJobStatus, ExportMetadata, ExportOptions, ExportTemplate,
    ExportTemplateSpec, ExportTrigger, PlaybookCollectionSelection, PlaybookSelection,
    iri_last_segment,
};

use std::path::{Path, PathBuf};

use const_format::concatcp;
use log::{debug, info};
use serde_json::Value;

const EXPORT_TRIGGER_ENDPOINT: &str = "/api/export";
const EXPORT_JOBS_ENDPOINT: &str = concatcp!(DEFAULT_API_PREFIX, "/export_jobs");
const EXPORT_FILE_EXTENSION: &str = ".json";

#[derive(Debug, Clone, Copy)]
pub struct ExportConfigApi<'c> {
    client: &'c FortiSoar,
}

impl<'c> ExportConfigApi<'c> {
    pub(crate) fn new(client: &'c FortiSoar) -> Self {
        Self { client }
    }

    /// Cached name lookups used by the template builder.
    pub fn resolver(&self) -> NameResolver<'c> {
        NameResolver::new(self.client)
    }

    /// Start an export job for a template.
    ///
    /// # Errors
    /// [`FsrError::UnsupportedOperation`] or [`FsrError::InvalidInput`] (file
    /// name not ending in `.json`) before any request is made.
    pub async fn trigger_export(
        &self,
        template_uuid: &str,
        file_name: &str,
    ) -> Result<ExportTrigger, FsrError> {
        self.client.check_operation(Operation::ConfigExport)?;
        validate_file_name(file_name)?;

        let response = self
            .client
            .request(
                ApiRequest::put(EXPORT_TRIGGER_ENDPOINT)
                    .with_param("fileName", file_name)
                    .with_param("template", template_uuid),
            )
            .await?;
        let trigger: ExportTrigger = response.json_as()?;

        debug!("Export job {}: {}", trigger.job_uuid, ExportPhase::Triggered);
        Ok(trigger)
    }

    pub async fn get_export_status(&self, job_uuid: &str) -> Result<ExportJobStatus, FsrError> {
        self.client
            .get_json(&format!("{EXPORT_JOBS_ENDPOINT}/{job_uuid}"), &[])
            .await
    }

    /// Fetch the exported artifact and write it verbatim.
    ///
    /// Without a path the file lands in the working directory under the last
    /// segment of `file_iri`.
    pub async fn download_export(
        &self,
        file_iri: &str,
        path: Option<&Path>,
    ) -> Result<PathBuf, FsrError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir()
                .map_err(|e| FsrError::io(".", e))?
                .join(iri_last_segment(file_iri)),
        };

        let response = self.client.request(ApiRequest::get(file_iri)).await?;
        write_artifact(&path, &response.body).await
    }

    /// `POST /api/3/export_templates`. Metadata defaults to
    /// `autoSelectPicklists: true`.
    pub async fn create_export_template(
        &self,
        name: &str,
        options: ExportOptions,
        metadata: Option<ExportMetadata>,
    ) -> Result<Value, FsrError> {
        self.client.check_operation(Operation::ConfigExport)?;

        let template = ExportTemplate {
            name: name.to_string(),
            options,
            metadata: metadata.unwrap_or_default(),
        };
        let created = self
            .client
            .post(EXPORT_TEMPLATES_ENDPOINT, serde_json::to_value(&template)?)
            .await?;

        debug!("Export template '{name}': {}", ExportPhase::Created);
        Ok(created)
    }

    /// Create a template from names.
    ///
    /// Every picklist, connector and playbook collection is resolved before
    /// the template is posted, so a missing name creates nothing.
    ///
    /// # Errors
    /// [`FsrError::LookupNotFound`] for the first name that does not resolve.
    pub async fn create_simplified_template(
        &self,
        spec: &ExportTemplateSpec,
    ) -> Result<Value, FsrError> {
        self.client.check_operation(Operation::ConfigExport)?;
        spec.validate()?;

        let resolver = self.resolver();

        let mut picklist_names = Vec::with_capacity(spec.picklists.len());
        for name in &spec.picklists {
            picklist_names.push(resolver.picklist_iri(name).await?);
        }

        let mut connectors = Vec::with_capacity(spec.connectors.len());
        for label in &spec.connectors {
            let info = resolver.connector(label).await?;
            connectors.push(ConnectorSelection::full(info.label, info.value, info.version));
        }

        let mut collections = Vec::with_capacity(spec.playbook_collections.len());
        for name in &spec.playbook_collections {
            let info = resolver.playbook_collection(name).await?;
            collections.push(PlaybookCollectionSelection::full(info.label, info.value));
        }

        let options = ExportOptions {
            modules: spec.module_selections(),
            picklist_names,
            connectors,
            playbooks: PlaybookSelection {
                collections,
                global_variables: Vec::new(),
            },
            view_templates: spec.view_templates.clone(),
            ..ExportOptions::default()
        };

        self.create_export_template(&spec.name, options, None).await
    }

    /// Build a template from `spec`, export it and download the result.
    ///
    /// The platform-side file name is derived from the template name.
    pub async fn export_config(
        &self,
        spec: &ExportTemplateSpec,
        output_path: Option<&Path>,
        poll: &PollOptions,
    ) -> Result<ExportOutcome, FsrError> {
        self.client.check_operation(Operation::ConfigExport)?;
        spec.validate()?;
        let file_name = spec.export_file_name();
        validate_file_name(&file_name)?;

        let template = self.create_simplified_template(spec).await?;
        let template_uuid = created_template_uuid(&template)?;

        self.run_export(&template_uuid, &file_name, output_path, poll)
            .await
    }

    /// Export with an existing template looked up by exact name.
    pub async fn export_by_template_name(
        &self,
        template_name: &str,
        output_path: Option<&Path>,
        poll: &PollOptions,
    ) -> Result<ExportOutcome, FsrError> {
        self.client.check_operation(Operation::ConfigExport)?;
        let file_name = match output_path {
            Some(path) => file_name_of(path)?,
            None => ExportTemplateSpec::new(template_name).export_file_name(),
        };
        validate_file_name(&file_name)?;

        let template_uuid = self.resolver().template_uuid(template_name).await?;
        self.run_export(&template_uuid, &file_name, output_path, poll)
            .await
    }

    /// Export with a template given by uuid. Without an output path the
    /// platform file is named `<uuid>.json`.
    pub async fn export_by_template_uuid(
        &self,
        template_uuid: &str,
        output_path: Option<&Path>,
        poll: &PollOptions,
    ) -> Result<ExportOutcome, FsrError> {
        self.client.check_operation(Operation::ConfigExport)?;
        let file_name = match output_path {
            Some(path) => file_name_of(path)?,
            None => format!("{template_uuid}{EXPORT_FILE_EXTENSION}"),
        };
        validate_file_name(&file_name)?;

        self.run_export(template_uuid, &file_name, output_path, poll)
            .await
    }

    async fn run_export(
        &self,
        template_uuid: &str,
        file_name: &str,
        output_path: Option<&Path>,
        poll: &PollOptions,
    ) -> Result<ExportOutcome, FsrError> {
        let trigger = self.trigger_export(template_uuid, file_name).await?;
        let job_uuid = trigger.job_uuid;

        let (status, polls) =
            poll_until_complete(&job_uuid, poll, || self.get_export_status(&job_uuid)).await?;
        let file_iri = status
            .file_iri()
            .map(str::to_string)
            .ok_or_else(|| {
                FsrError::decode(format!("Export job {job_uuid} completed without a file"))
            })?;

        let path = self.download_export(&file_iri, output_path).await?;
        info!("Exported template {template_uuid} to {}", path.display());

        Ok(ExportOutcome {
            path,
            job_uuid,
            file_iri,
            polls,
        })
    }
}

#[track_caller]
fn validate_file_name(file_name: &str) -> Result<(), FsrError> {
    if file_name.ends_with(EXPORT_FILE_EXTENSION) {
        Ok(())
    } else {
        Err(FsrError::invalid_input(format!(
            "Export file name must end in {EXPORT_FILE_EXTENSION}: '{file_name}'"
        )))
    }
}

#[track_caller]
fn file_name_of(path: &Path) -> Result<String, FsrError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| FsrError::invalid_input(format!("'{}' has no file name", path.display())))
}

#[track_caller]
fn created_template_uuid(template: &Value) -> Result<String, FsrError> {
    template
        .get("@id")
        .and_then(Value::as_str)
        .map(|iri| iri_last_segment(iri).to_string())
        .filter(|uuid| !uuid.is_empty())
        .ok_or_else(|| FsrError::decode("Created export template has no @id"))
}
