//! Name → identifier lookups backed by the client's resolution cache.
//!
//! A cache hit never touches the network. A miss fetches, stores the
//! result, and returns what the cache holds afterwards.

use crate::DEFAULT_API_PREFIX;
use crate::client::FortiSoar;
use crate::error::{FsrError, LookupEntity};

use models::{
    ConnectorInfo, ConnectorRecord, ExportTemplateRecord, HydraCollection, PicklistNameRecord,
    PlaybookCollectionInfo, WorkflowCollectionRecord,
};

use const_format::concatcp;
use log::debug;
use serde_json::Value;

const PICKLIST_NAMES_ENDPOINT: &str = concatcp!(DEFAULT_API_PREFIX, "/picklist_names");
const CONNECTORS_ENDPOINT: &str = "/api/integration/connectors/";
const WORKFLOW_COLLECTIONS_ENDPOINT: &str =
    concatcp!(DEFAULT_API_PREFIX, "/workflow_collections");
pub(crate) const EXPORT_TEMPLATES_ENDPOINT: &str =
    concatcp!(DEFAULT_API_PREFIX, "/export_templates");

#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'c> {
    client: &'c FortiSoar,
}

impl<'c> NameResolver<'c> {
    pub(crate) fn new(client: &'c FortiSoar) -> Self {
        Self { client }
    }

    /// IRI of the picklist named `name`; the first search hit wins.
    ///
    /// # Errors
    /// [`FsrError::LookupNotFound`] when the search is empty.
    pub async fn picklist_iri(&self, name: &str) -> Result<String, FsrError> {
        if let Some(iri) = self.client.with_cache(|cache| cache.picklist(name)) {
            return Ok(iri);
        }

        let page: HydraCollection<PicklistNameRecord> = self
            .client
            .get_json(PICKLIST_NAMES_ENDPOINT, &[("name", name)])
            .await?;
        let record = page
            .into_first()
            .ok_or_else(|| FsrError::not_found(LookupEntity::Picklist, name))?;

        debug!("Resolved picklist '{name}' to {}", record.iri);
        Ok(self
            .client
            .with_cache(|cache| cache.insert_picklist(name, record.iri)))
    }

    /// Connector whose `label` equals `label` exactly.
    ///
    /// # Errors
    /// [`FsrError::LookupNotFound`] when no installed connector carries it.
    pub async fn connector(&self, label: &str) -> Result<ConnectorInfo, FsrError> {
        if let Some(info) = self.client.with_cache(|cache| cache.connector(label)) {
            return Ok(info);
        }

        let page: HydraCollection<Value> = self.client.get_json(CONNECTORS_ENDPOINT, &[]).await?;
        let record = page
            .members
            .into_iter()
            .find(|member| member.get("label").and_then(Value::as_str) == Some(label))
            .ok_or_else(|| FsrError::not_found(LookupEntity::Connector, label))?;
        let record: ConnectorRecord = serde_json::from_value(record)?;

        let info = ConnectorInfo::from(&record);
        debug!("Resolved connector '{label}' to {}", info.value);
        Ok(self
            .client
            .with_cache(|cache| cache.insert_connector(label, info)))
    }

    /// # Errors
    /// [`FsrError::LookupNotFound`] when the search is empty.
    pub async fn playbook_collection(
        &self,
        name: &str,
    ) -> Result<PlaybookCollectionInfo, FsrError> {
        if let Some(info) = self
            .client
            .with_cache(|cache| cache.playbook_collection(name))
        {
            return Ok(info);
        }

        let page: HydraCollection<WorkflowCollectionRecord> = self
            .client
            .get_json(WORKFLOW_COLLECTIONS_ENDPOINT, &[("name", name)])
            .await?;
        let record = page
            .first()
            .ok_or_else(|| FsrError::not_found(LookupEntity::PlaybookCollection, name))?;

        let info = PlaybookCollectionInfo::from(record);
        Ok(self
            .client
            .with_cache(|cache| cache.insert_playbook_collection(name, info)))
    }

    /// Uuid of the export template named exactly `name`.
    ///
    /// Several templates may share a name; the newest `createDate` wins and
    /// ties keep the platform's order.
    ///
    /// # Errors
    /// [`FsrError::LookupNotFound`] when no template matches exactly.
    pub async fn template_uuid(&self, name: &str) -> Result<String, FsrError> {
        if let Some(uuid) = self.client.with_cache(|cache| cache.template(name)) {
            return Ok(uuid);
        }

        let page: HydraCollection<ExportTemplateRecord> = self
            .client
            .get_json(EXPORT_TEMPLATES_ENDPOINT, &[("name", name)])
            .await?;
        let newest = page
            .members
            .iter()
            .filter(|template| template.name == name)
            .fold(None, |newest: Option<&ExportTemplateRecord>, template| {
                match newest {
                    Some(current) if current.created_at() >= template.created_at() => newest,
                    _ => Some(template),
                }
            })
            .ok_or_else(|| FsrError::not_found(LookupEntity::ExportTemplate, name))?;

        let uuid = newest.uuid().to_string();
        debug!("Resolved export template '{name}' to {uuid}");
        Ok(self
            .client
            .with_cache(|cache| cache.insert_template(name, uuid)))
    }
}
