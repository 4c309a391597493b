//! Solution pack search and export.

use crate::auth::Operation;
use crate::client::{ApiRequest, FortiSoar};
use crate::error::{FsrError, LookupEntity};
use crate::export::{ExportOutcome, PollOptions};

use models::{Direction, Filter, HydraCollection, Logic, Query, SolutionPack};

use std::path::{Path, PathBuf};

use log::debug;

const SOLUTION_PACKS_QUERY_ENDPOINT: &str = "/api/query/solutionpacks";
pub const DEFAULT_SEARCH_LIMIT: u32 = 30;
const SOLUTION_PACK_TYPE: &str = "solutionpack";
const DEV_VERSION_PATTERN: &str = "%_dev";

/// Fields requested when browsing the pack catalogue.
const AVAILABLE_PACK_FIELDS: [&str; 16] = [
    "name",
    "installed",
    "type",
    "display",
    "label",
    "version",
    "publisher",
    "certified",
    "iconLarge",
    "description",
    "latestAvailableVersion",
    "draft",
    "local",
    "status",
    "featuredTags",
    "featured",
];

#[derive(Debug, Clone, Copy)]
pub struct SolutionPacksApi<'c> {
    client: &'c FortiSoar,
}

impl<'c> SolutionPacksApi<'c> {
    pub(crate) fn new(client: &'c FortiSoar) -> Self {
        Self { client }
    }

    /// Installed packs matching `search_term` by name, label or description.
    pub async fn search_installed_packs(
        &self,
        search_term: &str,
        limit: u32,
    ) -> Result<Vec<SolutionPack>, FsrError> {
        let query = Query::new(search_term, limit)
            .sort_by("label", Direction::Asc)
            .filter(Filter::condition("type", "in", vec![SOLUTION_PACK_TYPE]))
            .filter(Filter::equals("installed", true))
            .filter(Filter::group(
                Logic::Or,
                vec![
                    Filter::equals("development", false),
                    Filter::equals("type", "widget"),
                    Filter::equals("type", SOLUTION_PACK_TYPE),
                ],
            ));

        self.search(query).await
    }

    /// Catalogue packs, featured first, development builds excluded.
    pub async fn search_available_packs(
        &self,
        search_term: &str,
        limit: u32,
    ) -> Result<Vec<SolutionPack>, FsrError> {
        let query = Query::new(search_term, limit)
            .sort_by("featured", Direction::Desc)
            .sort_by("label", Direction::Asc)
            .filter(Filter::condition("type", "in", vec![SOLUTION_PACK_TYPE]))
            .filter(Filter::condition("version", "notlike", DEV_VERSION_PATTERN))
            .select(AVAILABLE_PACK_FIELDS);

        self.search(query).await
    }

    /// First installed hit, if any.
    pub async fn find_installed_pack(
        &self,
        search_term: &str,
    ) -> Result<Option<SolutionPack>, FsrError> {
        Ok(self
            .search_installed_packs(search_term, 1)
            .await?
            .into_iter()
            .next())
    }

    /// First catalogue hit, if any.
    pub async fn find_available_pack(
        &self,
        search_term: &str,
    ) -> Result<Option<SolutionPack>, FsrError> {
        Ok(self
            .search_available_packs(search_term, 1)
            .await?
            .into_iter()
            .next())
    }

    /// Pack whose `name` equals `name` exactly, installed packs first.
    pub async fn pack_by_name(&self, name: &str) -> Result<Option<SolutionPack>, FsrError> {
        if let Some(pack) = self
            .find_installed_pack(name)
            .await?
            .filter(|pack| pack.name == name)
        {
            return Ok(Some(pack));
        }

        Ok(self
            .find_available_pack(name)
            .await?
            .filter(|pack| pack.name == name))
    }

    /// Export a pack through its bundled export template.
    ///
    /// `identifier` is tried as an exact pack name, then as an installed-pack
    /// search term. Without an output path the file is `<name>_<version>.json`.
    ///
    /// # Errors
    /// - [`FsrError::LookupNotFound`] when no pack matches
    /// - [`FsrError::InvalidInput`] when the pack has no export template
    pub async fn export_pack(
        &self,
        identifier: &str,
        output_path: Option<&Path>,
        poll: &PollOptions,
    ) -> Result<ExportOutcome, FsrError> {
        self.client.check_operation(Operation::SolutionPack)?;
        self.client.check_operation(Operation::ConfigExport)?;

        let pack = match self.pack_by_name(identifier).await? {
            Some(pack) => pack,
            None => self
                .find_installed_pack(identifier)
                .await?
                .ok_or_else(|| FsrError::not_found(LookupEntity::SolutionPack, identifier))?,
        };

        let template_uuid = pack.template_uuid().ok_or_else(|| {
            FsrError::invalid_input(format!(
                "Solution pack '{identifier}' has no export template"
            ))
        })?;

        let output_path = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(pack.export_file_name()));
        debug!(
            "Exporting solution pack '{}' {} with template {template_uuid}",
            pack.name, pack.version
        );

        self.client
            .export_config()
            .export_by_template_uuid(template_uuid, Some(&output_path), poll)
            .await
    }

    async fn search(&self, query: Query) -> Result<Vec<SolutionPack>, FsrError> {
        let limit = query.limit.to_string();
        let request = ApiRequest::post(SOLUTION_PACKS_QUERY_ENDPOINT)
            .with_param("$limit", limit)
            .with_param("$page", "1")
            .with_param("$search", query.search.clone())
            .with_body(serde_json::to_value(&query)?);

        let page: HydraCollection<SolutionPack> = self.client.request(request).await?.json_as()?;
        Ok(page.members)
    }
}
