//! Per-client memo of name → identifier resolutions.
//!
//! Entries are never evicted automatically. The first value stored for a
//! name wins; a name that is already resolved is never fetched again.

use models::{ConnectorInfo, PlaybookCollectionInfo};

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ResolutionCache {
    picklists: HashMap<String, String>,
    connectors: HashMap<String, ConnectorInfo>,
    playbook_collections: HashMap<String, PlaybookCollectionInfo>,
    templates: HashMap<String, String>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picklist name → IRI.
    pub fn picklist(&self, name: &str) -> Option<String> {
        self.picklists.get(name).cloned()
    }

    pub fn insert_picklist(&mut self, name: &str, iri: String) -> String {
        self.picklists
            .entry(name.to_string())
            .or_insert(iri)
            .clone()
    }

    /// Connector label → connector info.
    pub fn connector(&self, label: &str) -> Option<ConnectorInfo> {
        self.connectors.get(label).cloned()
    }

    pub fn insert_connector(&mut self, label: &str, info: ConnectorInfo) -> ConnectorInfo {
        self.connectors
            .entry(label.to_string())
            .or_insert(info)
            .clone()
    }

    pub fn playbook_collection(&self, name: &str) -> Option<PlaybookCollectionInfo> {
        self.playbook_collections.get(name).cloned()
    }

    pub fn insert_playbook_collection(
        &mut self,
        name: &str,
        info: PlaybookCollectionInfo,
    ) -> PlaybookCollectionInfo {
        self.playbook_collections
            .entry(name.to_string())
            .or_insert(info)
            .clone()
    }

    /// Export template name → uuid.
    pub fn template(&self, name: &str) -> Option<String> {
        self.templates.get(name).cloned()
    }

    pub fn insert_template(&mut self, name: &str, uuid: String) -> String {
        self.templates
            .entry(name.to_string())
            .or_insert(uuid)
            .clone()
    }

    /// Total entries across all four maps.
    pub fn len(&self) -> usize {
        self.picklists.len()
            + self.connectors.len()
            + self.playbook_collections.len()
            + self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.picklists.clear();
        self.connectors.clear();
        self.playbook_collections.clear();
        self.templates.clear();
    }
}
