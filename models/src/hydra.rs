//! The platform's paged collection envelope.

use serde::{Deserialize, Serialize};

/// `hydra:PagedCollection` as returned by list and query endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydraCollection<T> {
    #[serde(rename = "hydra:member", default = "Vec::new")]
    pub members: Vec<T>,
    #[serde(rename = "hydra:totalItems", default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
}

impl<T> HydraCollection<T> {
    pub fn first(&self) -> Option<&T> {
        self.members.first()
    }

    pub fn into_first(self) -> Option<T> {
        self.members.into_iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<T> Default for HydraCollection<T> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            total_items: None,
        }
    }
}

/// Last path segment of an IRI such as `/api/3/export_templates/<uuid>`.
pub fn iri_last_segment(iri: &str) -> &str {
    iri.trim_end_matches('/').rsplit('/').next().unwrap_or(iri)
}
