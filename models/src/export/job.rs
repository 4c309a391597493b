use serde::{Deserialize, Serialize};

/// Terminal value of an export job's `status` field.
pub const EXPORT_COMPLETE_STATUS: &str = "Export Complete";

/// Response of `PUT /api/export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportTrigger {
    #[serde(rename = "jobUuid")]
    pub job_uuid: String,
}

/// Response of `GET /api/3/export_jobs/{uuid}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportJobStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileRef>,
}

impl ExportJobStatus {
    pub fn is_complete(&self) -> bool {
        self.status == EXPORT_COMPLETE_STATUS
    }

    /// IRI of the produced artifact, once the job is complete.
    pub fn file_iri(&self) -> Option<&str> {
        self.file.as_ref().map(|file| file.iri.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(rename = "@id")]
    pub iri: String,
}
