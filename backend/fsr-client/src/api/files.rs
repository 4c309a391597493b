use crate::DEFAULT_API_PREFIX;
use crate::client::{ApiRequest, FilePart, FortiSoar};
use crate::error::FsrError;

use std::path::{Path, PathBuf};

use bytes::Bytes;
use const_format::concatcp;
use log::debug;
use serde_json::Value;

const FILES_ENDPOINT: &str = concatcp!(DEFAULT_API_PREFIX, "/files");

/// Upload and download of file attachments.
#[derive(Debug, Clone, Copy)]
pub struct FilesApi<'c> {
    client: &'c FortiSoar,
}

impl<'c> FilesApi<'c> {
    pub(crate) fn new(client: &'c FortiSoar) -> Self {
        Self { client }
    }

    /// Upload a local file as multipart field `file`.
    ///
    /// # Errors
    /// [`FsrError::Io`] when the file cannot be read, otherwise as
    /// [`FortiSoar::request`].
    pub async fn upload(&self, path: impl AsRef<Path>) -> Result<Value, FsrError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FsrError::io(path, e))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                FsrError::invalid_input(format!("'{}' has no file name", path.display()))
            })?;

        self.upload_bytes(&file_name, bytes, None).await
    }

    /// Upload in-memory content under `file_name`.
    pub async fn upload_bytes(
        &self,
        file_name: &str,
        bytes: impl Into<Bytes>,
        mime: Option<&str>,
    ) -> Result<Value, FsrError> {
        let mut part = FilePart::new(file_name, bytes);
        if let Some(mime) = mime {
            part = part.with_mime(mime);
        }

        self.client
            .request(ApiRequest::post(FILES_ENDPOINT).with_file(part))
            .await?
            .json()
    }

    /// Fetch `file_iri` and write its bytes verbatim to `path`.
    pub async fn download(
        &self,
        file_iri: &str,
        path: impl AsRef<Path>,
    ) -> Result<PathBuf, FsrError> {
        let response = self.client.request(ApiRequest::get(file_iri)).await?;
        write_artifact(path.as_ref(), &response.body).await
    }
}

/// Write downloaded bytes unchanged.
pub(crate) async fn write_artifact(path: &Path, bytes: &[u8]) -> Result<PathBuf, FsrError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| FsrError::io(path, e))?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path.to_path_buf())
}
