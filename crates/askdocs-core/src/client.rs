//! HTTP client for the askdocs server API.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use crate::api::DocumentApi;
use crate::stream::{self, StreamFailure};
use crate::{
    CoreError, DocStatus, Document, DocumentListResponse, QueryRequest, StatusResponse,
    UploadResponse,
};

/// File extensions the server's ingestion pipeline accepts.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "jpg", "jpeg", "png"];

/// Default upload ceiling in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 50;

/// Client for one askdocs server. Cheap to clone (shares the connection pool).
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    max_upload_bytes: u64,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }

    /// Override the upload size ceiling.
    pub fn with_max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/documents`
    pub async fn list_documents(&self) -> Result<Vec<Document>, CoreError> {
        let response = self
            .client
            .get(format!("{}/api/documents", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        let list: DocumentListResponse = response.json().await?;
        Ok(list.documents)
    }

    /// `GET /api/status/{id}`
    pub async fn fetch_status(&self, doc_id: &str) -> Result<DocStatus, CoreError> {
        let response = self
            .client
            .get(format!("{}/api/status/{}", self.base_url, doc_id))
            .send()
            .await?
            .error_for_status()?;
        let status: StatusResponse = response.json().await?;
        Ok(status.status)
    }

    /// Check a file against the upload rules without touching the network.
    /// Returns the file size on success.
    pub async fn validate_upload(&self, path: &Path) -> Result<u64, CoreError> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|_| CoreError::FileNotFound(path.to_path_buf()))?;
        if !meta.is_file() {
            return Err(CoreError::FileNotFound(path.to_path_buf()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(CoreError::UnsupportedFileType(ext));
        }

        if meta.len() > self.max_upload_bytes {
            return Err(CoreError::FileTooLarge {
                limit_mb: self.max_upload_bytes / (1024 * 1024),
            });
        }

        Ok(meta.len())
    }

    /// `POST /api/upload` (multipart). Local validation runs first; a file
    /// that fails it never generates a request.
    pub async fn upload(&self, path: &Path) -> Result<Document, CoreError> {
        let size = self.validate_upload(path).await?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let data = tokio::fs::read(path).await?;
        let part = reqwest::multipart::Part::bytes(data).file_name(file_name.clone());
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::info!(name = %file_name, size, "uploading document");
        let response = self
            .client
            .post(format!("{}/api/upload", self.base_url))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        let upload: UploadResponse = response.json().await?;

        Ok(Document {
            id: upload.file_id,
            name: upload.file_name.unwrap_or(file_name),
            status: upload.status,
        })
    }

    /// `DELETE /api/documents/{id}`
    pub async fn delete_document(&self, doc_id: &str) -> Result<(), CoreError> {
        self.client
            .delete(format!("{}/api/documents/{}", self.base_url, doc_id))
            .send()
            .await?
            .error_for_status()?;
        tracing::info!(doc_id, "document deleted");
        Ok(())
    }

    /// `GET /api/download/{id}`, writing the payload to `dest`.
    pub async fn download(&self, doc_id: &str, dest: &Path) -> Result<(), CoreError> {
        let response = self
            .client
            .get(format!("{}/api/download/{}", self.base_url, doc_id))
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;
        tracing::info!(doc_id, dest = %dest.display(), bytes = bytes.len(), "document downloaded");
        Ok(())
    }

    /// `POST /api/qa`, streaming the answer. See [`stream::stream_answer`].
    pub async fn ask(
        &self,
        request: &QueryRequest,
        publish: impl FnMut(&str),
    ) -> Result<String, StreamFailure> {
        stream::stream_answer(&self.client, &self.base_url, request, publish).await
    }
}

impl DocumentApi for ApiClient {
    fn fetch_status<'a>(
        &'a self,
        doc_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<DocStatus, CoreError>> + Send + 'a>> {
        Box::pin(ApiClient::fetch_status(self, doc_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Client pointed at a port nothing listens on: any network call fails
    /// with a connection error, so validation errors prove no call was made.
    fn offline_client() -> ApiClient {
        ApiClient::new("http://127.0.0.1:1")
    }

    fn temp_file(dir: &tempfile::TempDir, name: &str, len: usize) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&vec![0u8; len]).unwrap();
        path
    }

    #[tokio::test]
    async fn oversized_file_rejected_before_any_network_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "big.pdf", 64);
        let client = offline_client().with_max_upload_bytes(16);

        // upload() must fail with the validation error, not a connection
        // error — the unreachable base_url is never contacted.
        let err = client.upload(&path).await.unwrap_err();
        assert!(matches!(err, CoreError::FileTooLarge { .. }));
    }

    #[tokio::test]
    async fn file_at_the_limit_passes_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "fits.pdf", 16);
        let client = offline_client().with_max_upload_bytes(16);

        assert_eq!(client.validate_upload(&path).await.unwrap(), 16);
    }

    #[tokio::test]
    async fn unsupported_extension_rejected_locally() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "archive.zip", 8);

        let err = offline_client().upload(&path).await.unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFileType(ext) if ext == "zip"));
    }

    #[tokio::test]
    async fn extension_check_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "scan.PDF", 8);

        assert!(offline_client().validate_upload(&path).await.is_ok());
    }

    #[tokio::test]
    async fn missing_file_rejected_locally() {
        let err = offline_client()
            .upload(std::path::Path::new("/nonexistent/nope.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::FileNotFound(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
