use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub mod api;
pub mod citations;
pub mod client;
pub mod config_file;
pub mod poller;
pub mod stream;

// Re-export for convenience
pub use api::DocumentApi;
pub use citations::{Segment, extract_citations};
pub use client::{ALLOWED_EXTENSIONS, ApiClient, DEFAULT_MAX_UPLOAD_MB};
pub use poller::{DEFAULT_POLL_INTERVAL, PollEvent, StatusPoller};
pub use stream::{FALLBACK_ANSWER, StreamFailure, Utf8Accumulator, stream_answer};

/// Ingestion lifecycle of an uploaded document.
///
/// `Indexed` and `Failed` are terminal; `Failed` is reachable from any
/// non-terminal state. The initial state comes from the upload response
/// and is always non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocStatus {
    // Older servers report "Uploaded" (or "Uploading...") right after upload.
    #[serde(alias = "Uploaded", alias = "Uploading...")]
    Uploading,
    Extracting,
    #[serde(rename = "Chunking/Embedding")]
    ChunkingEmbedding,
    Indexed,
    Failed,
}

impl DocStatus {
    /// Whether no further transition out of this state can occur.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Indexed | Self::Failed)
    }

    /// Progress indicator percentage. Presentational only.
    pub fn progress_pct(self) -> u16 {
        match self {
            Self::Uploading => 20,
            Self::Extracting => 40,
            Self::ChunkingEmbedding => 80,
            Self::Indexed | Self::Failed => 100,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Uploading => "Uploading",
            Self::Extracting => "Extracting",
            Self::ChunkingEmbedding => "Chunking/Embedding",
            Self::Indexed => "Indexed",
            Self::Failed => "Failed",
        }
    }
}

/// A document tracked by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    /// Display name; also the join key for citation resolution.
    pub name: String,
    pub status: DocStatus,
}

/// Retrieval scope for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryScope {
    ThisDocument,
    AllDocuments,
}

impl QueryScope {
    pub fn label(self) -> &'static str {
        match self {
            Self::ThisDocument => "this document",
            Self::AllDocuments => "all documents",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::ThisDocument => Self::AllDocuments,
            Self::AllDocuments => Self::ThisDocument,
        }
    }
}

/// Body of `POST /api/qa`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub scope: QueryScope,
    /// Only meaningful when `scope` is `ThisDocument`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
}

/// Response of `GET /api/documents`.
#[derive(Debug, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<Document>,
}

/// Response of `GET /api/status/{id}`.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: DocStatus,
}

/// Response of `POST /api/upload`.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub file_id: String,
    pub status: DocStatus,
    pub file_name: Option<String>,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("unsupported file type: .{0}")]
    UnsupportedFileType(String),
    #[error("file exceeds the {limit_mb} MB upload limit")]
    FileTooLarge { limit_mb: u64 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_terminality() {
        assert!(!DocStatus::Uploading.is_terminal());
        assert!(!DocStatus::Extracting.is_terminal());
        assert!(!DocStatus::ChunkingEmbedding.is_terminal());
        assert!(DocStatus::Indexed.is_terminal());
        assert!(DocStatus::Failed.is_terminal());
    }

    #[test]
    fn status_progress_mapping() {
        assert_eq!(DocStatus::Uploading.progress_pct(), 20);
        assert_eq!(DocStatus::Extracting.progress_pct(), 40);
        assert_eq!(DocStatus::ChunkingEmbedding.progress_pct(), 80);
        assert_eq!(DocStatus::Indexed.progress_pct(), 100);
        assert_eq!(DocStatus::Failed.progress_pct(), 100);
    }

    #[test]
    fn status_wire_strings_round_trip() {
        let resp: StatusResponse =
            serde_json::from_str(r#"{"status": "Chunking/Embedding"}"#).unwrap();
        assert_eq!(resp.status, DocStatus::ChunkingEmbedding);

        let resp: StatusResponse = serde_json::from_str(r#"{"status": "Indexed"}"#).unwrap();
        assert_eq!(resp.status, DocStatus::Indexed);

        assert_eq!(
            serde_json::to_string(&DocStatus::ChunkingEmbedding).unwrap(),
            r#""Chunking/Embedding""#
        );
    }

    #[test]
    fn status_accepts_upload_time_aliases() {
        let resp: StatusResponse = serde_json::from_str(r#"{"status": "Uploaded"}"#).unwrap();
        assert_eq!(resp.status, DocStatus::Uploading);

        let resp: StatusResponse = serde_json::from_str(r#"{"status": "Uploading..."}"#).unwrap();
        assert_eq!(resp.status, DocStatus::Uploading);
    }

    #[test]
    fn unknown_status_is_a_parse_error() {
        assert!(serde_json::from_str::<StatusResponse>(r#"{"status": "Transmogrifying"}"#).is_err());
    }

    #[test]
    fn document_list_parses() {
        let raw = r#"{"documents": [
            {"id": "a1", "name": "report.pdf", "status": "Extracting"},
            {"id": "b2", "name": "notes.txt", "status": "Indexed"}
        ]}"#;
        let list: DocumentListResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(list.documents.len(), 2);
        assert_eq!(list.documents[0].name, "report.pdf");
        assert_eq!(list.documents[1].status, DocStatus::Indexed);
    }

    #[test]
    fn query_request_omits_doc_id_when_absent() {
        let req = QueryRequest {
            query: "what is this?".into(),
            scope: QueryScope::AllDocuments,
            doc_id: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("doc_id"));
        assert!(json.contains(r#""scope":"all_documents""#));

        let req = QueryRequest {
            query: "what is this?".into(),
            scope: QueryScope::ThisDocument,
            doc_id: Some("a1".into()),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""doc_id":"a1""#));
        assert!(json.contains(r#""scope":"this_document""#));
    }
}
