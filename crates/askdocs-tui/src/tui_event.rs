use std::path::PathBuf;

use askdocs_core::{Document, QueryRequest};

/// Commands sent from the TUI to the backend listener.
pub enum BackendCommand {
    /// Fetch the full document list from the server.
    RefreshDocuments,
    /// Validate and upload a local file.
    Upload { path: PathBuf },
    /// Delete a document on the server.
    Delete { doc_id: String },
    /// Download a document payload for viewing.
    Download { doc_id: String, dest: PathBuf },
    /// Start a new answer stream. `generation` tags every event the stream
    /// emits so a superseded stream's output can be discarded.
    Ask {
        generation: u64,
        request: QueryRequest,
    },
}

/// Events flowing from the backend to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    DocumentsLoaded { documents: Vec<Document> },
    DocumentsLoadFailed { error: String },
    Uploaded { document: Document },
    UploadFailed { name: String, error: String },
    Deleted { doc_id: String },
    DeleteFailed { doc_id: String, error: String },
    Downloaded { doc_id: String, path: PathBuf },
    DownloadFailed { doc_id: String, error: String },
    /// The full accumulated answer so far for the given ask generation.
    AnswerUpdate { generation: u64, text: String },
    /// The stream ended. `error` is set when it was interrupted mid-flight
    /// (partial text stays visible).
    AnswerComplete {
        generation: u64,
        error: Option<String>,
    },
}
