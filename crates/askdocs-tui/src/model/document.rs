use std::path::PathBuf;

use askdocs_core::{DocStatus, Document};

/// One registry row: a tracked document plus client-side view state.
#[derive(Debug, Clone)]
pub struct DocEntry {
    pub id: String,
    /// Display name; join key for citation resolution, so names should be
    /// unique among tracked documents.
    pub name: String,
    pub status: DocStatus,
    /// Polling stopped after a failed fetch; `status` is the last value
    /// observed before the failure.
    pub stalled: bool,
    /// Local copy fetched for viewing, if any.
    pub local_path: Option<PathBuf>,
}

impl DocEntry {
    pub fn new(doc: Document) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            status: doc.status,
            stalled: false,
            local_path: None,
        }
    }

    /// Snapshot as a wire document (what the poller's `sync` consumes).
    pub fn to_document(&self) -> Document {
        Document {
            id: self.id.clone(),
            name: self.name.clone(),
            status: self.status,
        }
    }

    /// Status text for the list row.
    pub fn status_label(&self) -> String {
        if self.stalled {
            format!("{} (stalled)", self.status.label())
        } else {
            self.status.label().to_string()
        }
    }
}
