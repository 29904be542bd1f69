use askdocs_core::PollEvent;

use super::App;
use crate::model::document::DocEntry;
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::DocumentsLoaded { documents } => {
                self.entries = documents.into_iter().map(DocEntry::new).collect();
                self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
                self.selected = None;
                self.registry_dirty = true;
            }
            BackendEvent::DocumentsLoadFailed { error } => {
                self.set_status_line(format!("Failed to load documents: {error}"));
            }
            BackendEvent::Uploaded { document } => {
                self.set_status_line(format!("Uploaded '{}'", document.name));
                self.entries.push(DocEntry::new(document));
                self.registry_dirty = true;
            }
            BackendEvent::UploadFailed { name, error } => {
                self.set_status_line(format!("Upload of '{name}' failed: {error}"));
            }
            BackendEvent::Deleted { doc_id } => {
                if let Some(index) = self.entries.iter().position(|e| e.id == doc_id) {
                    let entry = self.entries.remove(index);
                    self.set_status_line(format!("Deleted '{}'", entry.name));
                    // Keep selection/cursor pointing at the same entries.
                    self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
                    self.selected = match self.selected {
                        Some(s) if s == index => None,
                        Some(s) if s > index => Some(s - 1),
                        other => other,
                    };
                    self.registry_dirty = true;
                }
            }
            BackendEvent::DeleteFailed { doc_id, error } => {
                self.set_status_line(format!("Delete of {doc_id} failed: {error}"));
            }
            BackendEvent::Downloaded { doc_id, path } => {
                self.set_status_line(format!("Saved to {}", path.display()));
                if let Some(entry) = self.entry_mut(&doc_id) {
                    entry.local_path = Some(path);
                }
            }
            BackendEvent::DownloadFailed { doc_id, error } => {
                self.set_status_line(format!("Download of {doc_id} failed: {error}"));
            }
            BackendEvent::AnswerUpdate { generation, text } => {
                // A superseded stream must never touch the current buffer.
                if generation != self.answer.generation {
                    return;
                }
                self.answer.set_answer(text);
            }
            BackendEvent::AnswerComplete { generation, error } => {
                if generation != self.answer.generation {
                    return;
                }
                self.answer.loading = false;
                self.answer.interrupted = error.is_some();
                if let Some(error) = error {
                    self.set_status_line(format!("Answer stream interrupted: {error}"));
                }
            }
        }
    }

    /// Apply a poll event to the registry.
    pub fn apply_poll_event(&mut self, event: PollEvent) {
        match event {
            PollEvent::StatusChanged { doc_id, status } => {
                if let Some(entry) = self.entry_mut(&doc_id) {
                    entry.status = status;
                }
                self.registry_dirty = true;
            }
            PollEvent::PollFailed { doc_id, error } => {
                tracing::warn!(%doc_id, %error, "document stuck: polling stopped");
                if let Some(entry) = self.entry_mut(&doc_id) {
                    entry.stalled = true;
                }
                self.registry_dirty = true;
            }
        }
    }
}
