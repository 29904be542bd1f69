mod backend;
mod update;

use std::path::PathBuf;

use tokio::sync::mpsc;

use askdocs_core::Document;

use crate::model::answer::AnswerState;
use crate::model::document::DocEntry;
use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Which panel has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Documents,
    Answer,
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Query,
}

/// Main application state.
pub struct App {
    /// The document registry. Mutated only by whole-entry replacement
    /// keyed by id (upload inserts, poll events update status, delete
    /// removes).
    pub entries: Vec<DocEntry>,
    pub cursor: usize,
    /// Index of the currently selected (viewed) document.
    pub selected: Option<usize>,
    /// Page to show in the external viewer, driven by citation clicks.
    pub page_to_view: u32,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub answer: AnswerState,
    pub theme: Theme,
    pub should_quit: bool,
    pub show_help: bool,
    /// Transient message shown in the footer.
    pub status_line: Option<String>,
    pub tick: usize,
    /// Tick at which the status line was set (cleared after a few seconds).
    status_line_tick: usize,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
    /// Temp directory for downloaded documents (auto-cleanup on drop).
    pub temp_dir: Option<tempfile::TempDir>,
    /// Set on registry changes; the main loop consumes it to re-sync the
    /// poller's registration set.
    registry_dirty: bool,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            selected: None,
            page_to_view: 1,
            focus: Focus::Documents,
            input_mode: InputMode::Normal,
            answer: AnswerState::new(),
            theme,
            should_quit: false,
            show_help: false,
            status_line: None,
            tick: 0,
            status_line_tick: 0,
            backend_cmd_tx: None,
            temp_dir: None,
            registry_dirty: false,
        }
    }

    /// Registry snapshot for `StatusPoller::sync`.
    pub fn documents(&self) -> Vec<Document> {
        self.entries.iter().map(DocEntry::to_document).collect()
    }

    /// True once per registry change; the caller re-syncs the poller.
    pub fn take_registry_dirty(&mut self) -> bool {
        std::mem::take(&mut self.registry_dirty)
    }

    pub fn selected_doc(&self) -> Option<&DocEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    pub(crate) fn send(&self, cmd: BackendCommand) {
        if let Some(tx) = &self.backend_cmd_tx {
            let _ = tx.send(cmd);
        }
    }

    pub(crate) fn set_status_line(&mut self, message: impl Into<String>) {
        self.status_line = Some(message.into());
        self.status_line_tick = self.tick;
    }

    pub(crate) fn entry_mut(&mut self, doc_id: &str) -> Option<&mut DocEntry> {
        self.entries.iter_mut().find(|e| e.id == doc_id)
    }

    /// Resolve a citation to a document by name and select it.
    /// The first matching name wins.
    pub(crate) fn select_by_name(&mut self, name: &str, page: u32) -> bool {
        if let Some(index) = self.entries.iter().position(|e| e.name == name) {
            self.selected = Some(index);
            self.cursor = index;
            self.page_to_view = page;
            true
        } else {
            false
        }
    }

    /// Directory for downloaded document copies, created on first use.
    pub(crate) fn download_dir(&mut self) -> Option<PathBuf> {
        if self.temp_dir.is_none() {
            self.temp_dir = tempfile::tempdir().ok();
        }
        self.temp_dir.as_ref().map(|d| d.path().to_path_buf())
    }

    /// Render the current screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        crate::view::render(f, self);
    }
}

#[cfg(test)]
mod tests;
