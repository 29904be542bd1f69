use askdocs_core::{QueryRequest, QueryScope};

use super::{App, Focus, InputMode};
use crate::action::Action;
use crate::tui_event::BackendCommand;

/// How many ticks (at ~100ms) a footer message stays visible.
const STATUS_LINE_TICKS: usize = 50;

impl App {
    /// Process one action and update model state.
    pub fn update(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Tick => {
                self.tick += 1;
                if self.status_line.is_some()
                    && self.tick.saturating_sub(self.status_line_tick) > STATUS_LINE_TICKS
                {
                    self.status_line = None;
                }
            }
            Action::Quit => self.should_quit = true,
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Resize(_, _) => {}

            Action::FocusNext => {
                self.focus = match self.focus {
                    Focus::Documents => Focus::Answer,
                    Focus::Answer => Focus::Documents,
                };
            }

            Action::MoveUp => match self.focus {
                Focus::Documents => self.cursor = self.cursor.saturating_sub(1),
                Focus::Answer => self.answer.scroll = self.answer.scroll.saturating_sub(1),
            },
            Action::MoveDown => match self.focus {
                Focus::Documents => {
                    if !self.entries.is_empty() {
                        self.cursor = (self.cursor + 1).min(self.entries.len() - 1);
                    }
                }
                Focus::Answer => self.answer.scroll = self.answer.scroll.saturating_add(1),
            },

            Action::DrillIn => match self.focus {
                Focus::Documents => {
                    if self.cursor < self.entries.len() {
                        self.selected = Some(self.cursor);
                        self.page_to_view = 1;
                    }
                }
                Focus::Answer => self.activate_citation(),
            },

            Action::NavigateBack => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.status_line = None;
                }
            }

            Action::StartQuery => {
                self.focus = Focus::Answer;
                self.input_mode = InputMode::Query;
            }
            Action::QueryInput(c) => {
                if c == '\x08' {
                    self.answer.query.pop();
                } else {
                    self.answer.query.push(c);
                }
            }
            Action::QueryCancel => self.input_mode = InputMode::Normal,
            Action::QuerySubmit => {
                self.input_mode = InputMode::Normal;
                self.submit_query();
            }
            Action::ToggleScope => self.answer.scope = self.answer.scope.toggle(),

            Action::DeleteDoc => {
                if let Some(entry) = self.entries.get(self.cursor) {
                    self.send(BackendCommand::Delete {
                        doc_id: entry.id.clone(),
                    });
                }
            }
            Action::ViewDoc => self.request_download(),
            Action::Refresh => self.send(BackendCommand::RefreshDocuments),

            Action::NextCitation => {
                self.focus = Focus::Answer;
                self.answer.next_citation();
            }
            Action::PrevCitation => {
                self.focus = Focus::Answer;
                self.answer.prev_citation();
            }
        }
    }

    /// Send the current question to the backend, superseding any stream
    /// still in flight.
    fn submit_query(&mut self) {
        if self.answer.query.trim().is_empty() {
            return;
        }

        let doc_id = match self.answer.scope {
            QueryScope::ThisDocument => match self.selected_doc() {
                Some(doc) => Some(doc.id.clone()),
                None => {
                    self.set_status_line("Select a document first (or switch scope with 's')");
                    return;
                }
            },
            QueryScope::AllDocuments => None,
        };

        let request = QueryRequest {
            query: self.answer.query.clone(),
            scope: self.answer.scope,
            doc_id,
        };
        let generation = self.answer.begin();
        self.send(BackendCommand::Ask {
            generation,
            request,
        });
    }

    /// Jump to the document and page named by the highlighted citation.
    fn activate_citation(&mut self) {
        let Some((name, page)) = self
            .answer
            .selected_citation()
            .map(|(n, p)| (n.to_string(), p))
        else {
            return;
        };
        if self.select_by_name(&name, page) {
            self.set_status_line(format!("Viewing {name}, page {page}"));
        } else {
            self.set_status_line(format!("No document named '{name}'"));
        }
    }

    fn request_download(&mut self) {
        let Some(entry) = self.entries.get(self.cursor) else {
            return;
        };
        let (doc_id, name) = (entry.id.clone(), entry.name.clone());
        let Some(dir) = self.download_dir() else {
            self.set_status_line("Could not create a temp directory");
            return;
        };
        self.send(BackendCommand::Download {
            doc_id,
            dest: dir.join(name),
        });
    }
}
