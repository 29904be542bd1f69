use super::*;
use crate::action::Action;
use crate::tui_event::BackendEvent;
use askdocs_core::{DocStatus, Document, PollEvent, QueryScope};

/// Create a minimal App for testing (no backend, no documents).
fn test_app() -> App {
    App::new(Theme::dark())
}

/// App wired to a command channel so sent commands can be inspected.
fn app_with_backend() -> (
    App,
    mpsc::UnboundedReceiver<BackendCommand>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = test_app();
    app.backend_cmd_tx = Some(tx);
    (app, rx)
}

fn doc(id: &str, name: &str, status: DocStatus) -> Document {
    Document {
        id: id.to_string(),
        name: name.to_string(),
        status,
    }
}

fn load_docs(app: &mut App, docs: Vec<Document>) {
    app.handle_backend_event(BackendEvent::DocumentsLoaded { documents: docs });
    let _ = app.take_registry_dirty();
}

fn type_query(app: &mut App, text: &str) {
    app.update(Action::StartQuery);
    for c in text.chars() {
        app.update(Action::QueryInput(c));
    }
}

// ── Registry ────────────────────────────────────────────────────

#[test]
fn documents_loaded_replaces_registry_and_marks_dirty() {
    let mut app = test_app();
    app.handle_backend_event(BackendEvent::DocumentsLoaded {
        documents: vec![doc("a", "a.pdf", DocStatus::Extracting)],
    });
    assert_eq!(app.entries.len(), 1);
    assert!(app.take_registry_dirty());
    // Consumed: the flag resets until the next change.
    assert!(!app.take_registry_dirty());
}

#[test]
fn upload_appends_entry() {
    let mut app = test_app();
    app.handle_backend_event(BackendEvent::Uploaded {
        document: doc("u1", "new.pdf", DocStatus::Uploading),
    });
    assert_eq!(app.entries.len(), 1);
    assert_eq!(app.entries[0].status, DocStatus::Uploading);
    assert!(app.take_registry_dirty());
}

#[test]
fn poll_event_updates_status_in_place() {
    let mut app = test_app();
    load_docs(&mut app, vec![doc("a", "a.pdf", DocStatus::Extracting)]);

    app.apply_poll_event(PollEvent::StatusChanged {
        doc_id: "a".to_string(),
        status: DocStatus::ChunkingEmbedding,
    });
    assert_eq!(app.entries[0].status, DocStatus::ChunkingEmbedding);
    assert!(app.take_registry_dirty());
}

#[test]
fn setting_the_same_status_twice_is_harmless() {
    let mut app = test_app();
    load_docs(&mut app, vec![doc("a", "a.pdf", DocStatus::Extracting)]);

    for _ in 0..2 {
        app.apply_poll_event(PollEvent::StatusChanged {
            doc_id: "a".to_string(),
            status: DocStatus::Extracting,
        });
    }
    assert_eq!(app.entries.len(), 1);
    assert_eq!(app.entries[0].status, DocStatus::Extracting);
}

#[test]
fn poll_failure_marks_entry_stalled_but_keeps_status() {
    let mut app = test_app();
    load_docs(&mut app, vec![doc("a", "a.pdf", DocStatus::Extracting)]);

    app.apply_poll_event(PollEvent::PollFailed {
        doc_id: "a".to_string(),
        error: "connection refused".to_string(),
    });
    assert!(app.entries[0].stalled);
    assert_eq!(app.entries[0].status, DocStatus::Extracting);
    assert_eq!(app.entries[0].status_label(), "Extracting (stalled)");
}

#[test]
fn delete_removes_entry_and_fixes_selection() {
    let mut app = test_app();
    load_docs(
        &mut app,
        vec![
            doc("a", "a.pdf", DocStatus::Indexed),
            doc("b", "b.pdf", DocStatus::Indexed),
            doc("c", "c.pdf", DocStatus::Indexed),
        ],
    );
    app.selected = Some(2);

    app.handle_backend_event(BackendEvent::Deleted {
        doc_id: "b".to_string(),
    });

    assert_eq!(app.entries.len(), 2);
    assert!(app.entries.iter().all(|e| e.id != "b"));
    // The selection still points at "c" after the shift.
    assert_eq!(app.selected, Some(1));
    assert!(app.take_registry_dirty());
}

#[test]
fn deleting_the_selected_document_clears_selection() {
    let mut app = test_app();
    load_docs(
        &mut app,
        vec![
            doc("a", "a.pdf", DocStatus::Indexed),
            doc("b", "b.pdf", DocStatus::Indexed),
        ],
    );
    app.selected = Some(1);

    app.handle_backend_event(BackendEvent::Deleted {
        doc_id: "b".to_string(),
    });
    assert_eq!(app.selected, None);
}

// ── Answer streaming and supersession ───────────────────────────

#[test]
fn answer_updates_apply_for_the_current_generation() {
    let (mut app, mut rx) = app_with_backend();
    load_docs(&mut app, vec![doc("a", "a.pdf", DocStatus::Indexed)]);
    app.update(Action::DrillIn); // select "a"

    type_query(&mut app, "what is this?");
    app.update(Action::QuerySubmit);
    assert!(app.answer.loading);

    let generation = match rx.try_recv() {
        Ok(BackendCommand::Ask { generation, .. }) => generation,
        _ => panic!("expected an Ask command"),
    };

    app.handle_backend_event(BackendEvent::AnswerUpdate {
        generation,
        text: "partial".to_string(),
    });
    assert_eq!(app.answer.answer, "partial");

    app.handle_backend_event(BackendEvent::AnswerComplete {
        generation,
        error: None,
    });
    assert!(!app.answer.loading);
    assert!(!app.answer.interrupted);
}

#[test]
fn superseded_stream_never_touches_the_answer() {
    let (mut app, mut rx) = app_with_backend();
    load_docs(&mut app, vec![doc("a", "a.pdf", DocStatus::Indexed)]);
    app.update(Action::DrillIn);

    type_query(&mut app, "first question");
    app.update(Action::QuerySubmit);
    let first_generation = match rx.try_recv() {
        Ok(BackendCommand::Ask { generation, .. }) => generation,
        _ => panic!("expected an Ask command"),
    };

    app.handle_backend_event(BackendEvent::AnswerUpdate {
        generation: first_generation,
        text: "first answer so far".to_string(),
    });

    // A second ask supersedes the first mid-stream.
    app.answer.query = "second question".to_string();
    app.update(Action::QuerySubmit);
    let second_generation = match rx.try_recv() {
        Ok(BackendCommand::Ask { generation, .. }) => generation,
        _ => panic!("expected an Ask command"),
    };
    assert!(second_generation > first_generation);
    assert_eq!(app.answer.answer, "");

    // Late increments from the first stream are discarded...
    app.handle_backend_event(BackendEvent::AnswerUpdate {
        generation: first_generation,
        text: "first answer, more of it".to_string(),
    });
    assert_eq!(app.answer.answer, "");

    // ...as is its completion (loading must stay true for the second ask).
    app.handle_backend_event(BackendEvent::AnswerComplete {
        generation: first_generation,
        error: None,
    });
    assert!(app.answer.loading);

    app.handle_backend_event(BackendEvent::AnswerUpdate {
        generation: second_generation,
        text: "second answer".to_string(),
    });
    app.handle_backend_event(BackendEvent::AnswerComplete {
        generation: second_generation,
        error: None,
    });
    assert_eq!(app.answer.answer, "second answer");
    assert!(!app.answer.loading);
}

#[test]
fn interrupted_stream_keeps_partial_text() {
    let (mut app, mut rx) = app_with_backend();
    app.answer.scope = QueryScope::AllDocuments;
    type_query(&mut app, "q");
    app.update(Action::QuerySubmit);
    let generation = match rx.try_recv() {
        Ok(BackendCommand::Ask { generation, .. }) => generation,
        _ => panic!("expected an Ask command"),
    };

    app.handle_backend_event(BackendEvent::AnswerUpdate {
        generation,
        text: "partial answer".to_string(),
    });
    app.handle_backend_event(BackendEvent::AnswerComplete {
        generation,
        error: Some("reset by peer".to_string()),
    });

    assert_eq!(app.answer.answer, "partial answer");
    assert!(app.answer.interrupted);
    assert!(!app.answer.loading);
    assert!(app.status_line.is_some());
}

#[test]
fn answer_updates_rederive_citation_segments() {
    let mut app = test_app();
    let generation = app.answer.begin();

    // Marker still incomplete: plain text only.
    app.handle_backend_event(BackendEvent::AnswerUpdate {
        generation,
        text: "See [Source: a.pdf, Pag".to_string(),
    });
    assert!(app.answer.citation_indices().is_empty());

    // The next increment completes it.
    app.handle_backend_event(BackendEvent::AnswerUpdate {
        generation,
        text: "See [Source: a.pdf, Page: 4] ok".to_string(),
    });
    assert_eq!(app.answer.citation_indices().len(), 1);
}

// ── Query submission guards ─────────────────────────────────────

#[test]
fn empty_query_is_not_submitted() {
    let (mut app, mut rx) = app_with_backend();
    type_query(&mut app, "   ");
    app.update(Action::QuerySubmit);
    assert!(rx.try_recv().is_err());
    assert!(!app.answer.loading);
}

#[test]
fn this_document_scope_requires_a_selection() {
    let (mut app, mut rx) = app_with_backend();
    load_docs(&mut app, vec![doc("a", "a.pdf", DocStatus::Indexed)]);
    assert_eq!(app.answer.scope, QueryScope::ThisDocument);

    type_query(&mut app, "anything");
    app.update(Action::QuerySubmit);

    assert!(rx.try_recv().is_err());
    assert!(app.status_line.is_some());
}

#[test]
fn this_document_scope_sends_the_selected_doc_id() {
    let (mut app, mut rx) = app_with_backend();
    load_docs(&mut app, vec![doc("a", "a.pdf", DocStatus::Indexed)]);
    app.update(Action::DrillIn);

    type_query(&mut app, "q");
    app.update(Action::QuerySubmit);

    match rx.try_recv() {
        Ok(BackendCommand::Ask { request, .. }) => {
            assert_eq!(request.doc_id.as_deref(), Some("a"));
            assert_eq!(request.scope, QueryScope::ThisDocument);
        }
        _ => panic!("expected an Ask command"),
    }
}

#[test]
fn all_documents_scope_omits_doc_id() {
    let (mut app, mut rx) = app_with_backend();
    app.update(Action::ToggleScope);
    assert_eq!(app.answer.scope, QueryScope::AllDocuments);

    type_query(&mut app, "q");
    app.update(Action::QuerySubmit);

    match rx.try_recv() {
        Ok(BackendCommand::Ask { request, .. }) => assert!(request.doc_id.is_none()),
        _ => panic!("expected an Ask command"),
    }
}

// ── Citation activation ─────────────────────────────────────────

#[test]
fn activating_a_citation_selects_the_named_document() {
    let mut app = test_app();
    load_docs(
        &mut app,
        vec![
            doc("a", "a.pdf", DocStatus::Indexed),
            doc("b", "b.pdf", DocStatus::Indexed),
        ],
    );

    let generation = app.answer.begin();
    app.handle_backend_event(BackendEvent::AnswerUpdate {
        generation,
        text: "See [Source: b.pdf, Page: 7] here".to_string(),
    });

    app.update(Action::NextCitation);
    assert_eq!(app.answer.selected_citation(), Some(("b.pdf", 7)));

    app.update(Action::DrillIn); // focus moved to Answer by NextCitation
    assert_eq!(app.selected, Some(1));
    assert_eq!(app.page_to_view, 7);
}

#[test]
fn citation_to_an_unknown_document_is_a_noop() {
    let mut app = test_app();
    load_docs(&mut app, vec![doc("a", "a.pdf", DocStatus::Indexed)]);

    let generation = app.answer.begin();
    app.handle_backend_event(BackendEvent::AnswerUpdate {
        generation,
        text: "[Source: missing.pdf, Page: 1]".to_string(),
    });

    app.update(Action::NextCitation);
    app.update(Action::DrillIn);
    assert_eq!(app.selected, None);
    assert!(app.status_line.is_some());
}

#[test]
fn citation_cursor_wraps_in_both_directions() {
    let mut app = test_app();
    let generation = app.answer.begin();
    app.handle_backend_event(BackendEvent::AnswerUpdate {
        generation,
        text: "[Source: a, Page: 1] and [Source: b, Page: 2]".to_string(),
    });

    app.update(Action::NextCitation);
    let first = app.answer.citation_cursor;
    app.update(Action::NextCitation);
    let second = app.answer.citation_cursor;
    assert_ne!(first, second);
    app.update(Action::NextCitation);
    assert_eq!(app.answer.citation_cursor, first); // wrapped

    app.update(Action::PrevCitation);
    assert_eq!(app.answer.citation_cursor, second);
}

// ── Misc ────────────────────────────────────────────────────────

#[test]
fn delete_action_sends_the_cursor_documents_id() {
    let (mut app, mut rx) = app_with_backend();
    load_docs(
        &mut app,
        vec![
            doc("a", "a.pdf", DocStatus::Indexed),
            doc("b", "b.pdf", DocStatus::Indexed),
        ],
    );
    app.update(Action::MoveDown);
    app.update(Action::DeleteDoc);

    match rx.try_recv() {
        Ok(BackendCommand::Delete { doc_id }) => assert_eq!(doc_id, "b"),
        _ => panic!("expected a Delete command"),
    }
}

#[test]
fn status_line_expires_after_a_while() {
    let mut app = test_app();
    app.set_status_line("hello");
    for _ in 0..60 {
        app.update(Action::Tick);
    }
    assert!(app.status_line.is_none());
}
