//! Backend listener: translates TUI commands into API calls.
//!
//! Each command spawns its own task so a slow upload or a long answer
//! stream never blocks the command loop. Results come back to the TUI as
//! [`BackendEvent`]s; senders ignore failures (the UI may already be gone).

use askdocs_core::{ApiClient, FALLBACK_ANSWER, QueryRequest, StreamFailure};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui_event::{BackendCommand, BackendEvent};

/// Run the backend command loop until the channel closes or `cancel` fires.
pub async fn run(
    api: ApiClient,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    loop {
        let cmd = tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };

        match cmd {
            BackendCommand::RefreshDocuments => {
                let api = api.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    match api.list_documents().await {
                        Ok(documents) => {
                            let _ = tx.send(BackendEvent::DocumentsLoaded { documents });
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "document list fetch failed");
                            let _ = tx.send(BackendEvent::DocumentsLoadFailed {
                                error: err.to_string(),
                            });
                        }
                    }
                });
            }
            BackendCommand::Upload { path } => {
                let api = api.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string());
                    match api.upload(&path).await {
                        Ok(document) => {
                            let _ = tx.send(BackendEvent::Uploaded { document });
                        }
                        Err(err) => {
                            tracing::warn!(%name, error = %err, "upload failed");
                            let _ = tx.send(BackendEvent::UploadFailed {
                                name,
                                error: err.to_string(),
                            });
                        }
                    }
                });
            }
            BackendCommand::Delete { doc_id } => {
                let api = api.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    match api.delete_document(&doc_id).await {
                        Ok(()) => {
                            let _ = tx.send(BackendEvent::Deleted { doc_id });
                        }
                        Err(err) => {
                            let _ = tx.send(BackendEvent::DeleteFailed {
                                doc_id,
                                error: err.to_string(),
                            });
                        }
                    }
                });
            }
            BackendCommand::Download { doc_id, dest } => {
                let api = api.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    match api.download(&doc_id, &dest).await {
                        Ok(()) => {
                            let _ = tx.send(BackendEvent::Downloaded { doc_id, path: dest });
                        }
                        Err(err) => {
                            let _ = tx.send(BackendEvent::DownloadFailed {
                                doc_id,
                                error: err.to_string(),
                            });
                        }
                    }
                });
            }
            BackendCommand::Ask {
                generation,
                request,
            } => {
                let api = api.clone();
                let tx = tx.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    run_ask(api, generation, request, tx, cancel).await;
                });
            }
        }
    }
}

/// Drive one answer stream, republishing the growing buffer per increment.
///
/// Failure policy: a failure before any content arrived substitutes the
/// fixed fallback answer; a mid-stream failure keeps the partial text and
/// reports the error. Neither is retried.
async fn run_ask(
    api: ApiClient,
    generation: u64,
    request: QueryRequest,
    tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    let publish_tx = tx.clone();
    let publish = move |answer: &str| {
        let _ = publish_tx.send(BackendEvent::AnswerUpdate {
            generation,
            text: answer.to_string(),
        });
    };

    let result = tokio::select! {
        _ = cancel.cancelled() => return,
        result = api.ask(&request, publish) => result,
    };

    match result {
        Ok(_) => {
            let _ = tx.send(BackendEvent::AnswerComplete {
                generation,
                error: None,
            });
        }
        Err(StreamFailure::Request(err)) => {
            tracing::warn!(error = %err, "answer request failed before streaming");
            let _ = tx.send(BackendEvent::AnswerUpdate {
                generation,
                text: FALLBACK_ANSWER.to_string(),
            });
            let _ = tx.send(BackendEvent::AnswerComplete {
                generation,
                error: None,
            });
        }
        Err(StreamFailure::Interrupted { received, source }) => {
            tracing::warn!(received, error = %source, "answer stream interrupted");
            let _ = tx.send(BackendEvent::AnswerComplete {
                generation,
                error: Some(source.to_string()),
            });
        }
    }
}
