//! Recurring status polling for documents that are still being ingested.
//!
//! One timer task per tracked document, keyed by id. All registration
//! changes go through [`StatusPoller::track`], [`untrack`](StatusPoller::untrack),
//! [`sync`](StatusPoller::sync), or [`shutdown`](StatusPoller::shutdown);
//! nothing else touches the registration map. Tasks stop themselves on a
//! terminal status or a failed fetch, and finished registrations are
//! reaped on the next `sync`.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::DocumentApi;
use crate::{DocStatus, Document};

/// Default delay between successive status fetches for one document.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Updates flowing from poll tasks to the owning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// A poll round-trip succeeded.
    StatusChanged { doc_id: String, status: DocStatus },
    /// A poll failed. Polling for this document has stopped; its status
    /// stays at the last observed value.
    PollFailed { doc_id: String, error: String },
}

/// A live timer for one document.
struct PollRegistration {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns every poll timer for a session.
///
/// At most one registration exists per document id at any time. Dropping
/// the poller aborts nothing by itself — call `shutdown` on teardown.
pub struct StatusPoller {
    api: Arc<dyn DocumentApi>,
    interval: Duration,
    events: mpsc::UnboundedSender<PollEvent>,
    registrations: HashMap<String, PollRegistration>,
    /// Ids whose poll failed. They keep their last status and are never
    /// re-registered by `sync` (no retry policy).
    stalled: Arc<Mutex<HashSet<String>>>,
}

impl StatusPoller {
    pub fn new(
        api: Arc<dyn DocumentApi>,
        interval: Duration,
        events: mpsc::UnboundedSender<PollEvent>,
    ) -> Self {
        Self {
            api,
            interval,
            events,
            registrations: HashMap::new(),
            stalled: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Begin polling `doc_id`. A document with a live registration is
    /// never registered twice.
    pub fn track(&mut self, doc_id: &str) {
        if let Some(reg) = self.registrations.get(doc_id)
            && !reg.handle.is_finished()
        {
            return;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            self.api.clone(),
            doc_id.to_string(),
            self.interval,
            self.events.clone(),
            cancel.clone(),
            self.stalled.clone(),
        ));
        tracing::debug!(doc_id, "poll registration created");
        self.registrations
            .insert(doc_id.to_string(), PollRegistration { cancel, handle });
    }

    /// Cancel and forget the registration for `doc_id`, if any.
    pub fn untrack(&mut self, doc_id: &str) {
        if let Some(reg) = self.registrations.remove(doc_id) {
            reg.cancel.cancel();
            tracing::debug!(doc_id, "poll registration cancelled");
        }
    }

    /// Recompute the registration set against the current registry.
    ///
    /// Every non-terminal, non-stalled document gets a timer; documents
    /// that are gone or terminal lose theirs. Call after every registry
    /// change so newly-terminal documents are retired promptly.
    pub fn sync(&mut self, documents: &[Document]) {
        // Reap tasks that stopped themselves.
        self.registrations.retain(|_, reg| !reg.handle.is_finished());

        let present: HashSet<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        self.stalled
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|id| present.contains(id.as_str()));

        let wanted: HashSet<&str> = {
            let stalled = self.stalled.lock().unwrap_or_else(|e| e.into_inner());
            documents
                .iter()
                .filter(|d| !d.status.is_terminal() && !stalled.contains(&d.id))
                .map(|d| d.id.as_str())
                .collect()
        };

        let stale: Vec<String> = self
            .registrations
            .keys()
            .filter(|id| !wanted.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            self.untrack(&id);
        }

        for doc in documents {
            if wanted.contains(doc.id.as_str()) {
                self.track(&doc.id);
            }
        }
    }

    /// Whether a live registration exists for `doc_id`.
    pub fn is_tracked(&self, doc_id: &str) -> bool {
        self.registrations
            .get(doc_id)
            .is_some_and(|reg| !reg.handle.is_finished())
    }

    /// Cancel every registration (view teardown). No timer survives this.
    pub fn shutdown(&mut self) {
        let count = self.registrations.len();
        for (_, reg) in self.registrations.drain() {
            reg.cancel.cancel();
        }
        if count > 0 {
            tracing::debug!(count, "poller shut down");
        }
    }
}

/// One document's timer: sleep, fetch, publish, repeat. Exits on terminal
/// status, fetch failure, cancellation, or a closed event channel.
async fn poll_loop(
    api: Arc<dyn DocumentApi>,
    doc_id: String,
    interval: Duration,
    events: mpsc::UnboundedSender<PollEvent>,
    cancel: CancellationToken,
    stalled: Arc<Mutex<HashSet<String>>>,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }

        match api.fetch_status(&doc_id).await {
            Ok(status) => {
                let terminal = status.is_terminal();
                if events
                    .send(PollEvent::StatusChanged {
                        doc_id: doc_id.clone(),
                        status,
                    })
                    .is_err()
                {
                    return;
                }
                if terminal {
                    tracing::debug!(%doc_id, status = status.label(), "poll reached terminal state");
                    return;
                }
            }
            Err(err) => {
                tracing::warn!(%doc_id, error = %err, "status poll failed; giving up");
                stalled
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(doc_id.clone());
                let _ = events.send(PollEvent::PollFailed {
                    doc_id,
                    error: err.to_string(),
                });
                return;
            }
        }
    }
}
