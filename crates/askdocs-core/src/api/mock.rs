//! Mock status backend for testing.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use super::DocumentApi;
use crate::{CoreError, DocStatus};

/// A scripted response for [`MockApi`].
#[derive(Clone, Debug)]
pub enum MockStatus {
    /// Simulate a successful status fetch.
    Status(DocStatus),
    /// Simulate a failed fetch.
    Error(String),
}

/// A hand-rolled mock implementing [`DocumentApi`] for tests.
///
/// Each document id gets its own response sequence (one per call, the last
/// response repeating if exhausted). Unscripted ids return the fallback.
/// Calls are counted per id via [`call_count()`](MockApi::call_count).
pub struct MockApi {
    scripts: Mutex<HashMap<String, Vec<MockStatus>>>,
    fallback: MockStatus,
    delay: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            fallback: MockStatus::Status(DocStatus::Indexed),
            delay: None,
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Script a response sequence for one document id. The last response
    /// repeats once the sequence is exhausted.
    pub fn script(self, doc_id: &str, mut responses: Vec<MockStatus>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        // Reverse so we can pop() from the front cheaply.
        responses.reverse();
        self.scripts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(doc_id.to_string(), responses);
        self
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `fetch_status()` has been called for `doc_id`.
    pub fn call_count(&self, doc_id: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(doc_id)
            .copied()
            .unwrap_or(0)
    }

    fn next_response(&self, doc_id: &str) -> MockStatus {
        let mut scripts = self.scripts.lock().unwrap_or_else(|e| e.into_inner());
        match scripts.get_mut(doc_id) {
            Some(seq) if seq.len() > 1 => seq.pop().unwrap_or_else(|| self.fallback.clone()),
            Some(seq) => seq.first().cloned().unwrap_or_else(|| self.fallback.clone()),
            None => self.fallback.clone(),
        }
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentApi for MockApi {
    fn fetch_status<'a>(
        &'a self,
        doc_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<DocStatus, CoreError>> + Send + 'a>> {
        *self
            .calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(doc_id.to_string())
            .or_insert(0) += 1;
        let response = self.next_response(doc_id);
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }

            match response {
                MockStatus::Status(status) => Ok(status),
                MockStatus::Error(msg) => Err(CoreError::Api(msg)),
            }
        })
    }
}
