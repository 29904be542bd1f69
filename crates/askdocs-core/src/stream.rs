//! Incremental consumption of a streamed answer body.

use futures_util::StreamExt;
use thiserror::Error;

use crate::QueryRequest;

/// Fixed answer shown when the request fails before any content arrives.
pub const FALLBACK_ANSWER: &str = "Sorry, I could not find an answer to that question.";

/// How an answer exchange ended early.
#[derive(Error, Debug)]
pub enum StreamFailure {
    /// The request failed before any content arrived.
    #[error("request failed before the stream started: {0}")]
    Request(#[source] reqwest::Error),
    /// The body errored after part of the answer was already published.
    /// The published text stays visible; there is no retry.
    #[error("stream interrupted after {received} bytes: {source}")]
    Interrupted {
        received: usize,
        #[source]
        source: reqwest::Error,
    },
}

/// Stateful UTF-8 decoder for byte chunks that may split multi-byte
/// scalars at arbitrary positions.
#[derive(Debug, Default)]
pub struct Utf8Accumulator {
    pending: Vec<u8>,
}

impl Utf8Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk` together with any bytes held back from earlier calls.
    /// An incomplete trailing sequence is buffered for the next call;
    /// invalid bytes decode to U+FFFD.
    pub fn push(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::new();
        while !self.pending.is_empty() {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    out.push_str(valid);
                    self.pending.clear();
                }
                Err(err) => {
                    let valid_len = err.valid_up_to();
                    out.push_str(
                        std::str::from_utf8(&self.pending[..valid_len]).unwrap_or_default(),
                    );
                    match err.error_len() {
                        Some(bad_len) => {
                            out.push('\u{FFFD}');
                            self.pending.drain(..valid_len + bad_len);
                        }
                        None => {
                            // Incomplete sequence at the end — wait for more bytes.
                            self.pending.drain(..valid_len);
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// The stream ended; any buffered incomplete sequence becomes U+FFFD.
    pub fn finish(&mut self) -> Option<char> {
        if self.pending.is_empty() {
            None
        } else {
            self.pending.clear();
            Some('\u{FFFD}')
        }
    }
}

/// POST the question to `/api/qa` and drain the chunked answer body.
///
/// After every decoded increment the entire accumulated buffer is passed
/// to `publish` — downstream citation extraction needs the full text, not
/// the delta. Returns the final accumulated answer.
///
/// A failure before any text was published maps to
/// [`StreamFailure::Request`] regardless of whether headers arrived, so
/// the caller can substitute [`FALLBACK_ANSWER`] exactly when nothing is
/// on screen yet.
pub async fn stream_answer(
    client: &reqwest::Client,
    base_url: &str,
    request: &QueryRequest,
    mut publish: impl FnMut(&str),
) -> Result<String, StreamFailure> {
    let response = client
        .post(format!("{base_url}/api/qa"))
        .json(request)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(StreamFailure::Request)?;

    let mut body = response.bytes_stream();
    let mut decoder = Utf8Accumulator::new();
    let mut answer = String::new();

    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(bytes) => {
                let decoded = decoder.push(&bytes);
                if decoded.is_empty() {
                    continue;
                }
                answer.push_str(&decoded);
                publish(&answer);
            }
            Err(source) if answer.is_empty() => {
                return Err(StreamFailure::Request(source));
            }
            Err(source) => {
                return Err(StreamFailure::Interrupted {
                    received: answer.len(),
                    source,
                });
            }
        }
    }

    if let Some(replacement) = decoder.finish() {
        answer.push(replacement);
        publish(&answer);
    }

    tracing::debug!(bytes = answer.len(), "answer stream complete");
    Ok(answer)
}
