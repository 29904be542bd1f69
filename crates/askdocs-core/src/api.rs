//! Status-fetch seam between the poller and the HTTP client.

pub mod mock;

use std::future::Future;
use std::pin::Pin;

use crate::{CoreError, DocStatus};

/// Anything that can report a document's current ingestion status.
///
/// [`crate::ApiClient`] implements this over HTTP; tests swap in
/// [`mock::MockApi`].
pub trait DocumentApi: Send + Sync {
    /// Fetch the current status of the document with the given id.
    fn fetch_status<'a>(
        &'a self,
        doc_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<DocStatus, CoreError>> + Send + 'a>>;
}
