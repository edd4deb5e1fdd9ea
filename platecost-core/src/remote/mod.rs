//! Remote document-store abstraction.
//!
//! The system of record when online is a remote document database exposing
//! collection/document CRUD. [`RemoteStore`] is the seam the sync layer
//! works against; [`HttpRemote`] is the production client, and tests
//! substitute an in-memory fake.

mod http;

use serde_json::Value;
use thiserror::Error;

pub use http::HttpRemote;

/// A remote document: a JSON object. The store injects the document's id
/// under the `"id"` key on every read.
pub type Document = Value;

/// Write policy for [`RemoteStore::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Replace the document wholesale.
    Replace,
    /// Combine new field values with the existing document.
    Merge,
}

/// Errors from the remote store.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The remote cannot be reached or refuses authentication. Callers use
    /// this to fall back to offline mode; it is never silently swallowed.
    #[error("Remote store unavailable: {0}")]
    Unavailable(String),

    /// The remote answered with an unexpected status.
    #[error("Remote store returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// A response body failed to decode.
    #[error("Failed to decode remote response: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, RemoteError::Unavailable(_))
    }
}

/// Collection-addressed CRUD over a remote document database.
///
/// Paths are `collection/documentId`, with one nesting level for
/// tenant-scoped collections (`restaurants/{id}/ingredients/{docId}`).
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Fetches a single document; `None` when it does not exist.
    async fn get(&self, path: &str) -> Result<Option<Document>, RemoteError>;

    /// Creates a document in a collection, returning the generated id.
    async fn add(&self, collection: &str, document: &Document) -> Result<String, RemoteError>;

    /// Writes a document at a known path.
    async fn set(
        &self,
        path: &str,
        document: &Document,
        mode: MergeMode,
    ) -> Result<(), RemoteError>;

    /// Deletes a single document.
    async fn delete(&self, path: &str) -> Result<(), RemoteError>;

    /// Deletes many documents in one batched call.
    async fn delete_batch(&self, paths: &[String]) -> Result<(), RemoteError>;

    /// Lists a collection, optionally filtered by field equality.
    async fn query(
        &self,
        collection: &str,
        filter: Option<(&str, &str)>,
    ) -> Result<Vec<Document>, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unavailable() {
        assert!(RemoteError::Unavailable("connection refused".into()).is_unavailable());
        assert!(!RemoteError::Status {
            status: 400,
            message: "bad request".into()
        }
        .is_unavailable());
    }
}
