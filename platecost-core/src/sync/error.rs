//! Sync error types.

use crate::remote::RemoteError;
use crate::store::StoreError;

/// Errors that can occur during sync and mediated CRUD operations.
///
/// None of these are fatal to the process; the worst case is degraded
/// functionality (offline mode, an aborted operation).
#[derive(Debug)]
pub enum SyncError {
    /// Local blob storage error.
    Store(StoreError),
    /// Remote document store error.
    Remote(RemoteError),
    /// A record failed to serialize into a remote document.
    Encode(serde_json::Error),
    /// A remote document failed to deserialize into its record type.
    Decode(serde_json::Error),
}

impl SyncError {
    /// True when the underlying failure is the remote being unreachable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SyncError::Remote(e) if e.is_unavailable())
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Store(e) => write!(f, "Local storage error: {}", e),
            SyncError::Remote(e) => write!(f, "{}", e),
            SyncError::Encode(e) => write!(f, "Failed to encode record: {}", e),
            SyncError::Decode(e) => write!(f, "Failed to decode remote document: {}", e),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Store(e) => Some(e),
            SyncError::Remote(e) => Some(e),
            SyncError::Encode(e) | SyncError::Decode(e) => Some(e),
        }
    }
}

impl From<StoreError> for SyncError {
    fn from(e: StoreError) -> Self {
        SyncError::Store(e)
    }
}

impl From<RemoteError> for SyncError {
    fn from(e: RemoteError) -> Self {
        SyncError::Remote(e)
    }
}
