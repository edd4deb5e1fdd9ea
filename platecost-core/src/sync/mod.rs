//! Offline-first reconciliation between the local cache and the remote
//! document store.
//!
//! The [`SyncCoordinator`] is the only component that decides whether an
//! operation targets the local or the remote store. Sync is always
//! caller-initiated: explicit pull, push, or bundle import. Within one sync
//! pass the five collections are processed in a fixed order (unit
//! conversions, ingredients, recipes, entrees, import maps) with no
//! cross-collection atomicity.

mod coordinator;
mod error;
mod session;

pub use coordinator::{ImportSummary, SyncCoordinator};
pub use error::SyncError;
pub use session::{ConnectivityMode, Session};
