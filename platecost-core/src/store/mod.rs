//! Durable local persistence: one serialized blob per (collection, scope).

mod collection;
mod local;

pub use collection::{Collection, GLOBAL_SCOPE};
pub use local::{LocalStore, StoreError};
