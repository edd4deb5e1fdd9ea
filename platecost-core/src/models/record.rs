//! The `Record` trait: the seam shared by every synced entity type.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::Collection;

/// A persistable entity with an opaque string id.
///
/// The id is empty until the record is first persisted, after which it is
/// assigned either locally (UUID v4) or by the remote store. Records are
/// upserted by id from then on.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection this entity type belongs to.
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// True once the record has been persisted somewhere.
    fn has_id(&self) -> bool {
        !self.id().is_empty()
    }

    /// The owning restaurant id, for tenant-scoped types. Global types
    /// return `None`.
    fn restaurant_id(&self) -> Option<&str> {
        None
    }

    /// Rewrites the owning restaurant id. A no-op for global types.
    fn set_restaurant_id(&mut self, _restaurant_id: &str) {}
}
