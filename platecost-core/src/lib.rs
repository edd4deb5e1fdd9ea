//! Platecost Core Library
//!
//! Unit-conversion cost math and offline-first sync for restaurant
//! food costing.

pub mod convert;
pub mod models;
pub mod remote;
pub mod store;
pub mod sync;

pub use convert::{ConversionEngine, ConversionTable, ConvertError};
pub use models::{
    Bundle, Entree, ImportMap, IngredientRecord, Record, Recipe, RecipeItem, Restaurant,
    UnitConversion,
};
pub use remote::{Document, HttpRemote, MergeMode, RemoteError, RemoteStore};
pub use store::{Collection, LocalStore, StoreError, GLOBAL_SCOPE};
pub use sync::{ConnectivityMode, ImportSummary, Session, SyncCoordinator, SyncError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
