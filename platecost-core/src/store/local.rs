//! Local collection storage: one JSON blob per (collection, scope).

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{Collection, GLOBAL_SCOPE};
use crate::models::Bundle;

/// Durable local cache for entity collections.
///
/// Each (collection, scope) pair maps to exactly one file under the data
/// directory; the mapping is pure and stable across restarts. Global
/// collections are stored under a fixed sentinel scope no matter what scope
/// the caller passes.
#[derive(Clone, Debug)]
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn scope_key<'a>(collection: Collection, scope: &'a str) -> &'a str {
        if collection.is_scoped() {
            scope
        } else {
            GLOBAL_SCOPE
        }
    }

    /// Returns the blob path for a (collection, scope) pair.
    pub fn path(&self, collection: Collection, scope: &str) -> PathBuf {
        let file = format!("{}_{}.json", collection.name(), Self::scope_key(collection, scope));
        self.data_dir.join(file)
    }

    /// Loads a collection.
    ///
    /// A missing blob is an empty collection, not an error.
    pub async fn load<T: DeserializeOwned>(
        &self,
        collection: Collection,
        scope: &str,
    ) -> Result<Vec<T>, StoreError> {
        let path = self.path(collection, scope);

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| StoreError::DecodeError(path, e))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::IoError(path, e)),
        }
    }

    /// Overwrites a collection blob in full.
    ///
    /// The write goes to a temporary file first and is renamed into place,
    /// so a reader sees either the old blob or the whole new one.
    pub async fn save<T: Serialize>(
        &self,
        collection: Collection,
        scope: &str,
        records: &[T],
    ) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| StoreError::IoError(self.data_dir.clone(), e))?;

        let path = self.path(collection, scope);
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|e| StoreError::EncodeError(path.clone(), e))?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::IoError(tmp.clone(), e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::IoError(path.clone(), e))?;

        debug!(
            collection = collection.name(),
            scope = Self::scope_key(collection, scope),
            records = records.len(),
            "saved local blob"
        );
        Ok(())
    }

    /// Loads the three tenant-scoped collections as a bundle.
    pub async fn load_bundle(&self, scope: &str) -> Result<Bundle, StoreError> {
        let (ingredients, recipes, entrees) = futures::try_join!(
            self.load(Collection::Ingredients, scope),
            self.load(Collection::Recipes, scope),
            self.load(Collection::Entrees, scope),
        )?;
        Ok(Bundle {
            ingredients,
            recipes,
            entrees,
        })
    }

    /// Saves the three tenant-scoped collections from a bundle.
    pub async fn save_bundle(&self, scope: &str, bundle: &Bundle) -> Result<(), StoreError> {
        self.save(Collection::Ingredients, scope, &bundle.ingredients)
            .await?;
        self.save(Collection::Recipes, scope, &bundle.recipes).await?;
        self.save(Collection::Entrees, scope, &bundle.entrees).await?;
        Ok(())
    }

    /// Removes cached blobs for every scope except `current_scope`.
    ///
    /// Used when switching restaurants so data from one tenant never leaks
    /// into another's session. Global blobs survive. Returns the number of
    /// blobs removed.
    pub async fn clear_non_current_scopes(
        &self,
        current_scope: &str,
    ) -> Result<usize, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StoreError::IoError(self.data_dir.clone(), e)),
        };

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::IoError(self.data_dir.clone(), e))?
        {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };

            if Self::is_foreign_scope_blob(name, current_scope) {
                tokio::fs::remove_file(entry.path())
                    .await
                    .map_err(|e| StoreError::IoError(entry.path(), e))?;
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(removed, current_scope, "cleared non-current scope blobs");
        }
        Ok(removed)
    }

    /// True when `file_name` is a scoped collection blob belonging to a
    /// scope other than `current_scope`.
    fn is_foreign_scope_blob(file_name: &str, current_scope: &str) -> bool {
        let Some(stem) = file_name.strip_suffix(".json") else {
            return false;
        };

        for collection in [Collection::Ingredients, Collection::Recipes, Collection::Entrees] {
            let prefix = format!("{}_", collection.name());
            if let Some(scope) = stem.strip_prefix(&prefix) {
                return scope != current_scope;
            }
        }
        false
    }
}

/// Errors from local blob storage.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error reading or writing a blob.
    IoError(PathBuf, io::Error),
    /// A blob exists but does not parse as its collection type.
    DecodeError(PathBuf, serde_json::Error),
    /// A collection failed to serialize.
    EncodeError(PathBuf, serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StoreError::DecodeError(path, e) => {
                write!(f, "Failed to decode {}: {}", path.display(), e)
            }
            StoreError::EncodeError(path, e) => {
                write!(f, "Failed to encode {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::IoError(_, e) => Some(e),
            StoreError::DecodeError(_, e) | StoreError::EncodeError(_, e) => Some(e),
        }
    }
}
