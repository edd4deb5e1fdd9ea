//! The sync coordinator: connectivity-routed CRUD and reconciliation.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ConnectivityMode, Session, SyncError};
use crate::convert::ConversionTable;
use crate::models::{
    Bundle, Entree, ImportMap, IngredientRecord, Record, Recipe, Restaurant, UnitConversion,
};
use crate::remote::{MergeMode, RemoteStore};
use crate::store::{Collection, LocalStore};

/// Well-known document probed to decide whether the remote is reachable.
/// Any non-unavailable outcome, including a missing document, counts.
const HEALTH_PATH: &str = "meta/health";

/// Per-type counts of records newly added by a bundle import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub ingredients_added: usize,
    pub recipes_added: usize,
    pub entrees_added: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.ingredients_added + self.recipes_added + self.entrees_added
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "added {} ingredients, {} recipes, {} entrees",
            self.ingredients_added, self.recipes_added, self.entrees_added
        )
    }
}

/// Orchestrates the local cache and the remote document store.
///
/// This is the only component that decides whether an operation targets the
/// local or the remote store. While Online, writes go to the remote and the
/// local cache is refreshed write-through; while Offline, writes land in
/// the local cache only (ids assigned locally) until the next push. Reads
/// always come from the local cache.
pub struct SyncCoordinator<R: RemoteStore> {
    local: LocalStore,
    remote: R,
    table: Arc<ConversionTable>,
    session: Session,
}

impl<R: RemoteStore> SyncCoordinator<R> {
    pub fn new(local: LocalStore, remote: R, table: Arc<ConversionTable>, session: Session) -> Self {
        Self {
            local,
            remote,
            table,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> ConnectivityMode {
        self.session.mode()
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn table(&self) -> &ConversionTable {
        &self.table
    }

    /// Shared handle to the conversion table, for wiring a
    /// [`ConversionEngine`](crate::convert::ConversionEngine) to it.
    pub fn table_handle(&self) -> Arc<ConversionTable> {
        Arc::clone(&self.table)
    }

    fn scope(&self) -> String {
        self.session.restaurant_id().to_string()
    }

    /// Remote collection path for an entity type under a tenant scope.
    /// Ingredients live nested under their restaurant; everything else is a
    /// top-level collection.
    fn remote_collection_path(collection: Collection, scope: &str) -> String {
        match collection {
            Collection::UnitConversions => "unitConversions".to_string(),
            Collection::ImportMaps => "importMaps".to_string(),
            Collection::Recipes => "recipes".to_string(),
            Collection::Entrees => "entrees".to_string(),
            Collection::Restaurants => "restaurants".to_string(),
            Collection::Ingredients => format!("restaurants/{}/ingredients", scope),
        }
    }

    fn remote_doc_path(collection: Collection, scope: &str, id: &str) -> String {
        format!("{}/{}", Self::remote_collection_path(collection, scope), id)
    }

    // ========== Startup and connectivity ==========

    /// Probes the remote and establishes the session's connectivity mode.
    ///
    /// On success the session goes Online and the local cache is refreshed
    /// with a pull; on an unavailable remote the session stays Offline and
    /// the conversion table is rebuilt from the local cache instead.
    pub async fn startup(&mut self) -> Result<ConnectivityMode, SyncError> {
        match self.probe().await? {
            ConnectivityMode::Online => self.pull_remote_to_local().await?,
            ConnectivityMode::Offline => self.refresh_table().await?,
        }
        Ok(self.session.mode())
    }

    /// Probes the remote and updates the session's connectivity mode
    /// without touching any data.
    pub async fn probe(&mut self) -> Result<ConnectivityMode, SyncError> {
        match self.remote.get(HEALTH_PATH).await {
            Ok(_) => self.session.mark_online(),
            Err(e) if e.is_unavailable() => self.session.mark_offline(&e.to_string()),
            Err(e) => return Err(e.into()),
        }
        Ok(self.session.mode())
    }

    /// Re-establishes the remote handle after an external re-authentication
    /// and probes it. The only way back from Offline to Online.
    pub async fn reconnect(&mut self, remote: R) -> Result<ConnectivityMode, SyncError> {
        self.remote = remote;
        self.probe().await
    }

    /// Switches the session to another restaurant and drops cached blobs of
    /// every other tenant.
    pub async fn switch_restaurant(&mut self, restaurant_id: &str) -> Result<(), SyncError> {
        self.session.set_restaurant_id(restaurant_id);
        self.local.clear_non_current_scopes(restaurant_id).await?;
        Ok(())
    }

    /// Rebuilds the conversion table wholesale from the local cache.
    pub async fn refresh_table(&self) -> Result<(), SyncError> {
        let conversions: Vec<UnitConversion> = self
            .local
            .load(Collection::UnitConversions, self.session.restaurant_id())
            .await?;
        self.table.load(&conversions);
        Ok(())
    }

    // ========== Directional sync primitives ==========

    /// Replaces the local cache with the authoritative remote state, one
    /// collection at a time in the fixed sync order, then rebuilds the
    /// conversion table.
    ///
    /// This is a full overwrite, not a merge: local edits not yet pushed
    /// are lost. Run [`push_local_to_remote`](Self::push_local_to_remote)
    /// first when offline edits may exist.
    pub async fn pull_remote_to_local(&mut self) -> Result<(), SyncError> {
        let scope = self.scope();
        warn!(scope, "pull: replacing local cache with remote state");

        let conversions = self.pull_collection::<UnitConversion>(&scope).await?;
        self.pull_collection::<IngredientRecord>(&scope).await?;
        self.pull_collection::<Recipe>(&scope).await?;
        self.pull_collection::<Entree>(&scope).await?;
        self.pull_collection::<ImportMap>(&scope).await?;
        // The restaurant registry rides along after the five sync
        // collections so tenant switching has names to offer.
        self.pull_collection::<Restaurant>(&scope).await?;

        self.table.load(&conversions);
        info!(scope, units = conversions.len(), "pull complete");
        Ok(())
    }

    async fn pull_collection<T: Record>(&self, scope: &str) -> Result<Vec<T>, SyncError> {
        let collection = T::COLLECTION;
        let path = Self::remote_collection_path(collection, scope);
        let filter = matches!(collection, Collection::Recipes | Collection::Entrees)
            .then_some(("restaurant_id", scope));

        let docs = self.remote.query(&path, filter).await?;

        let mut records = Vec::with_capacity(docs.len());
        for doc in docs {
            let record: T = serde_json::from_value(doc).map_err(SyncError::Decode)?;
            // No server-side composite index is assumed; filter again here.
            if matches!(collection, Collection::Recipes | Collection::Entrees)
                && record.restaurant_id().is_some_and(|owner| owner != scope)
            {
                continue;
            }
            records.push(record);
        }

        self.local.save(collection, scope, &records).await?;
        debug!(
            collection = collection.name(),
            records = records.len(),
            "pulled collection"
        );
        Ok(records)
    }

    /// Pushes every local record to the remote store, one collection at a
    /// time in the fixed sync order.
    ///
    /// Records without an id are `add`ed and the generated id is written
    /// back to the local blob; records with an id are `set` with merge.
    /// Each record's push is independent and re-entrant, so a failure or
    /// crash mid-push leaves a partial state that the next push resumes.
    pub async fn push_local_to_remote(&mut self) -> Result<(), SyncError> {
        let scope = self.scope();
        let mut pushed = 0;

        pushed += self.push_collection::<UnitConversion>(&scope).await?;
        pushed += self.push_collection::<IngredientRecord>(&scope).await?;
        pushed += self.push_collection::<Recipe>(&scope).await?;
        pushed += self.push_collection::<Entree>(&scope).await?;
        pushed += self.push_collection::<ImportMap>(&scope).await?;

        info!(scope, pushed, "push complete");
        Ok(())
    }

    async fn push_collection<T: Record>(&self, scope: &str) -> Result<usize, SyncError> {
        let collection = T::COLLECTION;
        let mut records: Vec<T> = self.local.load(collection, scope).await?;
        if records.is_empty() {
            return Ok(0);
        }

        let collection_path = Self::remote_collection_path(collection, scope);
        let mut assigned_ids = false;

        for record in &mut records {
            let doc = serde_json::to_value(&*record).map_err(SyncError::Encode)?;
            if record.has_id() {
                let path = format!("{}/{}", collection_path, record.id());
                self.remote.set(&path, &doc, MergeMode::Merge).await?;
            } else {
                let id = self.remote.add(&collection_path, &doc).await?;
                record.set_id(id);
                assigned_ids = true;
            }
        }

        if assigned_ids {
            self.local.save(collection, scope, &records).await?;
        }
        debug!(
            collection = collection.name(),
            records = records.len(),
            "pushed collection"
        );
        Ok(records.len())
    }

    // ========== Bundle import / export ==========

    /// Exports the current tenant's data as a bundle.
    pub async fn export_bundle(&self) -> Result<Bundle, SyncError> {
        Ok(self.local.load_bundle(self.session.restaurant_id()).await?)
    }

    /// Merges an imported bundle into the current tenant's data.
    ///
    /// Per collection, only records whose id is non-empty and not already
    /// present are appended; empty-id records cannot be deduplicated on a
    /// later import, so they are discarded. Imported recipes and entrees
    /// are rewritten to the importing tenant's scope no matter which
    /// restaurant they came from. When Online, each newly added record is
    /// also pushed individually.
    pub async fn import_bundle(&mut self, bundle: Bundle) -> Result<ImportSummary, SyncError> {
        let scope = self.scope();

        let summary = ImportSummary {
            ingredients_added: self.merge_new(bundle.ingredients, &scope, false).await?,
            recipes_added: self.merge_new(bundle.recipes, &scope, true).await?,
            entrees_added: self.merge_new(bundle.entrees, &scope, true).await?,
        };

        info!(scope, %summary, "bundle import complete");
        Ok(summary)
    }

    async fn merge_new<T: Record>(
        &mut self,
        imported: Vec<T>,
        scope: &str,
        rewrite_scope: bool,
    ) -> Result<usize, SyncError> {
        let collection = T::COLLECTION;
        let mut existing: Vec<T> = self.local.load(collection, scope).await?;
        let mut seen: HashSet<String> = existing.iter().map(|r| r.id().to_string()).collect();

        let mut added: Vec<T> = Vec::new();
        for mut record in imported {
            if !record.has_id() {
                debug!(
                    collection = collection.name(),
                    "discarding imported record with no id"
                );
                continue;
            }
            if !seen.insert(record.id().to_string()) {
                continue;
            }
            if rewrite_scope {
                record.set_restaurant_id(scope);
            }
            added.push(record);
        }

        if added.is_empty() {
            return Ok(0);
        }

        existing.extend(added.iter().cloned());
        self.local.save(collection, scope, &existing).await?;

        if self.session.is_online() {
            for record in &added {
                let doc = serde_json::to_value(record).map_err(SyncError::Encode)?;
                let path = Self::remote_doc_path(collection, scope, record.id());
                match self.remote.set(&path, &doc, MergeMode::Merge).await {
                    Ok(()) => {}
                    Err(e) if e.is_unavailable() => {
                        // The local merge is already durable; the remaining
                        // records go up on the next push.
                        self.session.mark_offline(&e.to_string());
                        break;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        Ok(added.len())
    }

    // ========== Mode-routed CRUD facades ==========

    /// Creates or updates a record, routed by connectivity mode.
    ///
    /// Online: the remote store is written first (`add` for new records,
    /// `set`-with-merge otherwise) and the local cache refreshed
    /// write-through. Offline: new records get a locally generated id and
    /// only the local cache changes. An unavailable remote flips the
    /// session Offline and the write still lands locally.
    pub async fn upsert<T: Record>(&mut self, mut record: T) -> Result<T, SyncError> {
        let scope = self.scope();
        if T::COLLECTION.is_scoped() {
            record.set_restaurant_id(&scope);
        }

        if self.session.is_online() {
            match self.remote_upsert(&mut record, &scope).await {
                Ok(()) => {}
                Err(SyncError::Remote(e)) if e.is_unavailable() => {
                    self.session.mark_offline(&e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        if !record.has_id() {
            record.set_id(Uuid::new_v4().to_string());
        }

        let mut records: Vec<T> = self.local.load(T::COLLECTION, &scope).await?;
        match records.iter().position(|r| r.id() == record.id()) {
            Some(i) => records[i] = record.clone(),
            None => records.push(record.clone()),
        }
        self.local.save(T::COLLECTION, &scope, &records).await?;

        if T::COLLECTION == Collection::UnitConversions {
            self.refresh_table().await?;
        }
        Ok(record)
    }

    async fn remote_upsert<T: Record>(&self, record: &mut T, scope: &str) -> Result<(), SyncError> {
        let doc = serde_json::to_value(&*record).map_err(SyncError::Encode)?;
        if record.has_id() {
            let path = Self::remote_doc_path(T::COLLECTION, scope, record.id());
            self.remote.set(&path, &doc, MergeMode::Merge).await?;
        } else {
            let collection_path = Self::remote_collection_path(T::COLLECTION, scope);
            let id = self.remote.add(&collection_path, &doc).await?;
            record.set_id(id);
        }
        Ok(())
    }

    /// Deletes a record by id from whichever store is authoritative for the
    /// current mode; the local cache always reflects the removal.
    pub async fn delete<T: Record>(&mut self, id: &str) -> Result<(), SyncError> {
        let scope = self.scope();

        if self.session.is_online() {
            let path = Self::remote_doc_path(T::COLLECTION, &scope, id);
            match self.remote.delete(&path).await {
                Ok(()) => {}
                Err(e) if e.is_unavailable() => self.session.mark_offline(&e.to_string()),
                Err(e) => return Err(e.into()),
            }
        }

        let mut records: Vec<T> = self.local.load(T::COLLECTION, &scope).await?;
        records.retain(|r| r.id() != id);
        self.local.save(T::COLLECTION, &scope, &records).await?;

        if T::COLLECTION == Collection::UnitConversions {
            self.refresh_table().await?;
        }
        Ok(())
    }

    /// Deletes many records in one pass; the remote removal is batched.
    pub async fn delete_many<T: Record>(&mut self, ids: &[String]) -> Result<(), SyncError> {
        if ids.is_empty() {
            return Ok(());
        }
        let scope = self.scope();

        if self.session.is_online() {
            let paths: Vec<String> = ids
                .iter()
                .map(|id| Self::remote_doc_path(T::COLLECTION, &scope, id))
                .collect();
            match self.remote.delete_batch(&paths).await {
                Ok(()) => {}
                Err(e) if e.is_unavailable() => self.session.mark_offline(&e.to_string()),
                Err(e) => return Err(e.into()),
            }
        }

        let mut records: Vec<T> = self.local.load(T::COLLECTION, &scope).await?;
        records.retain(|r| !ids.iter().any(|id| id == r.id()));
        self.local.save(T::COLLECTION, &scope, &records).await?;

        if T::COLLECTION == Collection::UnitConversions {
            self.refresh_table().await?;
        }
        Ok(())
    }

    /// Lists a collection from the local cache. Reads prefer the cache in
    /// both modes; pull refreshes it when Online.
    pub async fn list<T: Record>(&self) -> Result<Vec<T>, SyncError> {
        Ok(self
            .local
            .load(T::COLLECTION, self.session.restaurant_id())
            .await?)
    }

    /// Fetches a single record by id from the local cache.
    pub async fn get<T: Record>(&self, id: &str) -> Result<Option<T>, SyncError> {
        Ok(self.list::<T>().await?.into_iter().find(|r| r.id() == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeItem;
    use crate::remote::{Document, RemoteError};
    use serde_json::Value;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Merge combines new fields into the existing JSON object.
    fn merge_documents(existing: &mut Value, incoming: &Value) {
        if let (Value::Object(old), Value::Object(new)) = (existing, incoming) {
            for (key, value) in new {
                old.insert(key.clone(), value.clone());
            }
        }
    }

    /// In-memory remote store: collections of id-keyed JSON documents.
    #[derive(Default)]
    struct MemoryRemote {
        collections: Mutex<HashMap<String, BTreeMap<String, Document>>>,
        next_id: AtomicUsize,
        unavailable: AtomicBool,
    }

    impl MemoryRemote {
        fn new() -> Self {
            Self::default()
        }

        fn set_unavailable(&self, value: bool) {
            self.unavailable.store(value, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), RemoteError> {
            if self.unavailable.load(Ordering::SeqCst) {
                Err(RemoteError::Unavailable("simulated outage".into()))
            } else {
                Ok(())
            }
        }

        fn split(path: &str) -> (String, String) {
            let (collection, id) = path.rsplit_once('/').unwrap_or(("", path));
            (collection.to_string(), id.to_string())
        }

        fn doc_count(&self, collection: &str) -> usize {
            self.collections
                .lock()
                .unwrap()
                .get(collection)
                .map_or(0, |c| c.len())
        }

        fn doc(&self, collection: &str, id: &str) -> Option<Document> {
            self.collections
                .lock()
                .unwrap()
                .get(collection)
                .and_then(|c| c.get(id))
                .cloned()
        }

        fn seed(&self, collection: &str, id: &str, mut doc: Document) {
            doc["id"] = Value::String(id.to_string());
            self.collections
                .lock()
                .unwrap()
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), doc);
        }
    }

    impl RemoteStore for MemoryRemote {
        async fn get(&self, path: &str) -> Result<Option<Document>, RemoteError> {
            self.check()?;
            let (collection, id) = Self::split(path);
            Ok(self
                .collections
                .lock()
                .unwrap()
                .get(&collection)
                .and_then(|c| c.get(&id))
                .cloned())
        }

        async fn add(&self, collection: &str, document: &Document) -> Result<String, RemoteError> {
            self.check()?;
            let id = format!("remote-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
            let mut doc = document.clone();
            doc["id"] = Value::String(id.clone());
            self.collections
                .lock()
                .unwrap()
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), doc);
            Ok(id)
        }

        async fn set(
            &self,
            path: &str,
            document: &Document,
            mode: MergeMode,
        ) -> Result<(), RemoteError> {
            self.check()?;
            let (collection, id) = Self::split(path);
            let mut collections = self.collections.lock().unwrap();
            let docs = collections.entry(collection).or_default();

            let mut doc = document.clone();
            doc["id"] = Value::String(id.clone());
            match (mode, docs.get_mut(&id)) {
                (MergeMode::Merge, Some(existing)) => merge_documents(existing, &doc),
                _ => {
                    docs.insert(id, doc);
                }
            }
            Ok(())
        }

        async fn delete(&self, path: &str) -> Result<(), RemoteError> {
            self.check()?;
            let (collection, id) = Self::split(path);
            if let Some(docs) = self.collections.lock().unwrap().get_mut(&collection) {
                docs.remove(&id);
            }
            Ok(())
        }

        async fn delete_batch(&self, paths: &[String]) -> Result<(), RemoteError> {
            self.check()?;
            let mut collections = self.collections.lock().unwrap();
            for path in paths {
                let (collection, id) = Self::split(path);
                if let Some(docs) = collections.get_mut(&collection) {
                    docs.remove(&id);
                }
            }
            Ok(())
        }

        async fn query(
            &self,
            collection: &str,
            filter: Option<(&str, &str)>,
        ) -> Result<Vec<Document>, RemoteError> {
            self.check()?;
            let collections = self.collections.lock().unwrap();
            let docs = collections.get(collection).cloned().unwrap_or_default();
            Ok(docs
                .into_values()
                .filter(|doc| match filter {
                    Some((field, value)) => doc.get(field).and_then(Value::as_str) == Some(value),
                    None => true,
                })
                .collect())
        }
    }

    fn setup() -> (SyncCoordinator<MemoryRemote>, TempDir) {
        let temp = TempDir::new().unwrap();
        let local = LocalStore::new(temp.path().to_path_buf());
        let table = Arc::new(ConversionTable::new());
        let session = Session::new("rest-1");
        let coordinator = SyncCoordinator::new(local, MemoryRemote::new(), table, session);
        (coordinator, temp)
    }

    async fn online(coordinator: &mut SyncCoordinator<MemoryRemote>) {
        let mode = coordinator.startup().await.unwrap();
        assert_eq!(mode, ConnectivityMode::Online);
    }

    #[tokio::test]
    async fn test_startup_online_pulls() {
        let (mut coordinator, _temp) = setup();
        coordinator.remote().seed(
            "unitConversions",
            "u1",
            serde_json::to_value(UnitConversion::new("lb", "weight", 1.0)).unwrap(),
        );

        let mode = coordinator.startup().await.unwrap();
        assert_eq!(mode, ConnectivityMode::Online);

        let conversions: Vec<UnitConversion> = coordinator.list().await.unwrap();
        assert_eq!(conversions.len(), 1);
        assert!(coordinator.table().lookup("lb").is_some());
    }

    #[tokio::test]
    async fn test_startup_offline_falls_back_to_cache() {
        let (mut coordinator, _temp) = setup();

        // Cache a conversion locally, then lose the remote.
        coordinator
            .local()
            .save(
                Collection::UnitConversions,
                "rest-1",
                &[UnitConversion::new("oz", "weight", 0.0625)],
            )
            .await
            .unwrap();
        coordinator.remote().set_unavailable(true);

        let mode = coordinator.startup().await.unwrap();
        assert_eq!(mode, ConnectivityMode::Offline);
        assert!(coordinator.table().lookup("oz").is_some());
    }

    #[tokio::test]
    async fn test_push_assigns_ids_and_writes_back() {
        let (mut coordinator, _temp) = setup();
        online(&mut coordinator).await;

        coordinator
            .local()
            .save(
                Collection::Ingredients,
                "rest-1",
                &[IngredientRecord::new("Flour", "rest-1").with_case(20.0, 10.0, "lb")],
            )
            .await
            .unwrap();

        coordinator.push_local_to_remote().await.unwrap();

        let locals: Vec<IngredientRecord> = coordinator.list().await.unwrap();
        assert_eq!(locals.len(), 1);
        assert!(locals[0].has_id());
        assert_eq!(
            coordinator.remote().doc_count("restaurants/rest-1/ingredients"),
            1
        );
    }

    #[tokio::test]
    async fn test_push_then_pull_round_trips_content() {
        let (mut coordinator, _temp) = setup();
        online(&mut coordinator).await;

        let recipe = Recipe::new("Marinara", "rest-1")
            .with_yield(4.0, "qt")
            .with_items(vec![RecipeItem::new("ing-1", 16.0, "oz")])
            .with_allergens(vec!["garlic".into()])
            .with_directions("1. Crush tomatoes\n2. Simmer");
        coordinator
            .local()
            .save(Collection::Recipes, "rest-1", &[recipe.clone()])
            .await
            .unwrap();

        coordinator.push_local_to_remote().await.unwrap();
        coordinator.pull_remote_to_local().await.unwrap();

        let pulled: Vec<Recipe> = coordinator.list().await.unwrap();
        assert_eq!(pulled.len(), 1);
        assert!(pulled[0].has_id());

        // Only the id changed; every other field survived the round trip.
        let mut expected = recipe;
        expected.id = pulled[0].id.clone();
        assert_eq!(pulled[0], expected);
    }

    #[tokio::test]
    async fn test_push_is_idempotent() {
        let (mut coordinator, _temp) = setup();
        online(&mut coordinator).await;

        coordinator
            .local()
            .save(
                Collection::Recipes,
                "rest-1",
                &[Recipe::new("Marinara", "rest-1")],
            )
            .await
            .unwrap();

        coordinator.push_local_to_remote().await.unwrap();
        coordinator.push_local_to_remote().await.unwrap();

        assert_eq!(coordinator.remote().doc_count("recipes"), 1);
    }

    #[tokio::test]
    async fn test_pull_overwrites_local_only_edits() {
        let (mut coordinator, _temp) = setup();
        online(&mut coordinator).await;

        coordinator.remote().seed(
            "recipes",
            "r1",
            serde_json::to_value(Recipe::new("Remote Recipe", "rest-1")).unwrap(),
        );

        // A local-only recipe that was never pushed.
        coordinator
            .local()
            .save(
                Collection::Recipes,
                "rest-1",
                &[Recipe::new("Unsynced Local", "rest-1")],
            )
            .await
            .unwrap();

        coordinator.pull_remote_to_local().await.unwrap();

        let recipes: Vec<Recipe> = coordinator.list().await.unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "Remote Recipe");
    }

    #[tokio::test]
    async fn test_pull_refreshes_restaurant_registry() {
        let (mut coordinator, _temp) = setup();
        coordinator.remote().seed(
            "restaurants",
            "rest-1",
            serde_json::to_value(Restaurant::new("Trattoria")).unwrap(),
        );

        online(&mut coordinator).await;

        let restaurants: Vec<Restaurant> = coordinator.list().await.unwrap();
        assert_eq!(restaurants.len(), 1);
        assert_eq!(restaurants[0].name, "Trattoria");
    }

    #[tokio::test]
    async fn test_pull_filters_foreign_tenants() {
        let (mut coordinator, _temp) = setup();
        online(&mut coordinator).await;

        coordinator.remote().seed(
            "entrees",
            "e1",
            serde_json::to_value(Entree::new("Ours", "rest-1")).unwrap(),
        );
        coordinator.remote().seed(
            "entrees",
            "e2",
            serde_json::to_value(Entree::new("Theirs", "rest-2")).unwrap(),
        );

        coordinator.pull_remote_to_local().await.unwrap();

        let entrees: Vec<Entree> = coordinator.list().await.unwrap();
        assert_eq!(entrees.len(), 1);
        assert_eq!(entrees[0].name, "Ours");
    }

    #[tokio::test]
    async fn test_import_bundle_dedups_by_id() {
        let (mut coordinator, _temp) = setup();

        let existing: Vec<IngredientRecord> = ["1", "2"]
            .iter()
            .map(|id| {
                let mut record = IngredientRecord::new(format!("Existing {}", id), "rest-1");
                record.id = id.to_string();
                record
            })
            .collect();
        coordinator
            .local()
            .save(Collection::Ingredients, "rest-1", &existing)
            .await
            .unwrap();

        let imported: Vec<IngredientRecord> = ["2", "3", "", "4"]
            .iter()
            .map(|id| {
                let mut record = IngredientRecord::new(format!("Imported {}", id), "rest-9");
                record.id = id.to_string();
                record
            })
            .collect();
        let bundle = Bundle {
            ingredients: imported,
            ..Default::default()
        };

        let summary = coordinator.import_bundle(bundle).await.unwrap();
        assert_eq!(summary.ingredients_added, 2);
        assert_eq!(summary.total(), 2);

        let merged: Vec<IngredientRecord> = coordinator.list().await.unwrap();
        let ids: Vec<&str> = merged.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[tokio::test]
    async fn test_import_rewrites_recipe_and_entree_scope() {
        let (mut coordinator, _temp) = setup();

        let mut recipe = Recipe::new("Borrowed", "rest-other");
        recipe.id = "r1".into();
        let mut entree = Entree::new("Borrowed Plate", "rest-other");
        entree.id = "e1".into();
        let bundle = Bundle {
            recipes: vec![recipe],
            entrees: vec![entree],
            ..Default::default()
        };

        coordinator.import_bundle(bundle).await.unwrap();

        let recipes: Vec<Recipe> = coordinator.list().await.unwrap();
        let entrees: Vec<Entree> = coordinator.list().await.unwrap();
        assert_eq!(recipes[0].restaurant_id, "rest-1");
        assert_eq!(entrees[0].restaurant_id, "rest-1");
    }

    #[tokio::test]
    async fn test_import_pushes_new_records_when_online() {
        let (mut coordinator, _temp) = setup();
        online(&mut coordinator).await;

        let mut recipe = Recipe::new("Imported", "rest-1");
        recipe.id = "r-import".into();
        let bundle = Bundle {
            recipes: vec![recipe],
            ..Default::default()
        };

        coordinator.import_bundle(bundle).await.unwrap();

        assert!(coordinator.remote().doc("recipes", "r-import").is_some());
    }

    #[tokio::test]
    async fn test_import_offline_stays_local() {
        let (mut coordinator, _temp) = setup();

        let mut recipe = Recipe::new("Imported", "rest-1");
        recipe.id = "r-import".into();
        let bundle = Bundle {
            recipes: vec![recipe],
            ..Default::default()
        };

        coordinator.import_bundle(bundle).await.unwrap();

        assert_eq!(coordinator.remote().doc_count("recipes"), 0);
        let recipes: Vec<Recipe> = coordinator.list().await.unwrap();
        assert_eq!(recipes.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_offline_assigns_local_id() {
        let (mut coordinator, _temp) = setup();

        let saved = coordinator
            .upsert(IngredientRecord::new("Flour", "rest-1"))
            .await
            .unwrap();
        assert!(saved.has_id());
        assert_eq!(coordinator.remote().doc_count("restaurants/rest-1/ingredients"), 0);

        let locals: Vec<IngredientRecord> = coordinator.list().await.unwrap();
        assert_eq!(locals.len(), 1);
        assert_eq!(locals[0].id, saved.id);
    }

    #[tokio::test]
    async fn test_upsert_online_uses_remote_id() {
        let (mut coordinator, _temp) = setup();
        online(&mut coordinator).await;

        let saved = coordinator
            .upsert(Recipe::new("Marinara", "rest-1"))
            .await
            .unwrap();
        assert!(saved.id.starts_with("remote-"));
        assert!(coordinator.remote().doc("recipes", &saved.id).is_some());

        // Write-through: the local cache already has it.
        let locals: Vec<Recipe> = coordinator.list().await.unwrap();
        assert_eq!(locals.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_by_id() {
        let (mut coordinator, _temp) = setup();

        let saved = coordinator
            .upsert(Recipe::new("Original", "rest-1"))
            .await
            .unwrap();
        let mut updated = saved.clone();
        updated.name = "Updated".into();
        coordinator.upsert(updated).await.unwrap();

        let locals: Vec<Recipe> = coordinator.list().await.unwrap();
        assert_eq!(locals.len(), 1);
        assert_eq!(locals[0].name, "Updated");
    }

    #[tokio::test]
    async fn test_upsert_stamps_current_tenant() {
        let (mut coordinator, _temp) = setup();

        let saved = coordinator
            .upsert(Recipe::new("Stray", "rest-other"))
            .await
            .unwrap();
        assert_eq!(saved.restaurant_id, "rest-1");
    }

    #[tokio::test]
    async fn test_remote_outage_flips_offline_and_keeps_write() {
        let (mut coordinator, _temp) = setup();
        online(&mut coordinator).await;

        coordinator.remote().set_unavailable(true);
        let saved = coordinator
            .upsert(Recipe::new("During Outage", "rest-1"))
            .await
            .unwrap();

        assert_eq!(coordinator.mode(), ConnectivityMode::Offline);
        assert!(saved.has_id());
        let locals: Vec<Recipe> = coordinator.list().await.unwrap();
        assert_eq!(locals.len(), 1);
    }

    #[tokio::test]
    async fn test_probe_tracks_remote_availability() {
        let (mut coordinator, _temp) = setup();

        assert_eq!(coordinator.probe().await.unwrap(), ConnectivityMode::Online);

        coordinator.remote().set_unavailable(true);
        assert_eq!(coordinator.probe().await.unwrap(), ConnectivityMode::Offline);

        // Probe never writes: the local cache stays empty either way.
        let recipes: Vec<Recipe> = coordinator.list().await.unwrap();
        assert!(recipes.is_empty());
    }

    #[tokio::test]
    async fn test_reconnect_restores_online() {
        let (mut coordinator, _temp) = setup();
        online(&mut coordinator).await;

        coordinator.remote().set_unavailable(true);
        coordinator
            .upsert(Recipe::new("Offline Edit", "rest-1"))
            .await
            .unwrap();
        assert_eq!(coordinator.mode(), ConnectivityMode::Offline);

        let mode = coordinator.reconnect(MemoryRemote::new()).await.unwrap();
        assert_eq!(mode, ConnectivityMode::Online);
    }

    #[tokio::test]
    async fn test_delete_removes_local_and_remote() {
        let (mut coordinator, _temp) = setup();
        online(&mut coordinator).await;

        let saved = coordinator
            .upsert(Recipe::new("Doomed", "rest-1"))
            .await
            .unwrap();
        coordinator.delete::<Recipe>(&saved.id).await.unwrap();

        assert_eq!(coordinator.remote().doc_count("recipes"), 0);
        let locals: Vec<Recipe> = coordinator.list().await.unwrap();
        assert!(locals.is_empty());
    }

    #[tokio::test]
    async fn test_delete_many_uses_batch() {
        let (mut coordinator, _temp) = setup();
        online(&mut coordinator).await;

        let a = coordinator.upsert(Recipe::new("A", "rest-1")).await.unwrap();
        let b = coordinator.upsert(Recipe::new("B", "rest-1")).await.unwrap();
        let c = coordinator.upsert(Recipe::new("C", "rest-1")).await.unwrap();

        coordinator
            .delete_many::<Recipe>(&[a.id.clone(), c.id.clone()])
            .await
            .unwrap();

        assert_eq!(coordinator.remote().doc_count("recipes"), 1);
        let locals: Vec<Recipe> = coordinator.list().await.unwrap();
        assert_eq!(locals.len(), 1);
        assert_eq!(locals[0].id, b.id);
    }

    #[tokio::test]
    async fn test_conversion_upsert_rebuilds_table() {
        let (mut coordinator, _temp) = setup();

        coordinator
            .upsert(UnitConversion::new("lb", "weight", 1.0))
            .await
            .unwrap();
        assert!(coordinator.table().lookup("lb").is_some());

        let conversions: Vec<UnitConversion> = coordinator.list().await.unwrap();
        coordinator
            .delete::<UnitConversion>(conversions[0].id())
            .await
            .unwrap();
        assert!(coordinator.table().lookup("lb").is_none());
    }

    #[tokio::test]
    async fn test_switch_restaurant_clears_foreign_caches() {
        let (mut coordinator, _temp) = setup();

        coordinator
            .upsert(Recipe::new("Mine", "rest-1"))
            .await
            .unwrap();
        coordinator.switch_restaurant("rest-2").await.unwrap();

        assert_eq!(coordinator.session().restaurant_id(), "rest-2");
        let recipes: Vec<Recipe> = coordinator.list().await.unwrap();
        assert!(recipes.is_empty());
    }

    #[tokio::test]
    async fn test_export_bundle() {
        let (mut coordinator, _temp) = setup();

        coordinator
            .upsert(IngredientRecord::new("Flour", "rest-1"))
            .await
            .unwrap();
        coordinator
            .upsert(Recipe::new("Marinara", "rest-1"))
            .await
            .unwrap();

        let bundle = coordinator.export_bundle().await.unwrap();
        assert_eq!(bundle.ingredients.len(), 1);
        assert_eq!(bundle.recipes.len(), 1);
        assert!(bundle.entrees.is_empty());
        assert_eq!(bundle.len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (mut coordinator, _temp) = setup();

        let saved = coordinator
            .upsert(Recipe::new("Findable", "rest-1"))
            .await
            .unwrap();

        let found: Option<Recipe> = coordinator.get(&saved.id).await.unwrap();
        assert_eq!(found.unwrap().name, "Findable");
        let missing: Option<Recipe> = coordinator.get("nope").await.unwrap();
        assert!(missing.is_none());
    }
}
