//! In-process store with the REST backend's semantics.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::{Health, RemoteStore};
use crate::entity::Collection;
use crate::error::{GezinError, GezinResult};

/// Keeps collections in memory. Updates merge fields into the stored record
/// and missing ids answer with a 404, like the REST backend does.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<Collection, Vec<Value>>>,
    failing: Mutex<HashSet<Collection>>,
    requests: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection with raw records.
    pub fn with_records(self, collection: Collection, records: Vec<Value>) -> Self {
        self.tables().insert(collection, records);
        self
    }

    /// Make every request against `collection` fail with a 503.
    pub fn fail(&self, collection: Collection) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(collection);
    }

    pub fn recover(&self, collection: Collection) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&collection);
    }

    /// Number of requests served so far, failed ones included.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Raw records currently stored in `collection`.
    pub fn records(&self, collection: Collection) -> Vec<Value> {
        self.tables().get(&collection).cloned().unwrap_or_default()
    }

    fn tables(&self) -> MutexGuard<'_, HashMap<Collection, Vec<Value>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, collection: Collection) -> GezinResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing.lock().unwrap_or_else(PoisonError::into_inner);
        if failing.contains(&collection) {
            return Err(GezinError::Remote {
                status: 503,
                message: format!("{collection} is unavailable"),
            });
        }
        Ok(())
    }
}

fn not_found(collection: Collection, id: &str) -> GezinError {
    GezinError::Remote {
        status: 404,
        message: format!("{collection} record '{id}' not found"),
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn get_data(&self, collection: Collection) -> GezinResult<Vec<Value>> {
        self.begin(collection)?;
        Ok(self.records(collection))
    }

    async fn insert_data(
        &self,
        collection: Collection,
        record: &Value,
    ) -> GezinResult<Option<Value>> {
        self.begin(collection)?;
        self.tables()
            .entry(collection)
            .or_default()
            .push(record.clone());
        Ok(Some(record.clone()))
    }

    async fn update_data(
        &self,
        collection: Collection,
        id: &str,
        fields: &Value,
    ) -> GezinResult<Option<Value>> {
        self.begin(collection)?;
        let mut tables = self.tables();
        let stored = tables
            .get_mut(&collection)
            .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| not_found(collection, id))?;

        match (&mut *stored, fields.as_object()) {
            (Value::Object(map), Some(changes)) => {
                for (key, value) in changes {
                    map.insert(key.clone(), value.clone());
                }
            }
            (slot, _) => *slot = fields.clone(),
        }
        Ok(Some(stored.clone()))
    }

    async fn delete_data(&self, collection: Collection, id: &str) -> GezinResult<()> {
        self.begin(collection)?;
        let mut tables = self.tables();
        let records = tables.entry(collection).or_default();
        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));

        if records.len() == before {
            return Err(not_found(collection, id));
        }
        Ok(())
    }

    async fn health_check(&self) -> Health {
        Health::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn update_merges_fields() {
        let store = MemoryStore::new().with_records(
            Collection::Shops,
            vec![json!({"id": "s1", "name": "Albert Heijn", "notes": null})],
        );

        let updated = store
            .update_data(Collection::Shops, "s1", &json!({"notes": "Open till 22:00"}))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated["name"], "Albert Heijn");
        assert_eq!(updated["notes"], "Open till 22:00");
    }

    #[tokio::test]
    async fn missing_ids_are_404() {
        let store = MemoryStore::new();
        let err = store.delete_data(Collection::Tasks, "nope").await.unwrap_err();
        assert!(matches!(err, GezinError::Remote { status: 404, .. }));
    }

    #[tokio::test]
    async fn failing_collection_counts_requests() {
        let store = MemoryStore::new();
        store.fail(Collection::Meals);

        assert!(store.get_data(Collection::Meals).await.is_err());
        assert!(store.get_data(Collection::Tasks).await.is_ok());
        assert_eq!(store.request_count(), 2);

        store.recover(Collection::Meals);
        assert!(store.get_data(Collection::Meals).await.is_ok());
    }
}
