//! Typed access to one remote collection.

use std::marker::PhantomData;

use serde_json::Value;

use crate::entity::{
    CalendarEvent, Collection, Entity, FamilyMember, Meal, Shop, ShoppingCategory, ShoppingItem,
    Sleepover, Task,
};
use crate::error::{GezinError, GezinResult};
use crate::store::RemoteStore;

/// Maps an entity type onto its collection in a [`RemoteStore`]. Does no
/// more than (de)serialize; store errors pass through untouched.
pub struct Gateway<'a, S: ?Sized, E> {
    store: &'a S,
    _entity: PhantomData<fn() -> E>,
}

pub type FamilyMembersGateway<'a, S> = Gateway<'a, S, FamilyMember>;
pub type CalendarEventsGateway<'a, S> = Gateway<'a, S, CalendarEvent>;
pub type ShoppingCategoriesGateway<'a, S> = Gateway<'a, S, ShoppingCategory>;
pub type ShopsGateway<'a, S> = Gateway<'a, S, Shop>;
pub type ShoppingItemsGateway<'a, S> = Gateway<'a, S, ShoppingItem>;
pub type MealsGateway<'a, S> = Gateway<'a, S, Meal>;
pub type SleepoversGateway<'a, S> = Gateway<'a, S, Sleepover>;
pub type TasksGateway<'a, S> = Gateway<'a, S, Task>;

impl<'a, S, E> Gateway<'a, S, E>
where
    S: RemoteStore + ?Sized,
    E: Entity,
{
    pub fn new(store: &'a S) -> Self {
        Gateway {
            store,
            _entity: PhantomData,
        }
    }

    pub fn collection(&self) -> Collection {
        E::COLLECTION
    }

    pub async fn get_all(&self) -> GezinResult<Vec<E>> {
        self.store
            .get_data(E::COLLECTION)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Store a new record. Returns the backend's copy when it sends one.
    pub async fn create(&self, record: &E) -> GezinResult<Option<E>> {
        let body = encode(record)?;
        let stored = self.store.insert_data(E::COLLECTION, &body).await?;
        stored.map(decode).transpose()
    }

    /// Overwrite a record with its full merged state.
    pub async fn update(&self, record: &E) -> GezinResult<Option<E>> {
        let body = encode(record)?;
        let stored = self
            .store
            .update_data(E::COLLECTION, record.id(), &body)
            .await?;
        stored.map(decode).transpose()
    }

    pub async fn delete(&self, id: &str) -> GezinResult<()> {
        self.store.delete_data(E::COLLECTION, id).await
    }
}

fn encode<E: Entity>(record: &E) -> GezinResult<Value> {
    serde_json::to_value(record).map_err(|e| GezinError::Serialization(e.to_string()))
}

fn decode<E: Entity>(value: Value) -> GezinResult<E> {
    serde_json::from_value(value).map_err(|e| GezinError::Decode {
        collection: E::COLLECTION,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{NewShop, TaskStatus};
    use crate::store::MemoryStore;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn decodes_lowercase_columns() {
        let store = MemoryStore::new().with_records(
            Collection::Tasks,
            vec![json!({
                "id": "t1",
                "title": "Dishes",
                "priority": "high",
                "status": "in_progress",
                "assignedto": "m1",
                "categories": null,
                "createddate": "2025-01-01T08:00:00Z"
            })],
        );

        let tasks = TasksGateway::new(&store).get_all().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, TaskStatus::InProgress);
        assert_eq!(tasks[0].assignees(), ["m1".to_string()]);
        assert!(tasks[0].categories.is_empty());
    }

    #[tokio::test]
    async fn malformed_record_is_a_decode_error() {
        let store = MemoryStore::new()
            .with_records(Collection::Meals, vec![json!({"id": "m1", "dish": 3})]);

        let err = MealsGateway::new(&store).get_all().await.unwrap_err();
        assert!(matches!(
            err,
            GezinError::Decode {
                collection: Collection::Meals,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn create_sends_camel_case_with_nulls() {
        let store = MemoryStore::new();
        let shop = Shop::from_draft(
            "s1".into(),
            NewShop {
                name: "Lidl".into(),
                address: None,
                notes: None,
            },
            Utc::now(),
        );

        let stored = ShopsGateway::new(&store).create(&shop).await.unwrap();
        assert_eq!(stored, Some(shop));

        let raw = store.records(Collection::Shops);
        assert_eq!(raw[0]["name"], "Lidl");
        assert!(raw[0]["address"].is_null());
    }
}
