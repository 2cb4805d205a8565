//! In-memory application state backed by a remote store.
//!
//! [`AppData`] owns every collection. Mutators call the remote store first and
//! only touch local state once the call succeeded, so memory never holds a
//! record the backend rejected.

use chrono::Utc;

use crate::config::LoadPolicy;
use crate::entity::{
    CalendarEvent, Collection, Entity, FamilyMember, Meal, MealRecurrence, NewMeal, Shop,
    ShoppingCategory, ShoppingItem, ShoppingItemPatch, Sleepover, Task, TaskPatch, TaskStatus,
    new_id,
};
use crate::error::{GezinError, GezinResult};
use crate::gateway::Gateway;
use crate::store::RemoteStore;
use crate::views;

/// Every collection, as last loaded or mutated.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub family_members: Vec<FamilyMember>,
    pub calendar_events: Vec<CalendarEvent>,
    pub shopping_categories: Vec<ShoppingCategory>,
    pub shops: Vec<Shop>,
    pub shopping_items: Vec<ShoppingItem>,
    pub meals: Vec<Meal>,
    pub sleepovers: Vec<Sleepover>,
    pub tasks: Vec<Task>,
}

/// An entity with a slot in [`Collections`].
pub trait Stored: Entity {
    fn all(data: &Collections) -> &Vec<Self>;
    fn all_mut(data: &mut Collections) -> &mut Vec<Self>;
}

macro_rules! stored {
    ($($entity:ty => $field:ident),+ $(,)?) => {
        $(
            impl Stored for $entity {
                fn all(data: &Collections) -> &Vec<Self> {
                    &data.$field
                }

                fn all_mut(data: &mut Collections) -> &mut Vec<Self> {
                    &mut data.$field
                }
            }
        )+
    };
}

stored! {
    FamilyMember => family_members,
    CalendarEvent => calendar_events,
    ShoppingCategory => shopping_categories,
    Shop => shops,
    ShoppingItem => shopping_items,
    Meal => meals,
    Sleepover => sleepovers,
    Task => tasks,
}

/// What a `load_all` call fetched.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<Collection>,
    pub failed: Vec<(Collection, GezinError)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn track<E: Entity>(&mut self, result: GezinResult<Vec<E>>) -> Option<Vec<E>> {
        match result {
            Ok(records) => {
                tracing::debug!(collection = %E::COLLECTION, count = records.len(), "loaded");
                self.loaded.push(E::COLLECTION);
                Some(records)
            }
            Err(e) => {
                tracing::error!(collection = %E::COLLECTION, error = %e, "failed to load");
                self.failed.push((E::COLLECTION, e));
                None
            }
        }
    }
}

fn commit<E: Stored>(data: &mut Collections, records: Option<Vec<E>>) {
    if let Some(records) = records {
        *E::all_mut(data) = records;
    }
}

pub struct AppData<S> {
    store: S,
    data: Collections,
    policy: LoadPolicy,
    loading: bool,
}

impl<S: RemoteStore> AppData<S> {
    pub fn new(store: S) -> Self {
        AppData {
            store,
            data: Collections::default(),
            policy: LoadPolicy::default(),
            loading: true,
        }
    }

    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn data(&self) -> &Collections {
        &self.data
    }

    /// True until the first `load_all` settles, whatever its outcome.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Fetch all collections concurrently.
    ///
    /// Under [`LoadPolicy::Atomic`] a single failure leaves memory untouched
    /// and returns [`GezinError::Load`] for the first failed collection.
    /// Under [`LoadPolicy::BestEffort`] whatever loaded is committed and the
    /// failures come back in the report.
    pub async fn load_all(&mut self) -> GezinResult<LoadReport> {
        tracing::info!(policy = ?self.policy, "loading all collections");

        let store = &self.store;
        let members = Gateway::<S, FamilyMember>::new(store);
        let events = Gateway::<S, CalendarEvent>::new(store);
        let categories = Gateway::<S, ShoppingCategory>::new(store);
        let shops = Gateway::<S, Shop>::new(store);
        let items = Gateway::<S, ShoppingItem>::new(store);
        let meals = Gateway::<S, Meal>::new(store);
        let sleepovers = Gateway::<S, Sleepover>::new(store);
        let tasks = Gateway::<S, Task>::new(store);
        let (members, events, categories, shops, items, meals, sleepovers, tasks) = tokio::join!(
            members.get_all(),
            events.get_all(),
            categories.get_all(),
            shops.get_all(),
            items.get_all(),
            meals.get_all(),
            sleepovers.get_all(),
            tasks.get_all(),
        );

        let mut report = LoadReport::default();
        let members = report.track(members);
        let events = report.track(events);
        let categories = report.track(categories);
        let shops = report.track(shops);
        let items = report.track(items);
        let meals = report.track(meals);
        let sleepovers = report.track(sleepovers);
        let tasks = report.track(tasks);

        self.loading = false;

        if self.policy == LoadPolicy::Atomic && !report.is_complete() {
            let (collection, error) = report.failed.swap_remove(0);
            return Err(GezinError::Load(collection, Box::new(error)));
        }

        let data = &mut self.data;
        commit(data, members);
        commit(data, events);
        commit(data, categories);
        commit(data, shops);
        commit(data, items);
        commit(data, meals);
        commit(data, sleepovers);
        commit(data, tasks);

        Ok(report)
    }

    pub fn records<E: Stored>(&self) -> &[E] {
        E::all(&self.data)
    }

    pub fn find<E: Stored>(&self, id: &str) -> Option<&E> {
        self.records::<E>().iter().find(|r| r.id() == id)
    }

    /// Create a record from a draft. The backend's copy wins over the local
    /// one when it sends one back.
    pub async fn add<E: Stored>(&mut self, draft: E::Draft) -> GezinResult<E> {
        let record = E::from_draft(new_id(), draft, Utc::now());
        record.validate()?;

        let stored = Gateway::<S, E>::new(&self.store)
            .create(&record)
            .await
            .inspect_err(|e| {
                tracing::error!(collection = %E::COLLECTION, error = %e, "failed to add record")
            })?;

        let record = stored.unwrap_or(record);
        E::all_mut(&mut self.data).push(record.clone());
        tracing::info!(collection = %E::COLLECTION, id = record.id(), "added");
        Ok(record)
    }

    /// Merge a patch into the record with `id` and store the result.
    ///
    /// Returns `Ok(None)` without touching the network when no such record
    /// is loaded.
    pub async fn update<E: Stored>(&mut self, id: &str, patch: E::Patch) -> GezinResult<Option<E>> {
        let Some(current) = self.find::<E>(id) else {
            tracing::debug!(collection = %E::COLLECTION, id, "update skipped, no such record");
            return Ok(None);
        };

        let mut merged = current.clone();
        merged.apply_patch(patch, Utc::now());
        merged.validate()?;

        let stored = Gateway::<S, E>::new(&self.store)
            .update(&merged)
            .await
            .inspect_err(|e| {
                tracing::error!(collection = %E::COLLECTION, id, error = %e, "failed to update record")
            })?;

        let record = stored.unwrap_or(merged);
        if let Some(slot) = E::all_mut(&mut self.data).iter_mut().find(|r| r.id() == id) {
            *slot = record.clone();
        }
        Ok(Some(record))
    }

    pub async fn delete<E: Stored>(&mut self, id: &str) -> GezinResult<()> {
        Gateway::<S, E>::new(&self.store)
            .delete(id)
            .await
            .inspect_err(|e| {
                tracing::error!(collection = %E::COLLECTION, id, error = %e, "failed to delete record")
            })?;

        E::all_mut(&mut self.data).retain(|r| r.id() != id);
        tracing::info!(collection = %E::COLLECTION, id, "deleted");
        Ok(())
    }

    /// Create one meal per occurrence of `recurrence`, starting at the
    /// draft's date. The created meals carry no recurrence themselves.
    ///
    /// Meals are created one at a time; on failure the ones already stored
    /// are kept and the error is returned.
    pub async fn add_recurring_meal(
        &mut self,
        draft: NewMeal,
        recurrence: MealRecurrence,
    ) -> GezinResult<Vec<Meal>> {
        let dates = recurrence.dates_from(draft.date)?;
        Meal::from_draft(String::new(), draft.clone(), Utc::now()).validate()?;

        let mut created = Vec::with_capacity(dates.len());
        for date in dates {
            let occurrence = NewMeal {
                date,
                recurring: None,
                ..draft.clone()
            };
            created.push(self.add::<Meal>(occurrence).await?);
        }

        tracing::info!(count = created.len(), frequency = %recurrence.frequency, "added recurring meal");
        Ok(created)
    }

    /// Swap the manual position of two tasks and persist the new order.
    ///
    /// The whole manual order is renumbered from zero so tasks that never
    /// had an explicit `order` end up where they are shown. Only tasks whose
    /// `order` changes are written. Returns false when either task is not
    /// loaded.
    pub async fn swap_task_order(&mut self, a: &str, b: &str) -> GezinResult<bool> {
        let mut ordered: Vec<(String, Option<i64>)> =
            views::tasks::manual_order(self.records::<Task>())
                .into_iter()
                .map(|t| (t.id.clone(), t.order))
                .collect();
        let position = |id: &str| ordered.iter().position(|(task, _)| task == id);
        let (Some(pos_a), Some(pos_b)) = (position(a), position(b)) else {
            return Ok(false);
        };
        ordered.swap(pos_a, pos_b);

        for (index, (id, order)) in ordered.iter().enumerate() {
            let index = index as i64;
            if *order != Some(index) {
                let patch = TaskPatch {
                    order: Some(Some(index)),
                    ..Default::default()
                };
                self.update::<Task>(id, patch).await?;
            }
        }
        Ok(true)
    }

    pub async fn set_task_status(&mut self, id: &str, status: TaskStatus) -> GezinResult<Option<Task>> {
        let patch = TaskPatch {
            status: Some(status),
            ..Default::default()
        };
        self.update::<Task>(id, patch).await
    }

    pub async fn set_item_completed(
        &mut self,
        id: &str,
        completed: bool,
    ) -> GezinResult<Option<ShoppingItem>> {
        let patch = ShoppingItemPatch {
            is_completed: Some(completed),
            ..Default::default()
        };
        self.update::<ShoppingItem>(id, patch).await
    }
}
