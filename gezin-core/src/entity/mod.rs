//! Household record types.
//!
//! Every record is a flat struct with a generated string id. Foreign keys
//! (participants, `child_id`, `shop_id`, ...) are plain ids resolved against
//! the in-memory collections; nothing enforces referential integrity.
//!
//! Each entity comes with a *draft* (the user-supplied fields of a new
//! record) and a *patch* (only the fields to change). Optional fields that
//! can be cleared use `Option<Option<T>>` in patches.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{GezinError, GezinResult};

/// Declares a string-valued enum with its wire spelling, `Display` and `FromStr`.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::GezinError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(crate::error::GezinError::Validation(format!(
                        "unknown {} '{}' (expected one of: {})",
                        stringify!($name),
                        other,
                        [$($wire),+].join(", ")
                    ))),
                }
            }
        }
    };
}

pub mod calendar_event;
pub(crate) mod de;
pub mod family_member;
pub mod meal;
pub mod shopping;
pub mod sleepover;
pub mod task;

pub use calendar_event::{CalendarEvent, CalendarEventPatch, EventType, NewCalendarEvent};
pub use family_member::{FamilyMember, FamilyMemberPatch, MemberType, NewFamilyMember};
pub use meal::{Frequency, Meal, MealLocation, MealPatch, MealRecurrence, MealType, NewMeal};
pub use shopping::{
    NewShop, NewShoppingCategory, NewShoppingItem, Shop, ShopPatch, ShoppingCategory,
    ShoppingCategoryPatch, ShoppingItem, ShoppingItemPatch,
};
pub use sleepover::{NewSleepover, Sleepover, SleepoverPatch};
pub use task::{NewTask, Priority, Task, TaskPatch, TaskStatus};

/// A named collection in the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    FamilyMembers,
    CalendarEvents,
    ShoppingCategories,
    Shops,
    ShoppingItems,
    Meals,
    Sleepovers,
    Tasks,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::FamilyMembers,
        Collection::CalendarEvents,
        Collection::ShoppingCategories,
        Collection::Shops,
        Collection::ShoppingItems,
        Collection::Meals,
        Collection::Sleepovers,
        Collection::Tasks,
    ];

    /// Table name in a Supabase/PostgREST backend.
    pub fn table_name(self) -> &'static str {
        match self {
            Collection::FamilyMembers => "family_members",
            Collection::CalendarEvents => "calendar_events",
            Collection::ShoppingCategories => "shopping_categories",
            Collection::Shops => "shops",
            Collection::ShoppingItems => "shopping_items",
            Collection::Meals => "meals",
            Collection::Sleepovers => "sleepovers",
            Collection::Tasks => "tasks",
        }
    }

    /// Path segment under `/api/` in the REST backend.
    pub fn resource_path(self) -> &'static str {
        match self {
            Collection::FamilyMembers => "family-members",
            Collection::CalendarEvents => "calendar-events",
            Collection::ShoppingCategories => "shopping-categories",
            Collection::Shops => "shops",
            Collection::ShoppingItems => "shopping-items",
            Collection::Meals => "meals",
            Collection::Sleepovers => "sleepovers",
            Collection::Tasks => "tasks",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// A record type stored in one remote collection.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;

    /// Fields supplied when creating a record.
    type Draft: Send;

    /// Fields supplied when updating a record; absent fields are left alone.
    type Patch: Send;

    fn id(&self) -> &str;

    /// Build the full record, stamping creation-time fields.
    fn from_draft(id: String, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Merge a patch into the record, applying any entity-specific side
    /// effects (completion stamps).
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    /// Client-side checks run before any network call.
    fn validate(&self) -> GezinResult<()> {
        Ok(())
    }
}

/// Generate a fresh record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn require(field: &str, value: &str) -> GezinResult<()> {
    if value.trim().is_empty() {
        return Err(GezinError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Apply a clearable patch field.
pub(crate) fn patch_opt<T>(target: &mut Option<T>, value: Option<Option<T>>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Apply a plain patch field.
pub(crate) fn patch<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names() {
        assert_eq!(Collection::ShoppingItems.table_name(), "shopping_items");
        assert_eq!(Collection::ShoppingItems.resource_path(), "shopping-items");
        assert_eq!(Collection::Shops.to_string(), "shops");
    }

    #[test]
    fn wire_enum_parse_errors_list_choices() {
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert!(err.to_string().contains("low, medium, high"));
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
    }

    #[test]
    fn require_rejects_blank() {
        assert!(require("name", "  ").is_err());
        assert!(require("name", "Anna").is_ok());
    }
}
