//! Shopping list records: categories, shops and items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::family_member::is_hex_color;
use super::{Collection, Entity, de, patch, patch_opt, require};
use crate::error::{GezinError, GezinResult};

pub const DEFAULT_CATEGORY_COLOR: &str = "#718096";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingCategory {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct NewShoppingCategory {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Default)]
pub struct ShoppingCategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl Entity for ShoppingCategory {
    const COLLECTION: Collection = Collection::ShoppingCategories;
    type Draft = NewShoppingCategory;
    type Patch = ShoppingCategoryPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewShoppingCategory, _now: DateTime<Utc>) -> Self {
        ShoppingCategory {
            id,
            name: draft.name.trim().to_string(),
            color: draft.color,
        }
    }

    fn apply_patch(&mut self, p: ShoppingCategoryPatch, _now: DateTime<Utc>) {
        patch(&mut self.name, p.name);
        patch(&mut self.color, p.color);
    }

    fn validate(&self) -> GezinResult<()> {
        require("name", &self.name)?;
        if !is_hex_color(&self.color) {
            return Err(GezinError::Validation(format!(
                "color '{}' is not a #rrggbb value",
                self.color
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewShop {
    pub name: String,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ShopPatch {
    pub name: Option<String>,
    pub address: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl Entity for Shop {
    const COLLECTION: Collection = Collection::Shops;
    type Draft = NewShop;
    type Patch = ShopPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewShop, _now: DateTime<Utc>) -> Self {
        Shop {
            id,
            name: draft.name.trim().to_string(),
            address: draft.address,
            notes: draft.notes,
        }
    }

    fn apply_patch(&mut self, p: ShopPatch, _now: DateTime<Utc>) {
        patch(&mut self.name, p.name);
        patch_opt(&mut self.address, p.address);
        patch_opt(&mut self.notes, p.notes);
    }

    fn validate(&self) -> GezinResult<()> {
        require("name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    /// Category name.
    pub category: String,
    #[serde(default, alias = "shopid", deserialize_with = "de::optional_text")]
    pub shop_id: Option<String>,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub notes: Option<String>,
    #[serde(default, alias = "instock")]
    pub in_stock: Option<bool>,
    #[serde(default, alias = "iscompleted")]
    pub is_completed: bool,
    #[serde(alias = "addeddate")]
    pub added_date: DateTime<Utc>,
    #[serde(default, alias = "completeddate")]
    pub completed_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewShoppingItem {
    pub name: String,
    pub category: String,
    pub shop_id: Option<String>,
    pub notes: Option<String>,
    pub in_stock: Option<bool>,
    pub is_completed: bool,
}

impl NewShoppingItem {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        NewShoppingItem {
            name: name.into(),
            category: category.into(),
            shop_id: None,
            notes: None,
            in_stock: None,
            is_completed: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShoppingItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub shop_id: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub in_stock: Option<Option<bool>>,
    pub is_completed: Option<bool>,
}

impl Entity for ShoppingItem {
    const COLLECTION: Collection = Collection::ShoppingItems;
    type Draft = NewShoppingItem;
    type Patch = ShoppingItemPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewShoppingItem, now: DateTime<Utc>) -> Self {
        ShoppingItem {
            id,
            name: draft.name.trim().to_string(),
            category: draft.category,
            shop_id: draft.shop_id,
            notes: draft.notes,
            in_stock: draft.in_stock,
            is_completed: draft.is_completed,
            added_date: now,
            completed_date: draft.is_completed.then_some(now),
        }
    }

    fn apply_patch(&mut self, p: ShoppingItemPatch, now: DateTime<Utc>) {
        patch(&mut self.name, p.name);
        patch(&mut self.category, p.category);
        patch_opt(&mut self.shop_id, p.shop_id);
        patch_opt(&mut self.notes, p.notes);
        patch_opt(&mut self.in_stock, p.in_stock);

        match p.is_completed {
            Some(true) if !self.is_completed => {
                self.is_completed = true;
                self.completed_date = Some(now);
            }
            Some(false) => {
                self.is_completed = false;
                self.completed_date = None;
            }
            _ => {}
        }
    }

    fn validate(&self) -> GezinResult<()> {
        require("name", &self.name)?;
        require("category", &self.category)
    }
}
