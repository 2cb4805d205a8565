use std::collections::BTreeMap;

use crate::entity::shopping::DEFAULT_CATEGORY_COLOR;
use crate::entity::{Shop, ShoppingCategory, ShoppingItem};

use super::matches_search;

/// Colors offered when creating a category.
pub const CATEGORY_PALETTE: [&str; 14] = [
    "#48bb78", "#e53e3e", "#4299e1", "#ed8936", "#38b2ac", "#9f7aea", "#f56565", "#ecc94b",
    "#718096", "#4fd1c5", "#fc8181", "#f6ad55", "#90cdf4", "#a0aec0",
];

#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Matched against name and notes.
    pub search: String,
    /// Category name; `None` shows all categories.
    pub category: Option<String>,
    pub hide_completed: bool,
}

/// Items passing `filter`, open items first, then by name.
pub fn filtered_items<'a>(items: &'a [ShoppingItem], filter: &ItemFilter) -> Vec<&'a ShoppingItem> {
    let mut shown: Vec<_> = items
        .iter()
        .filter(|item| matches_search(&filter.search, [Some(item.name.as_str()), item.notes.as_deref()]))
        .filter(|item| filter.category.as_ref().is_none_or(|c| &item.category == c))
        .filter(|item| !(filter.hide_completed && item.is_completed))
        .collect();

    shown.sort_by(|a, b| {
        a.is_completed
            .cmp(&b.is_completed)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    shown
}

/// Items grouped by category name, keeping their order within a group.
pub fn group_by_category<'a>(items: &[&'a ShoppingItem]) -> BTreeMap<&'a str, Vec<&'a ShoppingItem>> {
    let mut groups: BTreeMap<&str, Vec<&ShoppingItem>> = BTreeMap::new();
    for &item in items {
        groups.entry(item.category.as_str()).or_default().push(item);
    }
    groups
}

/// One shop's part of the list. `shop` is `None` for items without a
/// (known) shop.
#[derive(Debug)]
pub struct ShopGroup<'a> {
    pub shop: Option<&'a Shop>,
    pub categories: BTreeMap<&'a str, Vec<&'a ShoppingItem>>,
}

/// Items grouped per shop (in `shops` order, unknown shop last), then by
/// category.
pub fn group_by_shop<'a>(items: &[&'a ShoppingItem], shops: &'a [Shop]) -> Vec<ShopGroup<'a>> {
    let shop_of = |item: &ShoppingItem| {
        item.shop_id
            .as_deref()
            .and_then(|id| shops.iter().find(|s| s.id == id))
    };

    shops
        .iter()
        .map(Some)
        .chain(std::iter::once(None))
        .filter_map(|shop| {
            let in_shop: Vec<_> = items
                .iter()
                .copied()
                .filter(|item| shop_of(item).map(|s| &s.id) == shop.map(|s| &s.id))
                .collect();
            (!in_shop.is_empty()).then(|| ShopGroup {
                shop,
                categories: group_by_category(&in_shop),
            })
        })
        .collect()
}

/// Display color for a category name.
pub fn category_color<'a>(categories: &'a [ShoppingCategory], name: &str) -> &'a str {
    categories
        .iter()
        .find(|c| c.name == name)
        .map_or(DEFAULT_CATEGORY_COLOR, |c| c.color.as_str())
}

/// Items still filed under a category. A category in use cannot be deleted.
pub fn items_in_category<'a>(items: &'a [ShoppingItem], name: &str) -> Vec<&'a ShoppingItem> {
    items.iter().filter(|i| i.category == name).collect()
}

pub fn completed_items(items: &[ShoppingItem]) -> Vec<&ShoppingItem> {
    items.iter().filter(|i| i.is_completed).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShoppingStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

pub fn stats(items: &[ShoppingItem]) -> ShoppingStats {
    let completed = items.iter().filter(|i| i.is_completed).count();
    ShoppingStats {
        total: items.len(),
        completed,
        pending: items.len() - completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, NewShop, NewShoppingItem};
    use chrono::Utc;

    fn item(id: &str, name: &str, category: &str, done: bool) -> ShoppingItem {
        let mut draft = NewShoppingItem::new(name, category);
        draft.is_completed = done;
        ShoppingItem::from_draft(id.into(), draft, Utc::now())
    }

    fn shop(id: &str, name: &str) -> Shop {
        let draft = NewShop {
            name: name.into(),
            address: None,
            notes: None,
        };
        Shop::from_draft(id.into(), draft, Utc::now())
    }

    #[test]
    fn open_items_first_then_by_name() {
        let items = [
            item("1", "brood", "bakery", true),
            item("2", "Melk", "dairy", false),
            item("3", "appels", "fruit", false),
        ];

        let names: Vec<_> = filtered_items(&items, &ItemFilter::default())
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, ["appels", "Melk", "brood"]);
    }

    #[test]
    fn filters_combine() {
        let mut items = vec![
            item("1", "Melk", "dairy", false),
            item("2", "Yoghurt", "dairy", true),
            item("3", "Kaas", "dairy", false),
        ];
        items[2].notes = Some("Oude melkkaas".into());

        let filter = ItemFilter {
            search: "MELK".into(),
            category: Some("dairy".into()),
            hide_completed: true,
        };
        let ids: Vec<_> = filtered_items(&items, &filter).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["3", "1"]);
    }

    #[test]
    fn groups_by_shop_then_category() {
        let shops = [shop("s1", "Lidl"), shop("s2", "Markt")];
        let mut items = vec![
            item("1", "Melk", "dairy", false),
            item("2", "Appels", "fruit", false),
            item("3", "Batterijen", "misc", false),
        ];
        items[0].shop_id = Some("s1".into());
        items[1].shop_id = Some("s1".into());
        items[2].shop_id = Some("deleted-shop".into());
        let all: Vec<_> = items.iter().collect();

        let groups = group_by_shop(&all, &shops);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].shop.map(|s| s.name.as_str()), Some("Lidl"));
        assert_eq!(groups[0].categories.keys().copied().collect::<Vec<_>>(), ["dairy", "fruit"]);
        assert!(groups[1].shop.is_none());
        assert_eq!(groups[1].categories["misc"].len(), 1);
    }

    #[test]
    fn stats_and_colors() {
        let items = [item("1", "Melk", "dairy", true), item("2", "Brood", "bakery", false)];
        assert_eq!(
            stats(&items),
            ShoppingStats {
                total: 2,
                completed: 1,
                pending: 1
            }
        );
        assert_eq!(category_color(&[], "dairy"), DEFAULT_CATEGORY_COLOR);
        assert_eq!(items_in_category(&items, "dairy").len(), 1);
    }
}
