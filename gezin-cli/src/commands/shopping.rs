use anyhow::Result;
use clap::Subcommand;
use gezin_core::entity::shopping::DEFAULT_CATEGORY_COLOR;
use gezin_core::views::shopping::{
    ItemFilter, category_color, completed_items, filtered_items, group_by_category, group_by_shop,
    items_in_category, stats,
};
use gezin_core::{
    NewShop, NewShoppingCategory, NewShoppingItem, Shop, ShopPatch, ShoppingCategory,
    ShoppingCategoryPatch, ShoppingItem, ShoppingItemPatch,
};
use owo_colors::OwoColorize;

use super::{clearable, not_found};
use crate::App;
use crate::render::{Render, swatch};
use crate::utils::tui::confirm;

#[derive(Subcommand)]
pub enum ShoppingCommand {
    /// Show the shopping list
    List {
        /// Match against name and notes
        #[arg(short, long)]
        search: Option<String>,
        /// Only this category (by name)
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        hide_completed: bool,
        /// Group by shop before category
        #[arg(long)]
        by_shop: bool,
    },
    /// Put an item on the list
    Add {
        name: String,
        /// Category name
        #[arg(short, long)]
        category: String,
        /// Shop id
        #[arg(long)]
        shop: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        #[arg(long)]
        in_stock: bool,
    },
    /// Change an item. Pass "" to clear shop or notes.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        shop: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        #[arg(long)]
        in_stock: Option<bool>,
    },
    /// Tick an item off
    Check { id: String },
    /// Put a ticked item back on the list
    Uncheck { id: String },
    /// Remove an item
    Delete { id: String },
    /// Remove every ticked item
    ClearCompleted {
        #[arg(short, long)]
        yes: bool,
    },
    /// Shopping categories
    #[command(subcommand)]
    Categories(CategoryCommand),
    /// Shops
    #[command(subcommand)]
    Shops(ShopCommand),
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    List,
    Add {
        name: String,
        /// Color as #rrggbb
        #[arg(long, default_value = DEFAULT_CATEGORY_COLOR)]
        color: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a category that no item uses anymore
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ShopCommand {
    List,
    Add {
        name: String,
        #[arg(short, long)]
        address: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Change a shop. Pass "" to clear address or notes.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        address: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(app: &mut App, cmd: ShoppingCommand) -> Result<()> {
    match cmd {
        ShoppingCommand::List {
            search,
            category,
            hide_completed,
            by_shop,
        } => {
            let filter = ItemFilter {
                search: search.unwrap_or_default(),
                category,
                hide_completed,
            };
            print_list(app, &filter, by_shop);
        }
        ShoppingCommand::Add {
            name,
            category,
            shop,
            notes,
            in_stock,
        } => {
            require_shop(app, shop.as_deref())?;
            let mut draft = NewShoppingItem::new(name, category);
            draft.shop_id = clearable(shop).flatten();
            draft.notes = clearable(notes).flatten();
            draft.in_stock = in_stock.then_some(true);
            let item = app.add::<ShoppingItem>(draft).await?;
            println!("Added {}", item.render());
        }
        ShoppingCommand::Update {
            id,
            name,
            category,
            shop,
            notes,
            in_stock,
        } => {
            require_shop(app, shop.as_deref())?;
            let patch = ShoppingItemPatch {
                name,
                category,
                shop_id: clearable(shop),
                notes: clearable(notes),
                in_stock: in_stock.map(Some),
                is_completed: None,
            };
            let item = app
                .update::<ShoppingItem>(&id, patch)
                .await?
                .ok_or_else(|| not_found("item", &id))?;
            println!("Updated {}", item.render());
        }
        ShoppingCommand::Check { id } => {
            let item = app
                .set_item_completed(&id, true)
                .await?
                .ok_or_else(|| not_found("item", &id))?;
            println!("{}", item.render());
        }
        ShoppingCommand::Uncheck { id } => {
            let item = app
                .set_item_completed(&id, false)
                .await?
                .ok_or_else(|| not_found("item", &id))?;
            println!("{}", item.render());
        }
        ShoppingCommand::Delete { id } => {
            if app.find::<ShoppingItem>(&id).is_none() {
                return Err(not_found("item", &id));
            }
            app.delete::<ShoppingItem>(&id).await?;
            println!("Deleted item {id}");
        }
        ShoppingCommand::ClearCompleted { yes } => {
            let ids: Vec<String> = completed_items(app.records::<ShoppingItem>())
                .iter()
                .map(|i| i.id.clone())
                .collect();
            if ids.is_empty() {
                println!("{}", "Nothing to clear".dimmed());
                return Ok(());
            }
            if confirm(format!("Remove {} ticked item(s)?", ids.len()), yes)? {
                for id in &ids {
                    app.delete::<ShoppingItem>(id).await?;
                }
                println!("Removed {} item(s)", ids.len());
            }
        }
        ShoppingCommand::Categories(cmd) => run_categories(app, cmd).await?,
        ShoppingCommand::Shops(cmd) => run_shops(app, cmd).await?,
    }

    Ok(())
}

/// An item may only point at a known shop. An empty id clears the shop.
fn require_shop(app: &App, shop: Option<&str>) -> Result<()> {
    match shop.map(str::trim) {
        Some(id) if !id.is_empty() && app.find::<Shop>(id).is_none() => Err(not_found("shop", id)),
        _ => Ok(()),
    }
}

fn print_list(app: &App, filter: &ItemFilter, by_shop: bool) {
    let all = app.records::<ShoppingItem>();
    let categories = app.records::<ShoppingCategory>();
    let items = filtered_items(all, filter);

    if items.is_empty() {
        println!("{}", "The shopping list is empty".dimmed());
    } else if by_shop {
        for group in group_by_shop(&items, app.records::<Shop>()) {
            let heading = group.shop.map_or("Any shop", |s| s.name.as_str());
            println!("{}", heading.bold());
            for (category, items) in &group.categories {
                println!("  {} {}", swatch(category_color(categories, category)), category);
                for item in items {
                    println!("    {}", item.render());
                }
            }
            println!();
        }
    } else {
        for (category, items) in &group_by_category(&items) {
            println!("{} {}", swatch(category_color(categories, category)), category.bold());
            for item in items {
                println!("  {}", item.render());
            }
            println!();
        }
    }

    let stats = stats(all);
    println!(
        "{}",
        format!(
            "{} items, {} done, {} to get",
            stats.total, stats.completed, stats.pending
        )
        .dimmed()
    );
}

async fn run_categories(app: &mut App, cmd: CategoryCommand) -> Result<()> {
    match cmd {
        CategoryCommand::List => {
            let categories = app.records::<ShoppingCategory>();
            if categories.is_empty() {
                println!("{}", "No categories yet".dimmed());
            }
            for category in categories {
                println!("{}", category.render());
            }
        }
        CategoryCommand::Add { name, color } => {
            let category = app
                .add::<ShoppingCategory>(NewShoppingCategory { name, color })
                .await?;
            println!("Added {}", category.render());
        }
        CategoryCommand::Update { id, name, color } => {
            let patch = ShoppingCategoryPatch { name, color };
            let category = app
                .update::<ShoppingCategory>(&id, patch)
                .await?
                .ok_or_else(|| not_found("category", &id))?;
            println!("Updated {}", category.render());
        }
        CategoryCommand::Delete { id, yes } => {
            let name = app
                .find::<ShoppingCategory>(&id)
                .map(|c| c.name.clone())
                .ok_or_else(|| not_found("category", &id))?;

            let in_use = items_in_category(app.records::<ShoppingItem>(), &name).len();
            if in_use > 0 {
                anyhow::bail!(
                    "Category '{name}' is still used by {in_use} item(s). \
                     Remove those items or change their category first."
                );
            }

            if confirm(format!("Delete category '{name}'?"), yes)? {
                app.delete::<ShoppingCategory>(&id).await?;
                println!("Deleted category '{name}'");
            }
        }
    }
    Ok(())
}

async fn run_shops(app: &mut App, cmd: ShopCommand) -> Result<()> {
    match cmd {
        ShopCommand::List => {
            let shops = app.records::<Shop>();
            if shops.is_empty() {
                println!("{}", "No shops yet".dimmed());
            }
            for shop in shops {
                println!("{}", shop.render());
                if let Some(notes) = &shop.notes {
                    println!("  {}", notes.dimmed());
                }
            }
        }
        ShopCommand::Add {
            name,
            address,
            notes,
        } => {
            let draft = NewShop {
                name,
                address: clearable(address).flatten(),
                notes: clearable(notes).flatten(),
            };
            let shop = app.add::<Shop>(draft).await?;
            println!("Added {}", shop.render());
        }
        ShopCommand::Update {
            id,
            name,
            address,
            notes,
        } => {
            let patch = ShopPatch {
                name,
                address: clearable(address),
                notes: clearable(notes),
            };
            let shop = app
                .update::<Shop>(&id, patch)
                .await?
                .ok_or_else(|| not_found("shop", &id))?;
            println!("Updated {}", shop.render());
        }
        ShopCommand::Delete { id, yes } => {
            let name = app
                .find::<Shop>(&id)
                .map(|s| s.name.clone())
                .ok_or_else(|| not_found("shop", &id))?;
            if confirm(format!("Delete shop '{name}'?"), yes)? {
                app.delete::<Shop>(&id).await?;
                println!("Deleted shop '{name}'");
            }
        }
    }
    Ok(())
}
