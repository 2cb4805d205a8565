use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use gezin_core::views::family::member_names;
use gezin_core::views::meals::{sorted_meals, week_plan};
use gezin_core::{
    FamilyMember, Frequency, Meal, MealLocation, MealPatch, MealRecurrence, MealType, NewMeal,
};
use owo_colors::OwoColorize;

use super::{clearable, not_found, today};
use crate::App;
use crate::render::{Render, date_label};
use crate::utils::tui::confirm;

#[derive(Subcommand)]
pub enum MealsCommand {
    /// Show the week plan
    Week {
        /// Any day in the week to show (default: this week)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List every planned meal, newest first
    List,
    /// Plan a meal, optionally repeating it
    Add {
        dish: String,
        #[arg(long)]
        date: NaiveDate,
        /// breakfast, lunch, dinner or snack
        #[arg(short = 't', long = "type", default_value = "dinner")]
        meal_type: MealType,
        /// home, restaurant, school, work or other
        #[arg(short, long, default_value = "home")]
        location: MealLocation,
        #[arg(long)]
        details: Option<String>,
        #[arg(short, long = "participant")]
        participants: Vec<String>,
        /// daily, weekly or monthly (every 30 days)
        #[arg(long, requires = "until")]
        repeat: Option<Frequency>,
        /// Last date of the repetition, inclusive
        #[arg(long)]
        until: Option<NaiveDate>,
    },
    /// Change a meal. Pass "" to clear the location details.
    Update {
        id: String,
        #[arg(long)]
        dish: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(short = 't', long = "type")]
        meal_type: Option<MealType>,
        #[arg(short, long)]
        location: Option<MealLocation>,
        #[arg(long)]
        details: Option<String>,
        /// Replaces the participant list (repeatable)
        #[arg(short, long = "participant")]
        participants: Option<Vec<String>>,
    },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(app: &mut App, cmd: MealsCommand) -> Result<()> {
    match cmd {
        MealsCommand::Week { date } => {
            let family = app.records::<FamilyMember>();
            for (day, plan) in week_plan(app.records::<Meal>(), date.unwrap_or_else(today)) {
                println!("{}", date_label(day).bold());
                let meals: Vec<_> = plan.values().flatten().collect();
                if meals.is_empty() {
                    println!("  {}", "-".dimmed());
                }
                for meal in meals {
                    print_meal(meal, family);
                }
            }
        }
        MealsCommand::List => {
            let family = app.records::<FamilyMember>();
            let meals = sorted_meals(app.records::<Meal>());
            if meals.is_empty() {
                println!("{}", "No meals planned yet".dimmed());
            }
            let mut current = None;
            for meal in meals {
                if current != Some(meal.date) {
                    println!("{}", date_label(meal.date).bold());
                    current = Some(meal.date);
                }
                print_meal(meal, family);
            }
        }
        MealsCommand::Add {
            dish,
            date,
            meal_type,
            location,
            details,
            participants,
            repeat,
            until,
        } => {
            let mut draft = NewMeal::new(date, meal_type, dish);
            draft.location = location;
            draft.location_details = clearable(details).flatten();
            draft.participants = participants;

            match repeat {
                Some(frequency) => {
                    let recurrence = MealRecurrence {
                        frequency,
                        end_date: until,
                    };
                    let meals = app.add_recurring_meal(draft, recurrence).await?;
                    println!("Planned {} meal(s)", meals.len());
                }
                None => {
                    let meal = app.add::<Meal>(draft).await?;
                    println!("Planned {} on {}", meal.render(), date_label(meal.date));
                }
            }
        }
        MealsCommand::Update {
            id,
            dish,
            date,
            meal_type,
            location,
            details,
            participants,
        } => {
            let patch = MealPatch {
                date,
                meal_type,
                dish,
                location,
                location_details: clearable(details),
                participants,
                recurring: None,
            };
            let meal = app
                .update::<Meal>(&id, patch)
                .await?
                .ok_or_else(|| not_found("meal", &id))?;
            println!("Updated {}", meal.render());
        }
        MealsCommand::Delete { id, yes } => {
            let dish = app
                .find::<Meal>(&id)
                .map(|m| m.dish.clone())
                .ok_or_else(|| not_found("meal", &id))?;
            if confirm(format!("Delete '{dish}'?"), yes)? {
                app.delete::<Meal>(&id).await?;
                println!("Deleted '{dish}'");
            }
        }
    }

    Ok(())
}

fn print_meal(meal: &Meal, family: &[FamilyMember]) {
    let names = member_names(family, &meal.participants);
    if names.is_empty() {
        println!("  {}", meal.render());
    } else {
        println!("  {} {}", meal.render(), names.join(", ").dimmed());
    }
}
