use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use gezin_core::views::family::{children, find_member};
use gezin_core::views::sleepovers::{TimeFilter, filtered_sleepovers, stats};
use gezin_core::{FamilyMember, MemberType, NewSleepover, Sleepover, SleepoverPatch};
use owo_colors::OwoColorize;

use super::{clearable, not_found, today};
use crate::App;
use crate::render::Render;
use crate::utils::tui::confirm;

#[derive(Subcommand)]
pub enum SleepoversCommand {
    /// List sleepovers, newest first
    List {
        /// Only this child (member id)
        #[arg(short, long)]
        child: Option<String>,
        #[arg(long, conflicts_with = "past")]
        upcoming: bool,
        #[arg(long)]
        past: bool,
    },
    /// Plan a sleepover for a child
    Add {
        /// Member id of the child
        child: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        /// HH:MM
        #[arg(long)]
        pickup: Option<String>,
    },
    /// Change a sleepover. Pass "" to clear an optional field.
    Update {
        id: String,
        #[arg(long)]
        child: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        #[arg(long)]
        pickup: Option<String>,
    },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(app: &mut App, cmd: SleepoversCommand) -> Result<()> {
    match cmd {
        SleepoversCommand::List {
            child,
            upcoming,
            past,
        } => {
            let time = match (upcoming, past) {
                (true, _) => TimeFilter::Upcoming,
                (_, true) => TimeFilter::Past,
                _ => TimeFilter::All,
            };
            let family = app.records::<FamilyMember>();
            let all = app.records::<Sleepover>();
            let shown = filtered_sleepovers(all, child.as_deref(), time, today());

            if shown.is_empty() {
                println!("{}", "No sleepovers".dimmed());
            }
            for sleepover in shown {
                let name = find_member(family, &sleepover.child_id)
                    .map_or("Unknown", |m| m.name.as_str());
                println!("{} {}", name.bold(), sleepover.render());
                if let Some(notes) = &sleepover.notes {
                    println!("  {}", notes.dimmed());
                }
            }

            let stats = stats(all, today());
            println!(
                "\n{}",
                format!(
                    "{} total, {} upcoming, {} this month",
                    stats.total, stats.upcoming, stats.this_month
                )
                .dimmed()
            );
        }
        SleepoversCommand::Add {
            child,
            date,
            location,
            host,
            notes,
            pickup,
        } => {
            require_child(app, &child)?;
            let draft = NewSleepover {
                location: clearable(location).flatten(),
                host_name: clearable(host).flatten(),
                notes: clearable(notes).flatten(),
                pickup_time: clearable(pickup).flatten(),
                ..NewSleepover::new(child, date)
            };
            let sleepover = app.add::<Sleepover>(draft).await?;
            println!("Added {}", sleepover.render());
        }
        SleepoversCommand::Update {
            id,
            child,
            date,
            location,
            host,
            notes,
            pickup,
        } => {
            if let Some(child) = &child {
                require_child(app, child)?;
            }
            let patch = SleepoverPatch {
                child_id: child,
                date,
                location: clearable(location),
                host_name: clearable(host),
                notes: clearable(notes),
                pickup_time: clearable(pickup),
            };
            let sleepover = app
                .update::<Sleepover>(&id, patch)
                .await?
                .ok_or_else(|| not_found("sleepover", &id))?;
            println!("Updated {}", sleepover.render());
        }
        SleepoversCommand::Delete { id, yes } => {
            if app.find::<Sleepover>(&id).is_none() {
                return Err(not_found("sleepover", &id));
            }
            if confirm("Delete this sleepover?".to_string(), yes)? {
                app.delete::<Sleepover>(&id).await?;
                println!("Deleted sleepover {id}");
            }
        }
    }

    Ok(())
}

/// Sleepovers are for children only.
fn require_child(app: &App, id: &str) -> Result<()> {
    let family = app.records::<FamilyMember>();
    match find_member(family, id) {
        Some(member) if member.member_type == MemberType::Child => Ok(()),
        Some(member) => anyhow::bail!("{} is not a child", member.name),
        None => {
            let known: Vec<_> = children(family)
                .iter()
                .map(|c| format!("{} ({})", c.name, c.id))
                .collect();
            anyhow::bail!("No child with id '{id}'. Children: {}", known.join(", "))
        }
    }
}
