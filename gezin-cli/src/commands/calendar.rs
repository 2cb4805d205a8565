use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::Subcommand;
use gezin_core::views::calendar::{event_dates, events_in_month, events_on, filter_by_participants};
use gezin_core::views::family::member_names;
use gezin_core::{CalendarEvent, CalendarEventPatch, EventType, FamilyMember, NewCalendarEvent};
use owo_colors::OwoColorize;

use super::{clearable, not_found, today};
use crate::App;
use crate::render::{Render, date_label};
use crate::utils::tui::confirm;

#[derive(Subcommand)]
pub enum CalendarCommand {
    /// Show events for a day, or for a whole month
    List {
        /// Day to show (default: today)
        #[arg(long, conflicts_with = "month")]
        date: Option<NaiveDate>,
        /// Month to show as YYYY-MM
        #[arg(long)]
        month: Option<String>,
        /// Only events involving this member (repeatable)
        #[arg(short, long = "member")]
        members: Vec<String>,
    },
    /// Add an event
    Add {
        title: String,
        #[arg(long)]
        date: NaiveDate,
        /// HH:MM
        #[arg(long)]
        time: Option<String>,
        /// appointment, activity, meal, sleepover or task
        #[arg(short = 't', long = "type", default_value = "appointment")]
        event_type: EventType,
        #[arg(short, long = "participant")]
        participants: Vec<String>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change an event. Pass "" to clear an optional field.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        time: Option<String>,
        #[arg(short = 't', long = "type")]
        event_type: Option<EventType>,
        /// Replaces the participant list (repeatable)
        #[arg(short, long = "participant")]
        participants: Option<Vec<String>>,
        #[arg(short, long)]
        location: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Remove an event
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(app: &mut App, cmd: CalendarCommand) -> Result<()> {
    match cmd {
        CalendarCommand::List {
            date,
            month,
            members,
        } => {
            let family = app.records::<FamilyMember>();
            let events = filter_by_participants(app.records::<CalendarEvent>(), &members);

            if let Some(month) = month {
                let first = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
                    .with_context(|| format!("Invalid month '{month}', expected YYYY-MM"))?;
                print_month(&events, first, family);
            } else {
                let day = date.unwrap_or_else(today);
                println!("{}", date_label(day).bold());
                print_day(&events_on(&events, day), family);
            }
        }
        CalendarCommand::Add {
            title,
            date,
            time,
            event_type,
            participants,
            location,
            description,
        } => {
            let mut draft = NewCalendarEvent::new(title, date, event_type);
            draft.time = clearable(time).flatten();
            draft.participants = participants;
            draft.location = clearable(location).flatten();
            draft.description = clearable(description).flatten();
            let event = app.add::<CalendarEvent>(draft).await?;
            println!("Added {} on {}", event.render(), date_label(event.date));
        }
        CalendarCommand::Update {
            id,
            title,
            date,
            time,
            event_type,
            participants,
            location,
            description,
        } => {
            let patch = CalendarEventPatch {
                title,
                date,
                time: clearable(time),
                description: clearable(description),
                event_type,
                participants,
                location: clearable(location),
            };
            let event = app
                .update::<CalendarEvent>(&id, patch)
                .await?
                .ok_or_else(|| not_found("event", &id))?;
            println!("Updated {}", event.render());
        }
        CalendarCommand::Delete { id, yes } => {
            let title = app
                .find::<CalendarEvent>(&id)
                .map(|e| e.title.clone())
                .ok_or_else(|| not_found("event", &id))?;
            if confirm(format!("Delete '{title}'?"), yes)? {
                app.delete::<CalendarEvent>(&id).await?;
                println!("Deleted '{title}'");
            }
        }
    }

    Ok(())
}

fn print_day(events: &[&CalendarEvent], family: &[FamilyMember]) {
    if events.is_empty() {
        println!("  {}", "No events".dimmed());
    }
    for event in events {
        let names = member_names(family, &event.participants);
        if names.is_empty() {
            println!("  {}", event.render());
        } else {
            println!("  {} {}", event.render(), names.join(", ").dimmed());
        }
    }
}

fn print_month(events: &[&CalendarEvent], first: NaiveDate, family: &[FamilyMember]) {
    let in_month = events_in_month(events, first.year(), first.month());
    println!("{}", first.format("%B %Y").to_string().bold());
    if in_month.is_empty() {
        println!("  {}", "No events".dimmed());
        return;
    }

    for day in event_dates(&in_month) {
        println!();
        println!("{}", date_label(day));
        print_day(&events_on(&in_month, day), family);
    }
}
