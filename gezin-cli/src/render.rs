//! Colored terminal rendering for gezin records.

use chrono::{Local, NaiveDate};
use gezin_core::store::Health;
use gezin_core::views;
use gezin_core::{
    CalendarEvent, FamilyMember, Meal, Priority, Shop, ShoppingCategory, ShoppingItem, Sleepover,
    Task, TaskStatus,
};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

/// A colored dot for a `#rrggbb` value, or a plain one if it doesn't parse.
pub fn swatch(hex: &str) -> String {
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
    };
    match (channel(1), channel(3), channel(5)) {
        (Some(r), Some(g), Some(b)) => "●".truecolor(r, g, b).to_string(),
        _ => "●".to_string(),
    }
}

/// "Today", "Tomorrow", "Yesterday" or e.g. "Wed 26 Feb 2025".
pub fn date_label(date: NaiveDate) -> String {
    let today = Local::now().date_naive();
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %-d %b %Y").to_string(),
    }
}

fn id_tag(id: &str) -> String {
    format!("[{id}]").dimmed().to_string()
}

impl Render for FamilyMember {
    fn render(&self) -> String {
        let age = self
            .birth_date
            .and_then(|birth| views::family::age_on(birth, Local::now().date_naive()))
            .map(|age| format!(" ({age})"))
            .unwrap_or_default();
        format!("{} {}{} {}", swatch(&self.color), self.name, age, id_tag(&self.id))
    }
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let time = self.time.as_deref().unwrap_or("all day");
        let location = self
            .location
            .as_deref()
            .map(|l| format!(" @ {l}").dimmed().to_string())
            .unwrap_or_default();
        format!(
            "{} {:>7} {}{} {}",
            swatch(self.event_type.color()),
            time,
            self.title,
            location,
            id_tag(&self.id)
        )
    }
}

impl Render for ShoppingCategory {
    fn render(&self) -> String {
        format!("{} {} {}", swatch(&self.color), self.name, id_tag(&self.id))
    }
}

impl Render for Shop {
    fn render(&self) -> String {
        let address = self
            .address
            .as_deref()
            .map(|a| format!(" ({a})").dimmed().to_string())
            .unwrap_or_default();
        format!("{}{} {}", self.name.bold(), address, id_tag(&self.id))
    }
}

impl Render for ShoppingItem {
    fn render(&self) -> String {
        let (check, name) = if self.is_completed {
            ("[x]".green().to_string(), self.name.strikethrough().dimmed().to_string())
        } else {
            ("[ ]".to_string(), self.name.clone())
        };
        let notes = self
            .notes
            .as_deref()
            .map(|n| format!(" {}", n.dimmed()))
            .unwrap_or_default();
        let stock = match self.in_stock {
            Some(true) => format!(" {}", "in stock".cyan()),
            _ => String::new(),
        };
        format!("{check} {name}{notes}{stock} {}", id_tag(&self.id))
    }
}

impl Render for Meal {
    fn render(&self) -> String {
        let details = self
            .location_details
            .as_deref()
            .map(|d| format!(", {d}"))
            .unwrap_or_default();
        format!(
            "{:<9} {} {} {}",
            self.meal_type.as_str(),
            self.dish.bold(),
            format!("({}{details})", self.location).dimmed(),
            id_tag(&self.id)
        )
    }
}

impl Render for Sleepover {
    fn render(&self) -> String {
        let mut parts = Vec::new();
        if let Some(host) = &self.host_name {
            parts.push(format!("with {host}"));
        }
        if let Some(location) = &self.location {
            parts.push(format!("at {location}"));
        }
        if let Some(pickup) = &self.pickup_time {
            parts.push(format!("pickup {pickup}"));
        }
        format!(
            "{} {} {}",
            date_label(self.date).bold(),
            parts.join(", "),
            id_tag(&self.id)
        )
    }
}

impl Render for Priority {
    fn render(&self) -> String {
        match self {
            Priority::High => "high".red().to_string(),
            Priority::Medium => "medium".yellow().to_string(),
            Priority::Low => "low".dimmed().to_string(),
        }
    }
}

impl Render for TaskStatus {
    fn render(&self) -> String {
        match self {
            TaskStatus::Pending => "[ ]".to_string(),
            TaskStatus::InProgress => "[~]".yellow().to_string(),
            TaskStatus::Completed => "[x]".green().to_string(),
        }
    }
}

impl Render for Health {
    fn render(&self) -> String {
        if self.ok {
            "reachable".green().to_string()
        } else {
            let reason = self.reason.as_deref().unwrap_or("unknown error");
            format!("{} {}", "unreachable:".red(), reason)
        }
    }
}

/// A task line with its assignees resolved against `members`.
pub fn render_task(task: &Task, members: &[FamilyMember], today: NaiveDate) -> String {
    let title = if task.is_completed() {
        task.title.dimmed().to_string()
    } else {
        task.title.clone()
    };
    let due = match task.date {
        Some(date) if views::tasks::is_overdue(task, today) => {
            format!(" due {}", date_label(date)).red().to_string()
        }
        Some(date) => format!(" due {}", date_label(date)).dimmed().to_string(),
        None => String::new(),
    };
    let assignees = views::tasks::assignee_names(task, members).join(", ");

    format!(
        "{} {} {} {}{} {}",
        task.status.render(),
        title,
        task.priority.render(),
        format!("({assignees})").dimmed(),
        due,
        id_tag(&task.id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swatch_falls_back_on_bad_hex() {
        assert_eq!(swatch("red"), "●");
        assert_ne!(swatch("#3182ce"), "●");
    }
}
