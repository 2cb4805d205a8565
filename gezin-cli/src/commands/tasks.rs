use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use gezin_core::views::tasks::{TaskFilter, manual_order, sorted_tasks, stats};
use gezin_core::{FamilyMember, NewTask, Priority, Task, TaskPatch, TaskStatus};
use owo_colors::OwoColorize;

use super::{clearable, clearable_date, not_found, today};
use crate::App;
use crate::render::render_task;
use crate::utils::tui::confirm;

#[derive(Subcommand)]
pub enum TasksCommand {
    /// List tasks
    List {
        /// Match against title and description
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(short, long)]
        priority: Option<Priority>,
        /// Only tasks assigned to this member id
        #[arg(short, long)]
        assignee: Option<String>,
        /// Show in manual order instead of by status and priority
        #[arg(long)]
        manual: bool,
    },
    /// Add a task
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Member id (repeatable)
        #[arg(short, long = "assign")]
        assign: Vec<String>,
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
        /// Free-form label (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,
        /// Due date
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Change a task. Pass "" to clear the description or date.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Replaces the assignees (repeatable)
        #[arg(short, long = "assign")]
        assign: Option<Vec<String>>,
        /// Remove all assignees
        #[arg(long, conflicts_with = "assign")]
        unassign: bool,
        #[arg(short, long)]
        priority: Option<Priority>,
        /// Replaces the labels (repeatable)
        #[arg(short, long = "category")]
        categories: Option<Vec<String>>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Set a task's status: pending, in_progress or completed
    Status { id: String, status: TaskStatus },
    /// Shorthand for `status <id> completed`
    Done { id: String },
    /// Swap two tasks in the manual order
    Swap { first: String, second: String },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn run(app: &mut App, cmd: TasksCommand) -> Result<()> {
    match cmd {
        TasksCommand::List {
            search,
            status,
            priority,
            assignee,
            manual,
        } => {
            let filter = TaskFilter {
                search: search.unwrap_or_default(),
                status,
                priority,
                assignee,
            };
            print_list(app, &filter, manual);
        }
        TasksCommand::Add {
            title,
            description,
            assign,
            priority,
            categories,
            date,
        } => {
            let draft = NewTask {
                description: clearable(description).flatten(),
                assigned_to: Some(assign),
                priority,
                categories,
                date,
                ..NewTask::new(title)
            };
            let task = app.add::<Task>(draft).await?;
            println!(
                "Added {}",
                render_task(&task, app.records::<FamilyMember>(), today())
            );
        }
        TasksCommand::Update {
            id,
            title,
            description,
            assign,
            unassign,
            priority,
            categories,
            date,
        } => {
            let assigned_to = if unassign { Some(None) } else { assign.map(Some) };
            let patch = TaskPatch {
                title,
                description: clearable(description),
                assigned_to,
                priority,
                categories,
                date: clearable_date(date)?,
                ..Default::default()
            };
            let task = app
                .update::<Task>(&id, patch)
                .await?
                .ok_or_else(|| not_found("task", &id))?;
            println!(
                "Updated {}",
                render_task(&task, app.records::<FamilyMember>(), today())
            );
        }
        TasksCommand::Status { id, status } => set_status(app, &id, status).await?,
        TasksCommand::Done { id } => set_status(app, &id, TaskStatus::Completed).await?,
        TasksCommand::Swap { first, second } => {
            if !app.swap_task_order(&first, &second).await? {
                anyhow::bail!("Both tasks must exist to swap them");
            }
            print_list(app, &TaskFilter::default(), true);
        }
        TasksCommand::Delete { id, yes } => {
            let title = app
                .find::<Task>(&id)
                .map(|t| t.title.clone())
                .ok_or_else(|| not_found("task", &id))?;
            if confirm(format!("Delete '{title}'?"), yes)? {
                app.delete::<Task>(&id).await?;
                println!("Deleted '{title}'");
            }
        }
    }

    Ok(())
}

async fn set_status(app: &mut App, id: &str, status: TaskStatus) -> Result<()> {
    let task = app
        .set_task_status(id, status)
        .await?
        .ok_or_else(|| not_found("task", id))?;
    println!(
        "{}",
        render_task(&task, app.records::<FamilyMember>(), today())
    );
    Ok(())
}

fn print_list(app: &App, filter: &TaskFilter, manual: bool) {
    let all = app.records::<Task>();
    let family = app.records::<FamilyMember>();
    let today = today();

    let shown: Vec<&Task> = if manual {
        manual_order(all)
            .into_iter()
            .filter(|t| filter.accepts(t))
            .collect()
    } else {
        sorted_tasks(all, filter)
    };

    if shown.is_empty() {
        println!("{}", "No tasks".dimmed());
    }
    for task in shown {
        println!("{}", render_task(task, family, today));
    }

    let stats = stats(all, today);
    let overdue = if stats.overdue > 0 {
        format!(", {} overdue", stats.overdue).red().to_string()
    } else {
        String::new()
    };
    println!(
        "\n{}{}",
        format!(
            "{} total, {} pending, {} in progress, {} done",
            stats.total, stats.pending, stats.in_progress, stats.completed
        )
        .dimmed(),
        overdue
    );
}
