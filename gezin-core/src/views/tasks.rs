use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::entity::{FamilyMember, Priority, Task, TaskStatus};

use super::matches_search;

pub const UNASSIGNED: &str = "Unassigned";
pub const UNKNOWN_MEMBER: &str = "Unknown";

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Matched against title and description.
    pub search: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    /// Member id that must be among the assignees.
    pub assignee: Option<String>,
}

impl TaskFilter {
    pub fn accepts(&self, task: &Task) -> bool {
        matches_search(&self.search, [Some(task.title.as_str()), task.description.as_deref()])
            && self.status.is_none_or(|s| task.status == s)
            && self.priority.is_none_or(|p| task.priority == p)
            && self
                .assignee
                .as_ref()
                .is_none_or(|id| task.assignees().contains(id))
    }
}

/// Status (open work first), then priority (most urgent first), then date
/// (dated before undated, earliest first), then newest created.
pub fn compare(a: &Task, b: &Task) -> Ordering {
    a.status
        .rank()
        .cmp(&b.status.rank())
        .then_with(|| a.priority.rank().cmp(&b.priority.rank()))
        .then_with(|| match (a.date, b.date) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.created_date.cmp(&a.created_date))
}

pub fn sorted_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    let mut shown: Vec<_> = tasks.iter().filter(|t| filter.accepts(t)).collect();
    shown.sort_by(|a, b| compare(a, b));
    shown
}

/// Tasks in their manual (drag-and-drop) order. Tasks without an `order`
/// keep their relative position after the ordered ones.
pub fn manual_order(tasks: &[Task]) -> Vec<&Task> {
    let mut ordered: Vec<_> = tasks.iter().collect();
    ordered.sort_by_key(|t| t.order.unwrap_or(i64::MAX));
    ordered
}

pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.is_completed() && task.date.is_some_and(|date| date < today)
}

/// Names of the assigned members, or a single placeholder when there are
/// none. Ids that no longer resolve show as unknown.
pub fn assignee_names<'a>(task: &Task, members: &'a [FamilyMember]) -> Vec<&'a str> {
    let ids = task.assignees();
    if ids.is_empty() {
        return vec![UNASSIGNED];
    }
    ids.iter()
        .map(|id| {
            members
                .iter()
                .find(|m| &m.id == id)
                .map_or(UNKNOWN_MEMBER, |m| m.name.as_str())
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub overdue: usize,
}

pub fn stats(tasks: &[Task], today: NaiveDate) -> TaskStats {
    let count = |status| tasks.iter().filter(|t| t.status == status).count();
    TaskStats {
        total: tasks.len(),
        pending: count(TaskStatus::Pending),
        in_progress: count(TaskStatus::InProgress),
        completed: count(TaskStatus::Completed),
        overdue: tasks.iter().filter(|t| is_overdue(t, today)).count(),
    }
}
