use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Entity, de, patch, patch_opt, require};
use crate::error::GezinResult;

wire_enum! {
    Priority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl Priority {
    /// Sort rank, most urgent first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

wire_enum! {
    TaskStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
    }
}

impl TaskStatus {
    /// Sort rank, open work first.
    pub fn rank(self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "de::optional_text")]
    pub description: Option<String>,
    #[serde(default, alias = "assignedto", deserialize_with = "de::optional_id_list")]
    pub assigned_to: Option<Vec<String>>,
    pub priority: Priority,
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "de::optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(alias = "createddate")]
    pub created_date: DateTime<Utc>,
    #[serde(default, alias = "completeddate")]
    pub completed_date: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Assigned member ids, empty when unassigned.
    pub fn assignees(&self) -> &[String] {
        self.assigned_to.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<Vec<String>>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub categories: Vec<String>,
    pub date: Option<NaiveDate>,
    pub order: Option<i64>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            description: None,
            assigned_to: None,
            priority: Priority::Medium,
            status: TaskStatus::Pending,
            categories: Vec::new(),
            date: None,
            order: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub assigned_to: Option<Option<Vec<String>>>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub categories: Option<Vec<String>>,
    pub date: Option<Option<NaiveDate>>,
    pub order: Option<Option<i64>>,
}

impl Entity for Task {
    const COLLECTION: Collection = Collection::Tasks;
    type Draft = NewTask;
    type Patch = TaskPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewTask, now: DateTime<Utc>) -> Self {
        Task {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            assigned_to: draft.assigned_to.filter(|ids| !ids.is_empty()),
            priority: draft.priority,
            status: draft.status,
            categories: draft.categories,
            date: draft.date,
            order: draft.order,
            created_date: now,
            completed_date: (draft.status == TaskStatus::Completed).then_some(now),
        }
    }

    fn apply_patch(&mut self, p: TaskPatch, now: DateTime<Utc>) {
        patch(&mut self.title, p.title);
        patch_opt(&mut self.description, p.description);
        patch_opt(
            &mut self.assigned_to,
            p.assigned_to.map(|ids| ids.filter(|ids| !ids.is_empty())),
        );
        patch(&mut self.priority, p.priority);
        patch(&mut self.categories, p.categories);
        patch_opt(&mut self.date, p.date);
        patch_opt(&mut self.order, p.order);

        if let Some(status) = p.status {
            if status == TaskStatus::Completed {
                if self.status != TaskStatus::Completed {
                    self.completed_date = Some(now);
                }
            } else {
                self.completed_date = None;
            }
            self.status = status;
        }
    }

    fn validate(&self) -> GezinResult<()> {
        require("title", &self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task() -> Task {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        Task::from_draft("t1".into(), NewTask::new("Vacuum"), created)
    }

    fn status(status: TaskStatus) -> TaskPatch {
        TaskPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    #[test]
    fn completing_stamps_and_reopening_clears() {
        let mut task = task();
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 8, 0, 0).unwrap();

        task.apply_patch(status(TaskStatus::Completed), now);
        assert_eq!(task.completed_date, Some(now));

        task.apply_patch(status(TaskStatus::InProgress), now);
        assert_eq!(task.completed_date, None);
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn unrelated_patch_keeps_completion_stamp() {
        let mut task = task();
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 8, 0, 0).unwrap();
        task.apply_patch(status(TaskStatus::Completed), now);

        task.apply_patch(
            TaskPatch {
                title: Some("Vacuum upstairs".into()),
                ..Default::default()
            },
            Utc::now(),
        );

        assert_eq!(task.completed_date, Some(now));
    }

    #[test]
    fn created_completed_task_is_stamped() {
        let now = Utc::now();
        let task = Task::from_draft(
            "t2".into(),
            NewTask {
                status: TaskStatus::Completed,
                ..NewTask::new("Done already")
            },
            now,
        );
        assert_eq!(task.completed_date, Some(now));
        assert_eq!(task.created_date, now);
    }

    #[test]
    fn empty_assignee_list_means_unassigned() {
        let task = Task::from_draft(
            "t3".into(),
            NewTask {
                assigned_to: Some(vec![]),
                ..NewTask::new("Nobody's job")
            },
            Utc::now(),
        );
        assert_eq!(task.assigned_to, None);
        assert!(task.assignees().is_empty());
    }

    #[test]
    fn single_string_assignee_decodes_as_list() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": "t4",
            "title": "Groceries",
            "assignedTo": "m1",
            "priority": "high",
            "status": "in_progress",
            "categories": null,
            "createddate": "2025-01-01T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(task.assignees(), ["m1".to_string()]);
        assert!(task.categories.is_empty());
        assert_eq!(task.status, TaskStatus::InProgress);
    }
}
