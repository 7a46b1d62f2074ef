use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A follow-up item, optionally tied to a contact. Tasks without a contact are
/// "general" tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub contact_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaskInput {
    pub title: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    pub contact_id: Option<String>,
}

/// Completion filter for task listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskStatusFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskStatusFilter::All => true,
            TaskStatusFilter::Pending => !task.completed,
            TaskStatusFilter::Completed => task.completed,
        }
    }
}

/// Task together with the name of its contact, if it has one that still exists.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaskWithContact {
    #[serde(flatten)]
    pub task: Task,
    pub contact_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

/// Pending tasks due today, with contact names
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TodayTasksResponse {
    pub tasks: Vec<TaskWithContact>,
}
