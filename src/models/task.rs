use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not done yet. New tasks start here.
    #[default]
    Pending,
    /// Done.
    Completed,
}

/// Represents a task as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned monotonically by the store.
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Owner of the task. Set once at creation and never changed.
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/tasks`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Defaults to `pending` when omitted.
    pub status: Option<TaskStatus>,
}

/// Request body for `PUT /api/tasks/{id}`. Absent fields are left untouched.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTaskInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,
}

/// Query parameters for `GET /api/tasks`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Only return tasks in this status.
    pub status: Option<TaskStatus>,
}

/// A task about to be inserted. The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
}

impl NewTask {
    /// Builds the insert for `input` owned by `user_id`.
    pub fn new(input: CreateTaskInput, user_id: i64) -> Self {
        Self {
            user_id,
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or_default(),
        }
    }
}

/// Fields to merge into an existing task. `None` keeps the stored value.
///
/// There is no way to name the owner here, so an update can never move a task
/// to another user.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl From<UpdateTaskInput> for TaskChanges {
    fn from(input: UpdateTaskInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
            status: input.status,
        }
    }
}

impl Task {
    /// Merges `changes` into this task, last write wins.
    pub fn apply(&mut self, changes: TaskChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }
}
