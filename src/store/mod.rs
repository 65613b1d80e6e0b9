//! Storage ports.
//!
//! Handlers only ever talk to these traits. [`MemoryStore`] backs tests and
//! database-less runs, [`PgStore`] backs a persistent deployment. Ownership is
//! not checked here; see [`crate::auth::guard`].

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, TaskChanges, TaskStatus, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// User records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user with a fresh id.
    ///
    /// Fails with `AppError::Conflict` if the email is already registered; the
    /// existing user is left untouched.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    /// Exact, case-sensitive lookup.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
}

/// Task records.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task with a fresh id and `created_at = now`.
    async fn create(&self, task: NewTask) -> Result<Task, AppError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Task>, AppError>;

    /// All tasks owned by `user_id`, optionally narrowed to one status.
    /// No particular order is promised.
    async fn list_by_user(
        &self,
        user_id: i64,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, AppError>;

    /// Merges `changes` into task `id`. `AppError::NotFound` if it does not exist.
    async fn update(&self, id: i64, changes: TaskChanges) -> Result<Task, AppError>;

    /// Removes task `id`. Removing an absent id is a no-op.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
