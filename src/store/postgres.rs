use async_trait::async_trait;
use sqlx::PgPool;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, TaskChanges, TaskStatus, User};

const TASK_COLUMNS: &str = "id, title, description, status, user_id, created_at";

/// Postgres-backed store. The schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and brings the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Migration failed: {}", e)))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3)
             RETURNING id, name, email, password_hash",
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("Email already registered".into()),
            other => other,
        })
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create(&self, task: NewTask) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (title, description, status, user_id) VALUES ($1, $2, $3, $4)
             RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task.title)
            .bind(task.description)
            .bind(task.status)
            .bind(task.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {} FROM tasks WHERE user_id = $1 AND status = $2",
                    TASK_COLUMNS
                );
                sqlx::query_as::<_, Task>(&sql)
                    .bind(user_id)
                    .bind(status)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT {} FROM tasks WHERE user_id = $1", TASK_COLUMNS);
                sqlx::query_as::<_, Task>(&sql)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(tasks)
    }

    async fn update(&self, id: i64, changes: TaskChanges) -> Result<Task, AppError> {
        // COALESCE keeps the stored value for every field the caller left out.
        let sql = format!(
            "UPDATE tasks
             SET title = COALESCE($1, title),
                 description = COALESCE($2, description),
                 status = COALESCE($3, status)
             WHERE id = $4
             RETURNING {}",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.status)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
