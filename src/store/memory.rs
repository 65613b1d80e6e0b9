use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, TaskChanges, TaskStatus, User};

/// One table: rows keyed by id plus the counter that hands out the next id.
struct Table<T> {
    rows: HashMap<i64, T>,
    last_id: i64,
}

impl<T> Table<T> {
    fn new() -> Self {
        Self {
            rows: HashMap::new(),
            last_id: 0,
        }
    }

    /// Ids are never reused, even after the row holding one is deleted.
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Process-memory store. Volatile; everything is lost on restart.
///
/// Each table sits behind its own lock and every operation completes under a
/// single acquisition, so id assignment and insertion are atomic.
pub struct MemoryStore {
    users: Mutex<Table<User>>,
    tasks: Mutex<Table<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Table::new()),
            tasks: Mutex::new(Table::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock();
        if users.rows.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let id = users.next_id();
        let user = User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        };
        users.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock();
        Ok(users.rows.values().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().rows.get(&id).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create(&self, task: NewTask) -> Result<Task, AppError> {
        let mut tasks = self.tasks.lock();
        let id = tasks.next_id();
        let task = Task {
            id,
            title: task.title,
            description: task.description,
            status: task.status,
            user_id: task.user_id,
            created_at: Utc::now(),
        };
        tasks.rows.insert(id, task.clone());
        Ok(task)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.lock().rows.get(&id).cloned())
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.lock();
        Ok(tasks
            .rows
            .values()
            .filter(|t| t.user_id == user_id)
            .filter(|t| status.map_or(true, |s| t.status == s))
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, changes: TaskChanges) -> Result<Task, AppError> {
        let mut tasks = self.tasks.lock();
        let task = tasks
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
        task.apply(changes);
        Ok(task.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.tasks.lock().rows.remove(&id);
        Ok(())
    }
}
