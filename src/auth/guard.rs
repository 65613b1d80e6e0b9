//! Ownership checks in front of every by-id task operation.

use crate::error::AppError;
use crate::models::Task;
use crate::store::TaskStore;

/// Loads task `task_id` on behalf of `user_id`.
///
/// `NotFound` if there is no such task, `Forbidden` if it belongs to someone
/// else. The two are deliberately distinguishable. Only an `Ok` lets the
/// caller go on to read, update or delete.
pub async fn authorize_task(
    tasks: &dyn TaskStore,
    task_id: i64,
    user_id: i64,
) -> Result<Task, AppError> {
    let task = tasks
        .get_by_id(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if task.user_id != user_id {
        log::warn!(
            "User {} attempted to access task {} owned by another user",
            user_id,
            task_id
        );
        return Err(AppError::Forbidden(
            "You do not have access to this task".into(),
        ));
    }
    Ok(task)
}
