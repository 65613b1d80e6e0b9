use crate::{
    auth::{authorize_task, AuthenticatedUser},
    error::AppError,
    models::{CreateTaskInput, NewTask, TaskQuery, UpdateTaskInput},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Retrieves the authenticated user's tasks.
///
/// The store gives no ordering, so the list is sorted by id (creation order)
/// here before it is returned.
///
/// ## Query Parameters:
/// - `status` (optional): `pending` or `completed`.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task`, only the caller's.
/// - `400 Bad Request`: unknown `status` value.
/// - `401 Unauthorized`: no valid session.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let mut tasks = state
        .tasks
        .list_by_user(user.user_id(), query_params.status)
        .await?;
    tasks.sort_by_key(|task| task.id);

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// The owner always comes from the session; the body cannot name one.
///
/// ## Request Body:
/// - `title`: required, 1 to 200 characters.
/// - `description` (optional): at most 1000 characters.
/// - `status` (optional): defaults to `pending`.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: body malformed or fails validation.
/// - `401 Unauthorized`: no valid session.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_data: web::Json<CreateTaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state
        .tasks
        .create(NewTask::new(task_data.into_inner(), user.user_id()))
        .await?;

    log::debug!("User {} created task {}", task.user_id, task.id);
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one task.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `400 Bad Request`: non-numeric id.
/// - `401 Unauthorized`: no valid session.
/// - `403 Forbidden`: the task belongs to another user.
/// - `404 Not Found`: no such task.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task_id = parse_task_id(&task_id)?;
    let task = authorize_task(state.tasks.as_ref(), task_id, user.user_id()).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Updates a task the caller owns. Fields left out of the body keep their
/// current values.
///
/// ## Request Body:
/// Any of `title`, `description`, `status`, with the same limits as creation.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: non-numeric id, malformed body or failed validation.
/// - `401 Unauthorized`: no valid session.
/// - `403 Forbidden`: the task belongs to another user.
/// - `404 Not Found`: no such task.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
    task_data: web::Json<UpdateTaskInput>,
) -> Result<impl Responder, AppError> {
    let task_id = parse_task_id(&task_id)?;
    task_data.validate()?;

    authorize_task(state.tasks.as_ref(), task_id, user.user_id()).await?;
    let task = state
        .tasks
        .update(task_id, task_data.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task the caller owns.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `400 Bad Request`: non-numeric id.
/// - `401 Unauthorized`: no valid session.
/// - `403 Forbidden`: the task belongs to another user.
/// - `404 Not Found`: no such task, including one already deleted.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task_id = parse_task_id(&task_id)?;
    authorize_task(state.tasks.as_ref(), task_id, user.user_id()).await?;
    state.tasks.delete(task_id).await?;

    log::debug!("User {} deleted task {}", user.user_id(), task_id);
    Ok(HttpResponse::NoContent().finish())
}

fn parse_task_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid task id: {}", raw)))
}
