use crate::{
    auth::{authorize_owner, AuthenticatedUser},
    error::AppError,
    models::{TaskCreate, TaskListQuery, TaskUpdate},
    store,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

/// Retrieves the authenticated user's tasks in insertion order.
///
/// ## Query Parameters:
/// - `skip` (optional, default 0): offset into the owner's tasks.
/// - `limit` (optional, default 100): maximum number of tasks returned.
///
/// ## Responses:
/// - `200 OK`: a JSON array of tasks.
/// - `401 Unauthorized`: missing, invalid, or expired token.
/// - `403 Forbidden`: the path user id is not the authenticated user.
#[get("/{user_id}/tasks")]
pub async fn list_tasks(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    query: web::Query<TaskListQuery>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user_id = path.into_inner();
    authorize_owner(user_id, auth.0)?;

    let tasks = store::tasks::list(&pool, user_id, query.skip(), query.limit()).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves a single task by id.
///
/// ## Responses:
/// - `200 OK`: the task.
/// - `403 Forbidden`: the path user id is not the authenticated user. The
///   ownership check runs before the task lookup, so a non-owner gets 403
///   even for task ids that do not exist.
/// - `404 Not Found`: no such task for this owner.
#[get("/{user_id}/tasks/{task_id}")]
pub async fn get_task(
    pool: web::Data<SqlitePool>,
    path: web::Path<(i64, i64)>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    authorize_owner(user_id, auth.0)?;

    let task = store::tasks::get(&pool, user_id, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Creates a new task for the authenticated user.
///
/// ## Request Body:
/// `title` is required (1 to 255 characters); `description` (at most 1000
/// characters), `completed`, `priority` (low|medium|high, default medium),
/// `starred`, `tags` (at most 10) and `due_date` are optional.
///
/// ## Responses:
/// - `201 Created`: the persisted task.
/// - `400 Bad Request`: validation failure.
/// - `403 Forbidden`: the path user id is not the authenticated user.
#[post("/{user_id}/tasks")]
pub async fn create_task(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    task_data: web::Json<TaskCreate>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user_id = path.into_inner();
    authorize_owner(user_id, auth.0)?;

    task_data.validate()?;

    let task = store::tasks::create(&pool, user_id, &task_data).await?;

    Ok(HttpResponse::Created().json(task))
}

/// Updates an existing task.
///
/// The body is a partial update even though the method is PUT: only fields
/// explicitly provided are applied, and provided tags replace the stored
/// list wholesale.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: validation failure.
/// - `403 Forbidden`: the path user id is not the authenticated user.
/// - `404 Not Found`: no such task for this owner.
#[put("/{user_id}/tasks/{task_id}")]
pub async fn update_task(
    pool: web::Data<SqlitePool>,
    path: web::Path<(i64, i64)>,
    task_data: web::Json<TaskUpdate>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    authorize_owner(user_id, auth.0)?;

    task_data.validate()?;

    let task = store::tasks::update(&pool, user_id, task_id, &task_data)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Body for the completion toggle endpoint.
#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub completed: Option<bool>,
}

/// Sets a task's completion flag.
///
/// Only the `completed` field is applied here, whatever else the body
/// carries.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: `completed` omitted.
/// - `403 Forbidden`: the path user id is not the authenticated user.
/// - `404 Not Found`: no such task for this owner.
#[patch("/{user_id}/tasks/{task_id}/complete")]
pub async fn complete_task(
    pool: web::Data<SqlitePool>,
    path: web::Path<(i64, i64)>,
    body: web::Json<CompleteRequest>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    authorize_owner(user_id, auth.0)?;

    let completed = body
        .completed
        .ok_or_else(|| AppError::BadRequest("Completed field is required".into()))?;

    let changes = TaskUpdate {
        completed: Some(completed),
        ..TaskUpdate::default()
    };
    let task = store::tasks::update(&pool, user_id, task_id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `204 No Content`: the task existed and was removed.
/// - `403 Forbidden`: the path user id is not the authenticated user.
/// - `404 Not Found`: no such task for this owner (including a repeat
///   delete).
#[delete("/{user_id}/tasks/{task_id}")]
pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    path: web::Path<(i64, i64)>,
    auth: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    authorize_owner(user_id, auth.0)?;

    if !store::tasks::delete(&pool, user_id, task_id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
