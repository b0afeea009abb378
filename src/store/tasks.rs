//! Task store: owner-keyed filtered CRUD.
//!
//! Every query here is scoped by `owner_id`; a task that exists but belongs
//! to a different owner is indistinguishable from one that does not exist.
//! Ownership of the *request* (path owner vs authenticated subject) is
//! enforced earlier by the authorization gate, before this module is
//! reached.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::task::{encode_tags, parse_due_date};
use crate::models::{Task, TaskCreate, TaskRow, TaskUpdate};

const TASK_COLUMNS: &str =
    "id, title, description, completed, priority, starred, tags, due_date, owner_id, \
     created_at, updated_at";

/// Inserts a new task for `owner_id` and returns the persisted record.
///
/// Defaults applied here: priority medium, completed and starred false, tags
/// empty. An unparsable `due_date` is silently dropped rather than rejected
/// (documented API quirk).
pub async fn create(
    pool: &SqlitePool,
    owner_id: i64,
    input: &TaskCreate,
) -> Result<Task, AppError> {
    let now = Utc::now();
    let tags = encode_tags(input.tags.as_deref().unwrap_or(&[]));
    let due_date = input.due_date.as_deref().and_then(parse_due_date);

    let row = sqlx::query_as::<_, TaskRow>(&format!(
        "INSERT INTO tasks (title, description, completed, priority, starred, tags, due_date, \
         owner_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.completed)
    .bind(input.priority.unwrap_or_default())
    .bind(input.starred)
    .bind(tags)
    .bind(due_date)
    .bind(owner_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Lists tasks owned by `owner_id` in insertion order, sliced by
/// offset/limit.
pub async fn list(
    pool: &SqlitePool,
    owner_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<Task>, AppError> {
    let rows = sqlx::query_as::<_, TaskRow>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = ? ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(owner_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Task::from).collect())
}

async fn get_row(
    pool: &SqlitePool,
    owner_id: i64,
    task_id: i64,
) -> Result<Option<TaskRow>, AppError> {
    let row = sqlx::query_as::<_, TaskRow>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ? AND owner_id = ?"
    ))
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Fetches a single task. Returns `None` when the task does not exist or
/// belongs to a different owner; the caller cannot tell which.
pub async fn get(
    pool: &SqlitePool,
    owner_id: i64,
    task_id: i64,
) -> Result<Option<Task>, AppError> {
    Ok(get_row(pool, owner_id, task_id).await?.map(Task::from))
}

/// Applies a partial update to a task.
///
/// Only fields present in `changes` overwrite the stored values; tags
/// provided replace the stored list wholesale; an unparsable `due_date`
/// skips that field. Returns `None` when the task is not found for this
/// owner. Concurrent updates race with last-write-wins: there is no
/// optimistic concurrency token in this design.
pub async fn update(
    pool: &SqlitePool,
    owner_id: i64,
    task_id: i64,
    changes: &TaskUpdate,
) -> Result<Option<Task>, AppError> {
    let existing = match get_row(pool, owner_id, task_id).await? {
        Some(row) => row,
        None => return Ok(None),
    };

    let title = changes.title.clone().unwrap_or(existing.title);
    let description = changes.description.clone().or(existing.description);
    let completed = changes.completed.unwrap_or(existing.completed);
    let priority = changes.priority.unwrap_or(existing.priority);
    let starred = changes.starred.unwrap_or(existing.starred);
    let tags = match &changes.tags {
        Some(tags) => encode_tags(tags),
        None => existing.tags,
    };
    let due_date = changes
        .due_date
        .as_deref()
        .and_then(parse_due_date)
        .or(existing.due_date);

    let row = sqlx::query_as::<_, TaskRow>(&format!(
        "UPDATE tasks
         SET title = ?, description = ?, completed = ?, priority = ?, starred = ?, tags = ?, \
         due_date = ?, updated_at = ?
         WHERE id = ? AND owner_id = ?
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(title)
    .bind(description)
    .bind(completed)
    .bind(priority)
    .bind(starred)
    .bind(tags)
    .bind(due_date)
    .bind(Utc::now())
    .bind(task_id)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    Ok(Some(row.into()))
}

/// Deletes a task. Returns true iff a row existed for this owner and was
/// removed.
pub async fn delete(pool: &SqlitePool, owner_id: i64, task_id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND owner_id = ?")
        .bind(task_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::TaskPriority;
    use pretty_assertions::assert_eq;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_schema(&pool).await.unwrap();
        pool
    }

    async fn test_user(pool: &SqlitePool, email: &str) -> i64 {
        crate::store::users::create(pool, email, "Test User", "not-a-real-hash")
            .await
            .unwrap()
            .id
    }

    fn minimal_create(title: &str) -> TaskCreate {
        TaskCreate {
            title: title.to_string(),
            description: None,
            completed: false,
            priority: None,
            starred: false,
            tags: None,
            due_date: None,
        }
    }

    #[actix_rt::test]
    async fn test_create_applies_defaults() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "owner@example.com").await;

        let task = create(&pool, owner, &minimal_create("buy milk")).await.unwrap();

        assert_eq!(task.title, "buy milk");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(!task.completed);
        assert!(!task.starred);
        assert!(task.tags.is_empty());
        assert!(task.due_date.is_none());
        assert_eq!(task.owner_id, owner);
    }

    #[actix_rt::test]
    async fn test_tags_round_trip_in_order() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "owner@example.com").await;

        let mut input = minimal_create("tagged");
        input.tags = Some(vec!["a".to_string(), "b".to_string()]);
        let task = create(&pool, owner, &input).await.unwrap();

        let fetched = get(&pool, owner, task.id).await.unwrap().unwrap();
        assert_eq!(fetched.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[actix_rt::test]
    async fn test_unparsable_due_date_is_dropped() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "owner@example.com").await;

        let mut input = minimal_create("dated");
        input.due_date = Some("not-a-timestamp".to_string());
        let task = create(&pool, owner, &input).await.unwrap();
        assert!(task.due_date.is_none());

        let mut input = minimal_create("dated2");
        input.due_date = Some("2026-03-01T09:00:00Z".to_string());
        let task = create(&pool, owner, &input).await.unwrap();
        assert!(task.due_date.is_some());
    }

    #[actix_rt::test]
    async fn test_get_scopes_by_owner() {
        let pool = test_pool().await;
        let alice = test_user(&pool, "alice@example.com").await;
        let bob = test_user(&pool, "bob@example.com").await;

        let task = create(&pool, alice, &minimal_create("alice's task"))
            .await
            .unwrap();

        assert!(get(&pool, alice, task.id).await.unwrap().is_some());
        // Bob cannot see it, and cannot tell it exists at all.
        assert!(get(&pool, bob, task.id).await.unwrap().is_none());
        assert!(update(&pool, bob, task.id, &TaskUpdate::default())
            .await
            .unwrap()
            .is_none());
        assert!(!delete(&pool, bob, task.id).await.unwrap());
    }

    #[actix_rt::test]
    async fn test_list_insertion_order_and_slicing() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "owner@example.com").await;

        for i in 0..5 {
            create(&pool, owner, &minimal_create(&format!("task {}", i)))
                .await
                .unwrap();
        }

        let all = list(&pool, owner, 0, 100).await.unwrap();
        let titles: Vec<_> = all.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["task 0", "task 1", "task 2", "task 3", "task 4"]);

        let page = list(&pool, owner, 2, 2).await.unwrap();
        let titles: Vec<_> = page.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["task 2", "task 3"]);

        let other = test_user(&pool, "other@example.com").await;
        assert!(list(&pool, other, 0, 100).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_partial_update_leaves_other_fields() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "owner@example.com").await;

        let mut input = minimal_create("original title");
        input.description = Some("original description".to_string());
        input.priority = Some(TaskPriority::High);
        let task = create(&pool, owner, &input).await.unwrap();

        let changes = TaskUpdate {
            completed: Some(true),
            ..TaskUpdate::default()
        };
        let updated = update(&pool, owner, task.id, &changes)
            .await
            .unwrap()
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, "original title");
        assert_eq!(updated.description.as_deref(), Some("original description"));
        assert_eq!(updated.priority, TaskPriority::High);
    }

    #[actix_rt::test]
    async fn test_update_replaces_tags_wholesale() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "owner@example.com").await;

        let mut input = minimal_create("tagged");
        input.tags = Some(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        let task = create(&pool, owner, &input).await.unwrap();

        let changes = TaskUpdate {
            tags: Some(vec!["z".to_string()]),
            ..TaskUpdate::default()
        };
        let updated = update(&pool, owner, task.id, &changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.tags, vec!["z".to_string()]);
    }

    #[actix_rt::test]
    async fn test_update_skips_unparsable_due_date() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "owner@example.com").await;

        let mut input = minimal_create("dated");
        input.due_date = Some("2026-03-01T09:00:00Z".to_string());
        let task = create(&pool, owner, &input).await.unwrap();
        let stored = task.due_date.unwrap();

        let changes = TaskUpdate {
            due_date: Some("garbage".to_string()),
            ..TaskUpdate::default()
        };
        let updated = update(&pool, owner, task.id, &changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.due_date.unwrap(), stored);
    }

    #[actix_rt::test]
    async fn test_delete_is_idempotent() {
        let pool = test_pool().await;
        let owner = test_user(&pool, "owner@example.com").await;

        let task = create(&pool, owner, &minimal_create("ephemeral"))
            .await
            .unwrap();

        assert!(delete(&pool, owner, task.id).await.unwrap());
        assert!(!delete(&pool, owner, task.id).await.unwrap());
        assert!(get(&pool, owner, task.id).await.unwrap().is_none());
    }
}
