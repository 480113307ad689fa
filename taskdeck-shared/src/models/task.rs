/// Task model and database operations
///
/// A task is a work item with a title, description, free-form status string,
/// and creation/update timestamps. The store assigns the numeric id on insert
/// and it is immutable afterwards. `created_at` is set once; `updated_at` is
/// set at creation and bumped on every mutation.
///
/// # Partial updates
///
/// Updates use an explicit present/absent structure, [`TaskPatch`]: a `None`
/// field means "leave unchanged", a `Some` value overwrites, and an empty
/// string is a value like any other. The update is issued as a single UPDATE
/// statement with a dynamically-built SET list, so the read-modify-write is
/// one transaction boundary. Concurrent updates to the same id are
/// last-writer-wins.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description VARCHAR(255) NOT NULL,
///     status VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{CreateTask, Task, TaskPatch};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     title: "Write the report".to_string(),
///     description: "Quarterly numbers for finance".to_string(),
///     status: Some("In progress".to_string()),
/// }).await?;
///
/// // Change only the status; title and description stay untouched.
/// let patch = TaskPatch {
///     status: Some("Done".to_string()),
///     ..Default::default()
/// };
/// Task::update(&pool, task.id, patch).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::page::Page;
use crate::time_format;

/// Task model representing a work item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Store-assigned numeric id, immutable after creation
    pub id: i64,

    /// Title (5-255 chars, never empty once created)
    pub title: String,

    /// Description (5-255 chars, never empty once created)
    pub description: String,

    /// Free-form status string; no enumerated set is enforced
    pub status: Option<String>,

    /// Set once at creation, never changed
    #[serde(rename = "createdAt", with = "time_format")]
    pub created_at: DateTime<Utc>,

    /// Set at creation and on every mutation
    #[serde(rename = "updatedAt", with = "time_format")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Title (required)
    pub title: String,

    /// Description (required)
    pub description: String,

    /// Initial status, if any
    pub status: Option<String>,
}

/// Partial update for a task
///
/// `None` = leave the stored field unchanged; `Some` = overwrite it. The
/// all-`None` patch is a no-op except for `updated_at`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title, if present
    pub title: Option<String>,

    /// New description, if present
    pub description: Option<String>,

    /// New status, if present
    pub status: Option<String>,
}

/// Offset for a zero-based page; saturates instead of overflowing for
/// pathological page numbers
fn page_offset(number: i64, size: i64) -> i64 {
    number.saturating_mul(size)
}

impl Task {
    /// Creates a new task; the store assigns id and both timestamps
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Applies a partial update to a task
    ///
    /// Only the fields present in `patch` are written; `updated_at` is always
    /// bumped, including for the all-`None` patch. Returns `None` (and writes
    /// nothing) when no task with `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        patch: TaskPatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the SET list from the fields that are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if patch.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if patch.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if patch.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, status, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = patch.title {
            q = q.bind(title);
        }
        if let Some(description) = patch.description {
            q = q.bind(description);
        }
        if let Some(status) = patch.status {
            q = q.bind(status);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task; `false` if no such task existed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists tasks in primary-key order with pagination
    ///
    /// `number` is the zero-based page; the offset is `number * size`.
    pub async fn list(pool: &PgPool, number: i64, size: i64) -> Result<Page<Self>, sqlx::Error> {
        let content = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, created_at, updated_at
            FROM tasks
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(size)
        .bind(page_offset(number, size))
        .fetch_all(pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(Page::new(content, total, number, size))
    }

    /// Lists tasks whose status equals `status` exactly (case-sensitive)
    pub async fn list_by_status(
        pool: &PgPool,
        status: &str,
        number: i64,
        size: i64,
    ) -> Result<Page<Self>, sqlx::Error> {
        let content = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, status, created_at, updated_at
            FROM tasks
            WHERE status = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(size)
        .bind(page_offset(number, size))
        .fetch_all(pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE status = $1")
            .bind(status)
            .fetch_one(pool)
            .await?;

        Ok(Page::new(content, total, number, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_patch_default_is_all_absent() {
        let patch = TaskPatch::default();
        assert!(patch.title.is_none());
        assert!(patch.description.is_none());
        assert!(patch.status.is_none());
    }

    #[test]
    fn test_patch_null_and_absent_both_mean_unchanged() {
        let patch: TaskPatch = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert!(patch.title.is_none());

        let patch: TaskPatch = serde_json::from_str(r#"{}"#).unwrap();
        assert!(patch.title.is_none());
        assert!(patch.description.is_none());
        assert!(patch.status.is_none());
    }

    #[test]
    fn test_patch_empty_string_is_a_value() {
        // An empty string is an overwrite, not "leave unchanged"
        let patch: TaskPatch = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some(""));
    }

    #[test]
    fn test_task_serializes_timestamps_minute_precision() {
        let at = Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(2024, 3, 7)
                .unwrap()
                .and_hms_opt(9, 5, 42)
                .unwrap(),
        );
        let task = Task {
            id: 1,
            title: "Write the report".to_string(),
            description: "Quarterly numbers".to_string(),
            status: Some("In progress".to_string()),
            created_at: at,
            updated_at: at,
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["createdAt"], "2024-03-07 09:05");
        assert_eq!(json["updatedAt"], "2024-03-07 09:05");
        assert_eq!(json["status"], "In progress");
    }

    #[test]
    fn test_page_offset_saturates() {
        assert_eq!(page_offset(0, 3), 0);
        assert_eq!(page_offset(2, 3), 6);
        assert_eq!(page_offset(i64::MAX, 3), i64::MAX);
        assert_eq!(page_offset(i64::MAX, i64::MAX), i64::MAX);
    }

    // Database-backed behavior (create/update/delete/list against Postgres)
    // is covered by tests/task_store_tests.rs when DATABASE_URL points at a
    // live instance.
}
