/// Task CRUD endpoints
///
/// All routes live under `/api/v1/tasks` and sit behind the Bearer-token
/// middleware, which injects an [`AuthContext`] extension. List endpoints
/// paginate with the `numberPage`/`sizePage` query parameters (defaults 0
/// and 3). Update is a partial update: absent and `null` fields both mean
/// "leave unchanged". Delete additionally requires the admin capability.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use taskdeck_shared::{
    auth::{
        authorization::{require_role, Role},
        middleware::AuthContext,
    },
    models::{
        page::Page,
        task::{CreateTask, Task, TaskPatch},
    },
};
use validator::Validate;

/// Pagination query parameters
///
/// `numberPage` is the zero-based page index, `sizePage` the page length.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    /// Zero-based page index
    #[serde(rename = "numberPage", default)]
    pub number_page: i64,

    /// Page length
    #[serde(rename = "sizePage", default = "default_size_page")]
    pub size_page: i64,
}

fn default_size_page() -> i64 {
    3
}

impl PageParams {
    /// Rejects negative page indexes and non-positive page sizes
    fn check(&self) -> ApiResult<()> {
        if self.number_page < 0 {
            return Err(ApiError::BadRequest(
                "numberPage must not be negative".to_string(),
            ));
        }
        if self.size_page < 1 {
            return Err(ApiError::BadRequest(
                "sizePage must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Create task request
///
/// Missing fields deserialize to the empty string and then fail the length
/// checks, so the client sees a 400 with field messages rather than a
/// deserialization error.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title (required)
    #[serde(default)]
    #[validate(length(min = 5, max = 255, message = "Title must be between 5 and 255 characters"))]
    pub title: String,

    /// Description (required)
    #[serde(default)]
    #[validate(length(
        min = 5,
        max = 255,
        message = "Description must be between 5 and 255 characters"
    ))]
    pub description: String,

    /// Initial status, if any
    pub status: Option<String>,
}

/// Update task request
///
/// Every field is optional; present fields must still satisfy the length
/// bounds. An empty string fails validation rather than clearing the field.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title, if present
    #[validate(length(min = 5, max = 255, message = "Title must be between 5 and 255 characters"))]
    pub title: Option<String>,

    /// New description, if present
    #[validate(length(
        min = 5,
        max = 255,
        message = "Description must be between 5 and 255 characters"
    ))]
    pub description: Option<String>,

    /// New status, if present
    pub status: Option<String>,
}

/// `GET /api/v1/tasks` - paginated task list in insertion order
pub async fn find_all(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Page<Task>>> {
    params.check()?;

    let page = Task::list(&state.db, params.number_page, params.size_page).await?;

    Ok(Json(page))
}

/// `GET /api/v1/tasks/:id` - single task lookup
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task with id {} does not exist", id)))?;

    Ok(Json(task))
}

/// `GET /api/v1/tasks/status/:status` - paginated list filtered by status
///
/// The match is exact and case-sensitive; an unknown status yields an empty
/// page, not a 404.
pub async fn find_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Page<Task>>> {
    params.check()?;

    let page =
        Task::list_by_status(&state.db, &status, params.number_page, params.size_page).await?;

    Ok(Json(page))
}

/// `POST /api/v1/tasks` - create a task
///
/// Responds 201 with the created task and a Location header pointing at it.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            status: req.status,
        },
    )
    .await?;

    tracing::info!(task_id = task.id, "Created task");

    let location = format!("/api/v1/tasks/{}", task.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(task),
    ))
}

/// `PUT /api/v1/tasks/:id` - partial update
///
/// Absent and `null` fields are left unchanged; present fields overwrite.
/// Responds 204 on success.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<StatusCode> {
    req.validate()?;

    let patch = TaskPatch {
        title: req.title,
        description: req.description,
        status: req.status,
    };

    Task::update(&state.db, id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task with id {} does not exist", id)))?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/v1/tasks/:id` - delete a task (admin only)
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    require_role(&auth, Role::Admin)?;

    let deleted = Task::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!(
            "Task with id {} does not exist",
            id
        )));
    }

    tracing::info!(task_id = id, deleted_by = %auth.email, "Deleted task");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_defaults() {
        let params: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.number_page, 0);
        assert_eq!(params.size_page, 3);
    }

    #[test]
    fn test_page_params_renamed_keys() {
        let params: PageParams =
            serde_json::from_str(r#"{"numberPage": 2, "sizePage": 10}"#).unwrap();
        assert_eq!(params.number_page, 2);
        assert_eq!(params.size_page, 10);
    }

    #[test]
    fn test_page_params_rejects_bad_values() {
        let params = PageParams {
            number_page: -1,
            size_page: 3,
        };
        assert!(params.check().is_err());

        let params = PageParams {
            number_page: 0,
            size_page: 0,
        };
        assert!(params.check().is_err());
    }

    #[test]
    fn test_create_request_missing_fields_fail_validation() {
        // An empty body deserializes (fields default to "") but fails the
        // length checks, producing a 400 instead of a deserialization error.
        let req: CreateTaskRequest = serde_json::from_str("{}").unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn test_create_request_bounds() {
        let req = CreateTaskRequest {
            title: "Write the report".to_string(),
            description: "Quarterly numbers".to_string(),
            status: None,
        };
        assert!(req.validate().is_ok());

        let req = CreateTaskRequest {
            title: "abcd".to_string(), // 4 chars
            description: "Quarterly numbers".to_string(),
            status: None,
        };
        assert!(req.validate().is_err());

        let req = CreateTaskRequest {
            title: "x".repeat(256),
            description: "Quarterly numbers".to_string(),
            status: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_request_absent_fields_pass_validation() {
        let req: UpdateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());
        assert!(req.title.is_none());
        assert!(req.description.is_none());
    }

    #[test]
    fn test_update_request_present_fields_are_checked() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"title": "abc"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"title": "A longer title"}"#).unwrap();
        assert!(req.validate().is_ok());
    }
}
