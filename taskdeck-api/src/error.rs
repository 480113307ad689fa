/// Error handling for the API server
///
/// A unified error type that maps to HTTP responses. Handlers return
/// `Result<T, ApiError>`; the `IntoResponse` impl renders the uniform error
/// body `{"message": ..., "status": ..., "time": "yyyy-MM-dd HH:mm"}`.
/// Access-control failures (the middleware's 401s and the capability-check
/// 403s) use the boundary shape instead: message and status, no timestamp.
///
/// Mapping: NotFound → 404, validation → 400 with the field messages joined,
/// bad credentials → 401, insufficient role → 403, duplicate identity → 409,
/// anything unanticipated → 500 with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskdeck_shared::auth::{
    authorization::AuthzError, jwt::JwtError, password::PasswordError,
};
use taskdeck_shared::time_format;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Request validation failed (400) - one message per violated field
    ValidationFailure(Vec<String>),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g. duplicate email
    Conflict(String),

    /// Internal server error (500)
    Internal(String),
}

/// Uniform error response body
///
/// `time` is omitted for boundary (401/403) responses produced by the auth
/// middleware; every error rendered here includes it.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,

    /// HTTP status code, repeated in the body
    pub status: u16,

    /// When the error occurred, as `yyyy-MM-dd HH:mm`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationFailure(errors) => {
                write!(f, "Validation failed: {}", errors.join(","))
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ValidationFailure(errors) => (StatusCode::BAD_REQUEST, errors.join(",")),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => {
                // Log internal errors but never expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        // Capability denials are access-control boundary responses and carry
        // no timestamp, like the middleware's 401s
        let time = match status {
            StatusCode::FORBIDDEN => None,
            _ => Some(time_format::now_string()),
        };

        let body = Json(ErrorResponse {
            message,
            status: status.as_u16(),
            time,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique constraint violations are identity conflicts
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email already exists".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert request-validation errors to API errors
///
/// Flattens the per-field errors and keeps only the messages, which the
/// response body joins with "," into a single string.
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for field '{}'", field))
                })
            })
            .collect();

        ApiError::ValidationFailure(messages)
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::Internal(format!("Token creation failed: {}", msg)),
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            _ => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert authorization errors to API errors
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::InsufficientRole { .. } => {
                ApiError::Forbidden("Insufficient permissions".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::ValidationFailure(vec!["x".into()]),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_validation_messages_are_joined() {
        let err = ApiError::ValidationFailure(vec!["too short".into(), "not an email".into()]);
        assert_eq!(err.to_string(), "Validation failed: too short,not an email");
    }

    #[test]
    fn test_validation_errors_flattened() {
        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 5, message = "Title must be at least 5 characters"))]
            title: String,
        }

        let probe = Probe {
            title: "abc".to_string(),
        };
        let err: ApiError = probe.validate().unwrap_err().into();

        match err {
            ApiError::ValidationFailure(messages) => {
                assert_eq!(messages, vec!["Title must be at least 5 characters"]);
            }
            other => panic!("Expected ValidationFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorResponse {
            message: "Task with id 7 does not exist".to_string(),
            status: 404,
            time: Some("2024-03-07 09:05".to_string()),
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["message"], "Task with id 7 does not exist");
        assert_eq!(json["status"], 404);
        assert_eq!(json["time"], "2024-03-07 09:05");
    }

    #[tokio::test]
    async fn test_forbidden_response_has_no_timestamp() {
        let response = ApiError::Forbidden("Insufficient permissions".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["message"], "Insufficient permissions");
        assert_eq!(json["status"], 403);
        assert!(json.get("time").is_none());
    }

    #[tokio::test]
    async fn test_not_found_response_is_timestamped() {
        let response = ApiError::NotFound("Task with id 7 does not exist".to_string()).into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert!(json["time"].is_string());
    }

    #[test]
    fn test_error_body_omits_absent_time() {
        let body = ErrorResponse {
            message: "Missing credentials".to_string(),
            status: 401,
            time: None,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert!(json.get("time").is_none());
    }
}
