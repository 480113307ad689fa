/// Authentication middleware for axum
///
/// Extracts the Bearer token from the Authorization header, validates it, and
/// injects an [`AuthContext`] into request extensions for handlers to read.
///
/// Failures produced here are the access-control boundary's own responses:
/// a JSON body of `{"message": ..., "status": ...}` (no timestamp, unlike the
/// application error body).

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::authorization::Role;
use super::jwt::{validate_token, Claims, JwtError};

/// Authentication context added to request extensions
///
/// Handlers extract it with axum's `Extension` extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated subject (user email)
    pub email: String,

    /// Capability level carried in the token
    pub role: Role,
}

impl AuthContext {
    /// Builds the context from validated claims
    ///
    /// # Errors
    ///
    /// Fails if the role claim names no known role.
    pub fn from_claims(claims: &Claims) -> Result<Self, JwtError> {
        Ok(Self {
            email: claims.sub.clone(),
            role: claims.role()?,
        })
    }
}

/// Error type for the authentication boundary
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),
}

/// Boundary error body: message + status, no timestamp
#[derive(Debug, Serialize, Deserialize)]
pub struct BoundaryError {
    pub message: String,
    pub status: u16,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        let body = Json(BoundaryError {
            message,
            status: status.as_u16(),
        });

        (status, body).into_response()
    }
}

/// JWT authentication middleware
///
/// Validates the `Authorization: Bearer <token>` header and adds an
/// [`AuthContext`] extension on success.
///
/// # Errors
///
/// - 401 if the header is missing, the token is invalid or expired, or the
///   role claim is unknown
/// - 400 if the header is not a Bearer token
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    let auth_context = AuthContext::from_claims(&claims)
        .map_err(|e| AuthError::InvalidToken(format!("Invalid token: {}", e)))?;
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
