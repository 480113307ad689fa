/// Authentication endpoints
///
/// - `POST /api/v1/auth/register` - register a new user, returns a token
/// - `POST /api/v1/auth/authenticate` - verify credentials, returns a token
///
/// Both responses carry a single `token` field. Registration hashes the
/// password with Argon2id before anything touches the store; authentication
/// delegates the match check to the Argon2 verifier (constant-time), and a
/// missing user and a wrong password produce the same 401 message so the
/// response does not reveal which one failed.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{authorization::Role, jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// First name
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Firstname must not be blank"))]
    pub firstname: String,

    /// Last name
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Lastname must not be blank"))]
    pub lastname: String,

    /// Email address
    #[serde(default)]
    #[validate(
        length(min = 5, max = 50, message = "Email must be between 5 and 50 characters"),
        email(message = "Email must be a valid address")
    )]
    pub email: String,

    /// Plaintext password; hashed before storage, never persisted as-is
    #[serde(default)]
    #[validate(length(min = 5, max = 50, message = "Password must be between 5 and 50 characters"))]
    pub password: String,

    /// Capability level for the new account
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

/// Authenticate request
#[derive(Debug, Deserialize, Validate)]
pub struct AuthRequest {
    /// Email address
    #[serde(default)]
    #[validate(
        length(min = 5, max = 50, message = "Email must be between 5 and 50 characters"),
        email(message = "Email must be a valid address")
    )]
    pub email: String,

    /// Plaintext password
    #[serde(default)]
    #[validate(length(min = 5, max = 50, message = "Password must be between 5 and 50 characters"))]
    pub password: String,
}

/// Token response for both auth endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed session token
    pub token: String,
}

/// Register a new user
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    // The store's UNIQUE constraint on email surfaces duplicates as 409
    let user = User::create(
        &state.db,
        CreateUser {
            firstname: req.firstname,
            lastname: req.lastname,
            email: req.email,
            password_hash,
            role: req.role.as_str().to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Registered new user");

    let claims = jwt::Claims::new(&user.email, req.role, state.token_ttl());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(AuthResponse { token }))
}

/// Authenticate an existing user
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `401 Unauthorized`: unknown email or wrong password
pub async fn authenticate(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let role = Role::from_str(&user.role)
        .ok_or_else(|| ApiError::Internal(format!("Unknown stored role: {}", user.role)))?;

    let claims = jwt::Claims::new(&user.email, role, state.token_ttl());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(AuthResponse { token }))
}
