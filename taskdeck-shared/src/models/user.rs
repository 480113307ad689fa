/// User model and database operations
///
/// Identity records behind registration and login. A user is created once at
/// registration and is immutable afterwards (password reset is not
/// implemented). Passwords are stored only as Argon2id hashes.
///
/// Email uniqueness is enforced by the store (UNIQUE constraint); a duplicate
/// insert surfaces as a constraint-violation error that the API layer maps to
/// a conflict response.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     firstname VARCHAR(255) NOT NULL,
///     lastname VARCHAR(255) NOT NULL,
///     email VARCHAR(50) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role VARCHAR(50) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User model representing an identity record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Store-assigned numeric id
    pub id: i64,

    /// First name
    pub firstname: String,

    /// Last name
    pub lastname: String,

    /// Email address; unique, used as the token subject
    pub email: String,

    /// Argon2id password hash, never plaintext
    pub password_hash: String,

    /// Role string ("user" or "admin"); parsed via `Role::from_str`
    pub role: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub firstname: String,
    pub lastname: String,
    pub email: String,

    /// Argon2id hash (NOT the plaintext password)
    pub password_hash: String,

    pub role: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Fails with a database constraint violation if the email already
    /// exists.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (firstname, lastname, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, firstname, lastname, email, password_hash, role, created_at
            "#,
        )
        .bind(data.firstname)
        .bind(data.lastname)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, firstname, lastname, email, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
