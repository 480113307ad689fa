/// JWT token generation and validation module
///
/// This module implements the Taskdeck session token: a signed, self-contained
/// credential asserting a subject (the user's email) and an expiration instant.
/// Tokens are signed with HS256 (HMAC-SHA256) using a process-wide secret that
/// is loaded once at startup and never mutated. Tokens are never persisted and
/// never revoked early; validity is reconstructible from the signature alone.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: configurable validity window (`JWT_TTL_MINUTES`)
/// - **Validation**: signature, expiration, and issuer checks
/// - **Secret Management**: secrets should be at least 32 bytes (256 bits)
///
/// Routine invalidity (expired token, wrong subject, bad signature) is a
/// boolean result from [`is_valid`], not an error. Only structurally broken
/// input surfaces as [`JwtError`].
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::authorization::Role;
/// use taskdeck_shared::auth::jwt::{create_token, is_valid, Claims};
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-test-secret-that-is-at-least-32-bytes";
/// let claims = Claims::new("user@example.com", Role::User, Duration::minutes(60));
/// let token = create_token(&claims, secret)?;
///
/// assert!(is_valid(&token, "user@example.com", secret));
/// assert!(!is_valid(&token, "someone-else@example.com", secret));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::authorization::Role;

/// Issuer claim embedded in every token
const ISSUER: &str = "taskdeck";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Role claim does not name a known role
    #[error("Unknown role claim: {0}")]
    UnknownRole(String),
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (the user's email)
/// - `iss`: Issuer (always "taskdeck")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
///
/// # Custom Claims
///
/// - `role`: the user's capability level, so authorization checks need no
///   store round-trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user email
    pub sub: String,

    /// Issuer - always "taskdeck"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Role (custom claim)
    pub role: String,
}

impl Claims {
    /// Creates claims for a subject, expiring after `ttl`
    ///
    /// The validity window is a configuration value; callers pass
    /// `Duration::minutes(config.jwt.ttl_minutes)`.
    pub fn new(subject: impl Into<String>, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + ttl;

        Self {
            sub: subject.into(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            role: role.as_str().to_string(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Parses the role claim
    ///
    /// # Errors
    ///
    /// Returns `JwtError::UnknownRole` if the claim does not name a known
    /// role. Unknown roles are rejected rather than downgraded.
    pub fn role(&self) -> Result<Role, JwtError> {
        Role::from_str(&self.role).ok_or_else(|| JwtError::UnknownRole(self.role.clone()))
    }
}

/// Creates a signed token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the signature, the expiration instant, and the issuer.
///
/// # Errors
///
/// - `JwtError::Expired` if the current time is past `exp`
/// - `JwtError::ValidationError` for a bad signature or malformed token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Checks whether a token is valid for an expected subject
///
/// Fails closed: returns `false` if the signature is invalid, the token is
/// malformed or expired, or the embedded subject does not match. This is the
/// routine check; it never errors.
pub fn is_valid(token: &str, expected_subject: &str, secret: &str) -> bool {
    match validate_token(token, secret) {
        Ok(claims) => claims.sub == expected_subject,
        Err(_) => false,
    }
}

/// Extracts the subject of a token
///
/// # Errors
///
/// Fails if the token is malformed, incorrectly signed, or expired.
pub fn subject_of(token: &str, secret: &str) -> Result<String, JwtError> {
    Ok(validate_token(token, secret)?.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("user@example.com", Role::Admin, Duration::minutes(60));

        assert_eq!(claims.sub, "user@example.com");
        assert_eq!(claims.iss, "taskdeck");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.role().unwrap(), Role::Admin);
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = Claims::new("user@example.com", Role::User, Duration::minutes(60));
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, "user@example.com");
        assert_eq!(validated.iss, "taskdeck");
        assert_eq!(validated.role().unwrap(), Role::User);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new("user@example.com", Role::User, Duration::minutes(60));
        let token = create_token(&claims, SECRET).expect("Should create token");

        assert!(validate_token(&token, "wrong-secret-also-32-bytes-long!!").is_err());
        assert!(!is_valid(&token, "user@example.com", "wrong-secret-also-32-bytes-long!!"));
    }

    #[test]
    fn test_validate_expired_token() {
        // Negative ttl = already expired
        let claims = Claims::new("user@example.com", Role::User, Duration::minutes(-60));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
        assert!(!is_valid(&token, "user@example.com", SECRET));
    }

    #[test]
    fn test_is_valid_subject_mismatch() {
        let claims = Claims::new("user@example.com", Role::User, Duration::minutes(60));
        let token = create_token(&claims, SECRET).unwrap();

        assert!(is_valid(&token, "user@example.com", SECRET));
        assert!(!is_valid(&token, "other@example.com", SECRET));
    }

    #[test]
    fn test_is_valid_never_errors_on_garbage() {
        assert!(!is_valid("not-a-token", "user@example.com", SECRET));
        assert!(!is_valid("", "user@example.com", SECRET));
        assert!(!is_valid("a.b.c", "user@example.com", SECRET));
    }

    #[test]
    fn test_subject_of() {
        let claims = Claims::new("user@example.com", Role::User, Duration::minutes(60));
        let token = create_token(&claims, SECRET).unwrap();

        assert_eq!(subject_of(&token, SECRET).unwrap(), "user@example.com");
        assert!(subject_of("garbage", SECRET).is_err());
    }

    #[test]
    fn test_unknown_role_claim_rejected() {
        let mut claims = Claims::new("user@example.com", Role::User, Duration::minutes(60));
        claims.role = "superuser".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        let validated = validate_token(&token, SECRET).unwrap();
        assert!(matches!(validated.role(), Err(JwtError::UnknownRole(_))));
    }
}
