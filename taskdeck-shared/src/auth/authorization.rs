/// Role model and capability checks
///
/// Taskdeck uses a flat two-level role model. Every registered user carries a
/// role; the boundary layer invokes [`require_role`] before dispatching to a
/// handler that needs elevated capability. An explicit check function is used
/// instead of per-route annotations so the allow/deny decision is a plain,
/// testable function of (subject, required role).

use serde::{Deserialize, Serialize};

use super::middleware::AuthContext;

/// Capability level assigned to a user at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user: full CRUD on tasks except deletion
    User,

    /// Administrator: everything, including task deletion
    Admin,
}

impl Role {
    /// Role as stored in the users table and in the token claim
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parses a stored role string; `None` for anything unknown
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Subject does not hold the required role
    #[error("Insufficient permissions: requires {required:?}, has {actual:?}")]
    InsufficientRole { required: Role, actual: Role },
}

/// Checks that the authenticated subject holds at least `required`
///
/// Roles are ordered (`Admin` > `User`), so an admin passes every check.
///
/// # Errors
///
/// Returns `AuthzError::InsufficientRole` on deny.
pub fn require_role(auth: &AuthContext, required: Role) -> Result<(), AuthzError> {
    if auth.role >= required {
        Ok(())
    } else {
        Err(AuthzError::InsufficientRole {
            required,
            actual: auth.role,
        })
    }
}
