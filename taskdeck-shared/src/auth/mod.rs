/// Authentication and authorization
///
/// This module groups the security building blocks of Taskdeck:
///
/// - `jwt`: issuing and validating the signed session token
/// - `password`: Argon2id hashing and verification
/// - `authorization`: role model and capability checks
/// - `middleware`: axum middleware that turns a Bearer token into an `AuthContext`

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
