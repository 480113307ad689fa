//! # Taskdeck Shared Library
//!
//! This crate contains the types and business logic shared between the
//! Taskdeck API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, tasks) and pagination
//! - `auth`: Token issuance/validation, password hashing, role checks
//! - `db`: Connection pool and migration runner
//! - `time_format`: The `yyyy-MM-dd HH:mm` timestamp convention used on the wire

pub mod auth;
pub mod db;
pub mod models;
pub mod time_format;

/// Current version of the Taskdeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
