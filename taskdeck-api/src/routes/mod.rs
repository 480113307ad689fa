/// API route handlers
///
/// - `health`: health check endpoint
/// - `auth`: registration and authentication
/// - `tasks`: task CRUD with pagination and partial update

pub mod auth;
pub mod health;
pub mod tasks;
