/// Database models for Taskdeck
///
/// # Models
///
/// - `user`: identity records backing registration and login
/// - `task`: work items (the CRUD surface of the API)
/// - `page`: bounded result slice plus total-count metadata

pub mod page;
pub mod task;
pub mod user;
