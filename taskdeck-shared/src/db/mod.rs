/// Database utilities
///
/// - `pool`: PostgreSQL connection pool construction and health check
/// - `migrations`: embedded sqlx migration runner

pub mod migrations;
pub mod pool;
