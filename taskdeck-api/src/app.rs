/// Application state and router builder
///
/// Defines the shared application state and builds the axum router with all
/// routes and middleware.
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// └── /api/v1/
///     ├── /auth/                     # Authentication (public)
///     │   ├── POST /register
///     │   └── POST /authenticate
///     └── /tasks/                    # Task CRUD (Bearer token required)
///         ├── GET    /               # Paginated list
///         ├── POST   /               # Create
///         ├── GET    /:id
///         ├── PUT    /:id            # Partial update
///         ├── DELETE /:id            # Admin only
///         └── GET    /status/:status # Paginated list filtered by status
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdeck_shared::auth::middleware::{jwt_auth_middleware, AuthError};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Gets the configured token validity window
    pub fn token_ttl(&self) -> chrono::Duration {
        self.config.token_ttl()
    }
}

/// Builds the complete axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/authenticate", post(routes::auth::authenticate));

    // Task routes (require a valid Bearer token)
    let task_routes = Router::new()
        .route("/", get(routes::tasks::find_all))
        .route("/", post(routes::tasks::create))
        .route("/:id", get(routes::tasks::find_by_id))
        .route("/:id", put(routes::tasks::update))
        .route("/:id", delete(routes::tasks::delete))
        .route("/status/:status", get(routes::tasks::find_by_status))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Delegates to the shared middleware with the process-wide signing secret,
/// which injects an `AuthContext` into request extensions on success.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    jwt_auth_middleware(state.jwt_secret().to_string(), req, next).await
}
