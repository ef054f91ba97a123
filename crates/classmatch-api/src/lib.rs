//! ClassMatch HTTP API.
//!
//! Routes are split CQRS-style: write endpoints under `/api/commands` and
//! read endpoints under `/api/queries`, each nested per entity.

use axum::Router;
use axum::routing::{get, post};

pub mod error;
pub mod routes;
pub mod state;

use routes::{commands, queries};
use state::AppState;

/// Builds the full application router. Middleware layers (tracing, CORS)
/// are added by the binary, not here, so tests exercise the bare routes.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/commands/users", commands::users::router())
        .nest("/api/commands/courses", commands::courses::router())
        .nest("/api/commands/availability", commands::availability::router())
        .nest("/api/commands/groups", commands::groups::router())
        .nest("/api/commands/messages", commands::messages::router())
        .nest(
            "/api/commands/notifications",
            commands::notifications::router(),
        )
        .nest("/api/queries/users", queries::users::router())
        .nest("/api/queries/courses", queries::courses::router())
        .nest("/api/queries/availability", queries::availability::router())
        .nest("/api/queries/groups", queries::groups::router())
        .nest("/api/queries/messages", queries::messages::router())
        .nest(
            "/api/queries/notifications",
            queries::notifications::router(),
        )
        // axum 0.8 nests a router's root `/` handler at the prefix exactly
        // (`/api/commands/courses`) but not its trailing-slash form
        // (`/api/commands/courses/`). Register the collection roots at the
        // trailing-slash path too so both spellings reach the same handler.
        .route("/api/commands/courses/", post(commands::courses::create_course))
        .route("/api/commands/groups/", post(commands::groups::create_group))
        .route("/api/commands/messages/", post(commands::messages::post_message))
        .route("/api/queries/courses/", get(queries::courses::list_courses))
        .route("/api/queries/groups/", get(queries::groups::list_groups))
        .with_state(state)
}
