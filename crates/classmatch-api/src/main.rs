//! ClassMatch API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use classmatch_api::state::AppState;
use classmatch_core::bus::EventBus;
use classmatch_core::clock::SystemClock;
use classmatch_notification_store::pg_notification_repository::PgNotificationRepository;
use classmatch_notifications::application::event_handlers::register_handlers;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting ClassMatch API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| "DATABASE_URL environment variable must be set")?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| format!("PORT must be a valid u16: {e}"))?;

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    // Build the event bus and subscribe the notification pipeline before
    // any request can publish.
    let mut bus = EventBus::new();
    register_handlers(
        &mut bus,
        Arc::new(PgNotificationRepository::new(pool.clone())),
        Arc::new(SystemClock),
    );

    // Build application state and router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app_state = AppState::new(pool, Arc::new(bus));
    let app = classmatch_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| format!("invalid HOST:PORT combination: {e}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
