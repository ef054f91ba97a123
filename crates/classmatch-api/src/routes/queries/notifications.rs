//! Query routes for notifications: list, unread count.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use classmatch_notifications::application::query_handlers::{self, NotificationView};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for GET /{user_id}.
#[derive(Debug, Deserialize)]
pub struct NotificationListParams {
    /// Only return unread notifications.
    pub unread_only: Option<bool>,
}

/// Response body for GET /{user_id}/count.
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    /// Number of unread notifications.
    pub unread_count: i64,
}

/// GET /{user_id}
#[instrument(skip(state, params), fields(user_id = user_id))]
async fn get_user_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<NotificationListParams>,
) -> Result<Json<Vec<NotificationView>>, ApiError> {
    let notifications = query_handlers::list_notifications(
        user_id,
        params.unread_only.unwrap_or(false),
        &state.db_pool,
    )
    .await?;
    Ok(Json(notifications))
}

/// GET /{user_id}/count
#[instrument(skip(state), fields(user_id = user_id))]
async fn get_unread_count(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let unread_count = query_handlers::unread_count(user_id, &state.db_pool).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

/// Returns the notifications query router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{user_id}", get(get_user_notifications))
        .route("/{user_id}/count", get(get_unread_count))
}
