//! Query routes for messages: group pages, single message.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::instrument;

use classmatch_groups::application::query_handlers::{self, MessageDetail, MessageView};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_MESSAGE_LIMIT: i64 = 50;

/// Query parameters for GET /group/{group_id}.
#[derive(Debug, Deserialize)]
pub struct MessagePageParams {
    /// Page size.
    pub limit: Option<i64>,
    /// Page offset.
    pub offset: Option<i64>,
}

/// GET /group/{group_id}
#[instrument(skip(state, params), fields(group_id = group_id))]
async fn get_group_messages(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Query(params): Query<MessagePageParams>,
) -> Result<Json<Vec<MessageView>>, ApiError> {
    let messages = query_handlers::list_group_messages(
        group_id,
        params.limit.unwrap_or(DEFAULT_MESSAGE_LIMIT),
        params.offset.unwrap_or(0),
        &state.db_pool,
    )
    .await?;
    Ok(Json(messages))
}

/// GET /{message_id}
#[instrument(skip(state), fields(message_id = message_id))]
async fn get_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<Json<MessageDetail>, ApiError> {
    let message = query_handlers::get_message(message_id, &state.db_pool).await?;
    Ok(Json(message))
}

/// Returns the messages query router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/group/{group_id}", get(get_group_messages))
        .route("/{message_id}", get(get_message))
}
