//! Command routes for messages: post, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use classmatch_core::error::DomainError;
use classmatch_groups::application::command_handlers;
use classmatch_groups::domain::commands::{DeleteMessage, PostMessage};

use crate::error::ApiError;
use crate::routes::OkMessage;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    /// The group to post in.
    pub group_id: Option<i64>,
    /// The posting user.
    pub user_id: Option<i64>,
    /// Message body.
    pub content: Option<String>,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    /// Always true on success.
    pub ok: bool,
    /// The new message's id.
    pub message_id: i64,
}

/// POST /
#[instrument(skip(state, request))]
pub(crate) async fn post_message(
    State(state): State<AppState>,
    Json(request): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<PostMessageResponse>), ApiError> {
    let (Some(group_id), Some(user_id), Some(content)) = (
        request.group_id,
        request.user_id,
        request.content.filter(|c| !c.is_empty()),
    ) else {
        return Err(
            DomainError::Validation("group_id, user_id and content are required".into()).into(),
        );
    };

    let command = PostMessage {
        correlation_id: Uuid::new_v4(),
        group_id,
        user_id,
        content,
    };

    info!(correlation_id = %command.correlation_id, "handling post_message command");

    let message_id =
        command_handlers::handle_post_message(&command, &state.db_pool, &state.bus).await?;

    Ok((
        StatusCode::CREATED,
        Json(PostMessageResponse {
            ok: true,
            message_id,
        }),
    ))
}

/// DELETE /{message_id}
#[instrument(skip(state), fields(message_id = message_id))]
async fn delete_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<Json<OkMessage>, ApiError> {
    let command = DeleteMessage {
        correlation_id: Uuid::new_v4(),
        message_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_message command");

    command_handlers::handle_delete_message(&command, &state.db_pool).await?;

    Ok(Json(OkMessage::new("Message deleted")))
}

/// Returns the messages command router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(post_message))
        .route("/{message_id}", delete(delete_message))
}
