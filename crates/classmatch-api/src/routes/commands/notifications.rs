//! Command routes for notifications: direct create, mark read, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use classmatch_core::error::DomainError;
use classmatch_notifications::application::command_handlers;
use classmatch_notifications::domain::commands::{
    CreateNotification, DeleteNotification, MarkAllNotificationsRead, MarkNotificationRead,
};

use crate::error::ApiError;
use crate::routes::OkMessage;
use crate::state::AppState;

/// Request body for POST /{user_id}.
#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    /// Type tag.
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    /// Optional display payload.
    pub data: Option<serde_json::Value>,
}

/// Response body for POST /{user_id}.
#[derive(Debug, Serialize)]
pub struct CreateNotificationResponse {
    /// Always true on success.
    pub ok: bool,
    /// The new notification's id.
    pub notification_id: i64,
}

/// Response body for PATCH /{user_id}/read-all.
#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    /// Always true on success.
    pub ok: bool,
    /// Number of notifications flipped to read.
    pub updated_count: u64,
}

/// POST /{user_id}
#[instrument(skip(state, request), fields(user_id = user_id))]
async fn create_notification(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<CreateNotificationResponse>), ApiError> {
    let Some(notification_type) = request.notification_type.filter(|t| !t.is_empty()) else {
        return Err(DomainError::Validation("type is required".into()).into());
    };

    let command = CreateNotification {
        correlation_id: Uuid::new_v4(),
        user_id,
        notification_type,
        data: request.data,
    };

    info!(correlation_id = %command.correlation_id, "handling create_notification command");

    let notification_id =
        command_handlers::handle_create_notification(&command, &state.db_pool).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateNotificationResponse {
            ok: true,
            notification_id,
        }),
    ))
}

/// PATCH /{user_id}/{notification_id}/read
#[instrument(skip(state), fields(user_id = user_id, notification_id = notification_id))]
async fn mark_read(
    State(state): State<AppState>,
    Path((user_id, notification_id)): Path<(i64, i64)>,
) -> Result<Json<OkMessage>, ApiError> {
    let command = MarkNotificationRead {
        correlation_id: Uuid::new_v4(),
        user_id,
        notification_id,
    };

    info!(correlation_id = %command.correlation_id, "handling mark_notification_read command");

    command_handlers::handle_mark_notification_read(&command, &state.db_pool).await?;

    Ok(Json(OkMessage::new("Notification marked as read")))
}

/// PATCH /{user_id}/read-all
#[instrument(skip(state), fields(user_id = user_id))]
async fn mark_all_read(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let command = MarkAllNotificationsRead {
        correlation_id: Uuid::new_v4(),
        user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling mark_all_notifications_read command");

    let updated_count =
        command_handlers::handle_mark_all_notifications_read(&command, &state.db_pool).await?;

    Ok(Json(MarkAllReadResponse {
        ok: true,
        updated_count,
    }))
}

/// DELETE /{user_id}/{notification_id}
#[instrument(skip(state), fields(user_id = user_id, notification_id = notification_id))]
async fn delete_notification(
    State(state): State<AppState>,
    Path((user_id, notification_id)): Path<(i64, i64)>,
) -> Result<Json<OkMessage>, ApiError> {
    let command = DeleteNotification {
        correlation_id: Uuid::new_v4(),
        user_id,
        notification_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_notification command");

    command_handlers::handle_delete_notification(&command, &state.db_pool).await?;

    Ok(Json(OkMessage::new("Notification deleted")))
}

/// Returns the notifications command router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{user_id}", post(create_notification))
        .route("/{user_id}/read-all", patch(mark_all_read))
        .route("/{user_id}/{notification_id}/read", patch(mark_read))
        .route("/{user_id}/{notification_id}", delete(delete_notification))
}
