//! Command routes for groups: create, update, delete, join, leave, transfer.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{patch, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use classmatch_core::error::DomainError;
use classmatch_groups::application::command_handlers;
use classmatch_groups::domain::commands::{
    CreateGroup, DeleteGroup, GroupPatch, JoinGroup, LeaveGroup, TransferOwnership, UpdateGroup,
};

use crate::error::ApiError;
use crate::routes::OkMessage;
use crate::state::AppState;

const DEFAULT_MAX_MEMBERS: i32 = 5;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    /// The owning user.
    pub owner_user_id: Option<i64>,
    /// The course this group studies.
    pub course_id: Option<String>,
    /// Group name.
    pub name: Option<String>,
    /// Group description.
    pub description: Option<String>,
    /// Free-text meeting time.
    pub meeting_time: Option<String>,
    /// Free-text location.
    pub location: Option<String>,
    /// Member cap.
    pub max_members: Option<i32>,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct CreateGroupResponse {
    /// Always true on success.
    pub ok: bool,
    /// The new group's id.
    pub group_id: i64,
}

/// Request body for PUT /{group_id}.
#[derive(Debug, Deserialize)]
pub struct UpdateGroupRequest {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New meeting time.
    pub meeting_time: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New member cap.
    pub max_members: Option<i32>,
    /// New tags blob.
    pub tags: Option<String>,
}

/// Query parameters for DELETE /{group_id}.
#[derive(Debug, Deserialize)]
pub struct DeleteGroupParams {
    /// Hard delete instead of archiving.
    pub hard_delete: Option<bool>,
}

/// Request body for join/leave.
#[derive(Debug, Deserialize)]
pub struct MembershipRequest {
    /// The joining or leaving user.
    pub user_id: Option<i64>,
}

/// Request body for PATCH /{group_id}/transfer-ownership.
#[derive(Debug, Deserialize)]
pub struct TransferOwnershipRequest {
    /// The member taking over ownership.
    pub new_owner_id: Option<i64>,
}

/// POST /
#[instrument(skip(state, request))]
pub(crate) async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<CreateGroupResponse>), ApiError> {
    let (Some(owner_user_id), Some(course_id), Some(name)) = (
        request.owner_user_id,
        request.course_id.filter(|s| !s.is_empty()),
        request.name.filter(|s| !s.is_empty()),
    ) else {
        return Err(DomainError::Validation(
            "owner_user_id, course_id, and name are required".into(),
        )
        .into());
    };

    let command = CreateGroup {
        correlation_id: Uuid::new_v4(),
        owner_user_id,
        course_id,
        name,
        description: request.description.unwrap_or_default(),
        meeting_time: request.meeting_time.unwrap_or_default(),
        location: request.location.unwrap_or_default(),
        max_members: Some(request.max_members.unwrap_or(DEFAULT_MAX_MEMBERS)),
    };

    info!(correlation_id = %command.correlation_id, "handling create_group command");

    let group_id =
        command_handlers::handle_create_group(&command, &state.db_pool, &state.bus).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateGroupResponse { ok: true, group_id }),
    ))
}

/// PUT /{group_id}
#[instrument(skip(state, request), fields(group_id = group_id))]
async fn update_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Json(request): Json<UpdateGroupRequest>,
) -> Result<Json<OkMessage>, ApiError> {
    let command = UpdateGroup {
        correlation_id: Uuid::new_v4(),
        group_id,
        patch: GroupPatch {
            name: request.name,
            description: request.description,
            meeting_time: request.meeting_time,
            location: request.location,
            max_members: request.max_members,
            tags: request.tags,
        },
    };

    info!(correlation_id = %command.correlation_id, "handling update_group command");

    command_handlers::handle_update_group(&command, &state.db_pool).await?;

    Ok(Json(OkMessage::new("Group updated")))
}

/// DELETE /{group_id}
#[instrument(skip(state, params), fields(group_id = group_id))]
async fn delete_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Query(params): Query<DeleteGroupParams>,
) -> Result<Json<OkMessage>, ApiError> {
    let command = DeleteGroup {
        correlation_id: Uuid::new_v4(),
        group_id,
        hard: params.hard_delete.unwrap_or(false),
    };

    info!(correlation_id = %command.correlation_id, "handling delete_group command");

    command_handlers::handle_delete_group(&command, &state.db_pool).await?;

    Ok(Json(OkMessage::new("Group deleted")))
}

/// POST /{group_id}/join
#[instrument(skip(state, request), fields(group_id = group_id))]
async fn join_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Json(request): Json<MembershipRequest>,
) -> Result<(StatusCode, Json<OkMessage>), ApiError> {
    let Some(user_id) = request.user_id else {
        return Err(DomainError::Validation("user_id is required".into()).into());
    };

    let command = JoinGroup {
        correlation_id: Uuid::new_v4(),
        group_id,
        user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling join_group command");

    command_handlers::handle_join_group(&command, &state.db_pool, &state.bus).await?;

    Ok((StatusCode::CREATED, Json(OkMessage::new("Joined group"))))
}

/// POST /{group_id}/leave
#[instrument(skip(state, request), fields(group_id = group_id))]
async fn leave_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Json(request): Json<MembershipRequest>,
) -> Result<Json<OkMessage>, ApiError> {
    let Some(user_id) = request.user_id else {
        return Err(DomainError::Validation("user_id is required".into()).into());
    };

    let command = LeaveGroup {
        correlation_id: Uuid::new_v4(),
        group_id,
        user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling leave_group command");

    command_handlers::handle_leave_group(&command, &state.db_pool).await?;

    Ok(Json(OkMessage::new("Left group successfully")))
}

/// PATCH /{group_id}/transfer-ownership
#[instrument(skip(state, request), fields(group_id = group_id))]
async fn transfer_ownership(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Json(request): Json<TransferOwnershipRequest>,
) -> Result<Json<OkMessage>, ApiError> {
    let Some(new_owner_id) = request.new_owner_id else {
        return Err(DomainError::Validation("new_owner_id is required".into()).into());
    };

    let command = TransferOwnership {
        correlation_id: Uuid::new_v4(),
        group_id,
        new_owner_id,
    };

    info!(correlation_id = %command.correlation_id, "handling transfer_ownership command");

    command_handlers::handle_transfer_ownership(&command, &state.db_pool).await?;

    Ok(Json(OkMessage::new("Ownership transferred")))
}

/// Returns the groups command router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_group))
        .route("/{group_id}", put(update_group).delete(delete_group))
        .route("/{group_id}/join", post(join_group))
        .route("/{group_id}/leave", post(leave_group))
        .route("/{group_id}/transfer-ownership", patch(transfer_ownership))
}
