//! Query routes for groups: list, detail, members, messages.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::instrument;

use classmatch_groups::application::query_handlers::{
    self, GroupDetail, GroupMemberView, GroupSummary, MessageView,
};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_MESSAGE_LIMIT: i64 = 50;

/// Query parameters for GET /.
#[derive(Debug, Deserialize)]
pub struct GroupListParams {
    /// Restrict to one course.
    pub course_id: Option<String>,
}

/// Query parameters for GET /{group_id}/messages.
#[derive(Debug, Deserialize)]
pub struct MessagePageParams {
    /// Page size.
    pub limit: Option<i64>,
    /// Page offset.
    pub offset: Option<i64>,
}

/// GET /
#[instrument(skip(state, params))]
pub(crate) async fn list_groups(
    State(state): State<AppState>,
    Query(params): Query<GroupListParams>,
) -> Result<Json<Vec<GroupSummary>>, ApiError> {
    let groups = query_handlers::list_groups(params.course_id.as_deref(), &state.db_pool).await?;
    Ok(Json(groups))
}

/// GET /{group_id}
#[instrument(skip(state), fields(group_id = group_id))]
async fn get_group_detail(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Result<Json<GroupDetail>, ApiError> {
    let detail = query_handlers::get_group_detail(group_id, &state.db_pool).await?;
    Ok(Json(detail))
}

/// GET /{group_id}/members
#[instrument(skip(state), fields(group_id = group_id))]
async fn get_group_members(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Result<Json<Vec<GroupMemberView>>, ApiError> {
    let members = query_handlers::list_group_members(group_id, &state.db_pool).await?;
    Ok(Json(members))
}

/// GET /{group_id}/messages
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

/// Returns the groups query router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_groups))
        .route("/{group_id}", get(get_group_detail))
        .route("/{group_id}/members", get(get_group_members))
        .route("/{group_id}/messages", get(get_group_messages))
}
