//! Query routes for users: detail, search, overview, matches, groups.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use classmatch_accounts::application::query_handlers::{
    self, MatchView, UserOverview, UserProfile, UserSearchFilter, UserSummary,
};
use classmatch_groups::application::query_handlers::{self as group_queries, UserGroupView};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Query parameters for GET /search and GET /detail.
#[derive(Debug, Deserialize)]
pub struct UserSearchParams {
    /// Substring match against name or email.
    pub q: Option<String>,
    /// Exact major filter.
    pub major: Option<String>,
    /// Exact year filter.
    pub year: Option<String>,
    /// Maximum rows returned.
    pub limit: Option<i64>,
}

/// Response body for GET /{user_id}/matches.
#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    /// Matched users, best overlap first.
    pub matches: Vec<MatchView>,
}

/// GET /detail/{user_id}
#[instrument(skip(state), fields(user_id = user_id))]
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = query_handlers::get_user(user_id, &state.db_pool).await?;
    Ok(Json(user))
}

/// GET /detail and GET /search
#[instrument(skip(state, params))]
async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<UserSearchParams>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let filter = UserSearchFilter {
        q: params.q,
        major: params.major,
        year: params.year,
        limit: params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
    };
    let users = query_handlers::search_users(&filter, &state.db_pool).await?;
    Ok(Json(users))
}

/// GET /{user_id}/overview
#[instrument(skip(state), fields(user_id = user_id))]
async fn get_user_overview(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserOverview>, ApiError> {
    let overview = query_handlers::get_user_overview(user_id, &state.db_pool).await?;
    Ok(Json(overview))
}

/// GET /{user_id}/matches
#[instrument(skip(state), fields(user_id = user_id))]
async fn get_user_matches(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<MatchesResponse>, ApiError> {
    let matches = query_handlers::get_user_matches(user_id, &state.db_pool).await?;
    Ok(Json(MatchesResponse { matches }))
}

/// GET /{user_id}/groups
#[instrument(skip(state), fields(user_id = user_id))]
async fn get_user_groups(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<UserGroupView>>, ApiError> {
    let groups = group_queries::list_user_groups(user_id, &state.db_pool).await?;
    Ok(Json(groups))
}

/// Returns the users query router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_users))
        .route("/detail", get(search_users))
        .route("/detail/{user_id}", get(get_user))
        .route("/{user_id}/overview", get(get_user_overview))
        .route("/{user_id}/matches", get(get_user_matches))
        .route("/{user_id}/groups", get(get_user_groups))
}
