//! Query routes for courses: list, detail, students, groups.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::instrument;

use classmatch_accounts::application::query_handlers::{
    self, CourseDetail, CourseStudentView, CourseView,
};
use classmatch_groups::application::query_handlers::{self as group_queries, CourseGroupView};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for GET /.
#[derive(Debug, Deserialize)]
pub struct CourseListParams {
    /// Substring match against code or name.
    pub search: Option<String>,
    /// Substring match against instructor.
    pub instructor: Option<String>,
}

/// GET /
#[instrument(skip(state, params))]
pub(crate) async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseListParams>,
) -> Result<Json<Vec<CourseView>>, ApiError> {
    let courses = query_handlers::list_courses(
        params.search.as_deref(),
        params.instructor.as_deref(),
        &state.db_pool,
    )
    .await?;
    Ok(Json(courses))
}

/// GET /{course_id}
#[instrument(skip(state), fields(course_id = %course_id))]
async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseDetail>, ApiError> {
    let course = query_handlers::get_course(&course_id, &state.db_pool).await?;
    Ok(Json(course))
}

/// GET /{course_id}/students
#[instrument(skip(state), fields(course_id = %course_id))]
async fn get_course_students(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<CourseStudentView>>, ApiError> {
    let students = query_handlers::list_course_students(&course_id, &state.db_pool).await?;
    Ok(Json(students))
}

/// GET /{course_id}/groups
#[instrument(skip(state), fields(course_id = %course_id))]
async fn get_course_groups(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<CourseGroupView>>, ApiError> {
    let groups = group_queries::list_groups_for_course(&course_id, &state.db_pool).await?;
    Ok(Json(groups))
}

/// Returns the courses query router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/{course_id}", get(get_course))
        .route("/{course_id}/students", get(get_course_students))
        .route("/{course_id}/groups", get(get_course_groups))
}
