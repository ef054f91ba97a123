//! Command routes for courses: create, enroll, unenroll.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use classmatch_accounts::application::command_handlers;
use classmatch_accounts::domain::commands::{CreateCourse, EnrollInCourse, UnenrollFromCourse};
use classmatch_core::error::DomainError;

use crate::error::ApiError;
use crate::routes::OkMessage;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    /// Catalog identifier.
    pub id: Option<String>,
    /// Course code.
    pub code: Option<String>,
    /// Course name.
    pub name: Option<String>,
    /// Section label.
    pub section: Option<String>,
    /// Instructor name.
    pub instructor: Option<String>,
    /// Schedule description.
    pub schedule: Option<String>,
    /// Seat count.
    pub students: Option<i32>,
    /// Building, if known.
    pub building: Option<String>,
    /// Room, if known.
    pub room: Option<String>,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct CreateCourseResponse {
    /// Always true on success.
    pub ok: bool,
    /// The created course's id.
    pub course_id: String,
}

/// Request body for enroll/unenroll.
#[derive(Debug, Deserialize)]
pub struct EnrollmentRequest {
    /// The user enrolling or unenrolling.
    pub user_id: Option<i64>,
}

/// POST /
#[instrument(skip(state, request))]
pub(crate) async fn create_course(
    State(state): State<AppState>,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CreateCourseResponse>), ApiError> {
    let required = |v: Option<String>| v.filter(|s| !s.is_empty());
    let (Some(id), Some(code), Some(name), Some(section), Some(instructor), Some(schedule)) = (
        required(request.id),
        required(request.code),
        required(request.name),
        required(request.section),
        required(request.instructor),
        required(request.schedule),
    ) else {
        return Err(DomainError::Validation(
            "id, code, name, section, instructor, and schedule are required".into(),
        )
        .into());
    };

    let command = CreateCourse {
        correlation_id: Uuid::new_v4(),
        id,
        code,
        name,
        section,
        instructor,
        schedule,
        students: request.students.unwrap_or(0),
        building: request.building,
        room: request.room,
    };

    info!(correlation_id = %command.correlation_id, "handling create_course command");

    command_handlers::handle_create_course(&command, &state.db_pool).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCourseResponse {
            ok: true,
            course_id: command.id,
        }),
    ))
}

/// POST /{course_id}/enroll
#[instrument(skip(state, request), fields(course_id = %course_id))]
async fn enroll(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Json(request): Json<EnrollmentRequest>,
) -> Result<(StatusCode, Json<OkMessage>), ApiError> {
    let Some(user_id) = request.user_id else {
        return Err(DomainError::Validation("user_id is required".into()).into());
    };

    let command = EnrollInCourse {
        correlation_id: Uuid::new_v4(),
        course_id,
        user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling enroll_in_course command");

    command_handlers::handle_enroll_in_course(&command, &state.db_pool).await?;

    Ok((StatusCode::CREATED, Json(OkMessage::new("Enrolled successfully"))))
}

/// DELETE /{course_id}/enroll
#[instrument(skip(state, request), fields(course_id = %course_id))]
async fn unenroll(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Json(request): Json<EnrollmentRequest>,
) -> Result<Json<OkMessage>, ApiError> {
    let Some(user_id) = request.user_id else {
        return Err(DomainError::Validation("user_id is required".into()).into());
    };

    let command = UnenrollFromCourse {
        correlation_id: Uuid::new_v4(),
        course_id,
        user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling unenroll_from_course command");

    command_handlers::handle_unenroll_from_course(&command, &state.db_pool).await?;

    Ok(Json(OkMessage::new("Unenrolled successfully")))
}

/// Returns the courses command router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course))
        .route("/{course_id}/enroll", post(enroll).delete(unenroll))
}
