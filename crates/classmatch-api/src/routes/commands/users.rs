//! Command routes for users: register, login, update, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use classmatch_accounts::application::command_handlers;
use classmatch_accounts::application::query_handlers::UserProfile;
use classmatch_accounts::domain::commands::{
    DeleteUser, LoginUser, RegisterUser, UpdateUserProfile, UserProfilePatch,
};
use classmatch_core::error::DomainError;

use crate::error::ApiError;
use crate::routes::OkMessage;
use crate::state::AppState;

/// Request body for POST /register.
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    /// Login email.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Declared major.
    pub major: Option<String>,
    /// Academic year.
    pub year: Option<String>,
    /// Profile bio.
    pub bio: Option<String>,
}

/// Response body for POST /register.
#[derive(Debug, Serialize)]
pub struct RegisterUserResponse {
    /// Always true on success.
    pub ok: bool,
    /// The new user's id.
    pub user_id: i64,
}

/// Request body for POST /login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// Response body for POST /login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Always true on success.
    pub ok: bool,
    /// The authenticated user's profile.
    pub user: UserProfile,
}

/// Request body for PUT /{user_id}.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New display name.
    pub name: Option<String>,
    /// New major.
    pub major: Option<String>,
    /// New academic year.
    pub year: Option<String>,
    /// New avatar reference.
    pub avatar: Option<String>,
    /// New bio.
    pub bio: Option<String>,
    /// New study preferences blob.
    pub study_prefs: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// POST /register
#[instrument(skip(state, request))]
async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<RegisterUserResponse>), ApiError> {
    let (Some(email), Some(password), Some(name)) = (
        required(request.email),
        required(request.password),
        required(request.name),
    ) else {
        return Err(DomainError::Validation("email, password, and name are required".into()).into());
    };

    let command = RegisterUser {
        correlation_id: Uuid::new_v4(),
        email,
        password,
        name,
        major: request.major,
        year: request.year,
        bio: request.bio,
    };

    info!(correlation_id = %command.correlation_id, "handling register_user command");

    let user_id = command_handlers::handle_register_user(&command, &state.db_pool).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterUserResponse { ok: true, user_id }),
    ))
}

/// POST /login
#[instrument(skip(state, request))]
async fn login_user(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(email), Some(password)) = (required(request.email), required(request.password))
    else {
        return Err(DomainError::Validation("email and password are required".into()).into());
    };

    let command = LoginUser {
        correlation_id: Uuid::new_v4(),
        email,
        password,
    };

    info!(correlation_id = %command.correlation_id, "handling login_user command");

    let user = command_handlers::handle_login_user(&command, &state.db_pool).await?;

    Ok(Json(LoginResponse { ok: true, user }))
}

/// PUT /{user_id}
#[instrument(skip(state, request), fields(user_id = user_id))]
async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<OkMessage>, ApiError> {
    let command = UpdateUserProfile {
        correlation_id: Uuid::new_v4(),
        user_id,
        patch: UserProfilePatch {
            name: request.name,
            major: request.major,
            year: request.year,
            avatar: request.avatar,
            bio: request.bio,
            study_prefs: request.study_prefs,
        },
    };

    info!(correlation_id = %command.correlation_id, "handling update_user_profile command");

    command_handlers::handle_update_user_profile(&command, &state.db_pool).await?;

    Ok(Json(OkMessage::new("User updated")))
}

/// DELETE /{user_id}
#[instrument(skip(state), fields(user_id = user_id))]
async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<OkMessage>, ApiError> {
    let command = DeleteUser {
        correlation_id: Uuid::new_v4(),
        user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_user command");

    command_handlers::handle_delete_user(&command, &state.db_pool).await?;

    Ok(Json(OkMessage::new("User deleted")))
}

/// Returns the users command router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/{user_id}", put(update_user).delete(delete_user))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::Request;
    use classmatch_core::bus::EventBus;
    use sqlx::PgPool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app_state() -> AppState {
        // Lazy pool: validation failures must reject before any query runs.
        let pool = PgPool::connect_lazy("postgres://localhost/test").unwrap();
        AppState::new(pool, Arc::new(EventBus::new()))
    }

    #[tokio::test]
    async fn test_register_without_required_fields_returns_400() {
        // Arrange
        let app = router().with_state(test_app_state());
        let body = serde_json::json!({ "email": "a@example.com" });

        let request = Request::builder()
            .method("POST")
            .uri("/register")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_with_empty_strings_returns_400() {
        // Arrange
        let app = router().with_state(test_app_state());
        let body = serde_json::json!({ "email": "", "password": "", "name": "" });

        let request = Request::builder()
            .method("POST")
            .uri("/register")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_without_password_returns_400() {
        // Arrange
        let app = router().with_state(test_app_state());
        let body = serde_json::json!({ "email": "a@example.com" });

        let request = Request::builder()
            .method("POST")
            .uri("/login")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();

        // Act
        let response = app.oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
