//! Command routes for availability slots: add, delete, replace.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use classmatch_accounts::application::command_handlers;
use classmatch_accounts::domain::commands::{
    AddAvailabilitySlot, DeleteAvailabilitySlot, ReplaceAvailability,
};
use classmatch_core::error::DomainError;

use crate::error::ApiError;
use crate::routes::OkMessage;
use crate::state::AppState;

/// Request body for POST /{user_id}.
#[derive(Debug, Deserialize)]
pub struct AddSlotRequest {
    /// Slot description.
    pub slot: Option<String>,
}

/// Response body for POST /{user_id}.
#[derive(Debug, Serialize)]
pub struct AddSlotResponse {
    /// Always true on success.
    pub ok: bool,
    /// The new slot's id.
    pub slot_id: i64,
}

/// Request body for PUT /{user_id}.
#[derive(Debug, Deserialize)]
pub struct ReplaceSlotsRequest {
    /// The full replacement slot list.
    pub slots: Option<Vec<String>>,
}

/// POST /{user_id}
#[instrument(skip(state, request), fields(user_id = user_id))]
async fn add_slot(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<AddSlotRequest>,
) -> Result<(StatusCode, Json<AddSlotResponse>), ApiError> {
    let Some(slot) = request.slot.filter(|s| !s.is_empty()) else {
        return Err(DomainError::Validation("slot is required".into()).into());
    };

    let command = AddAvailabilitySlot {
        correlation_id: Uuid::new_v4(),
        user_id,
        slot,
    };

    info!(correlation_id = %command.correlation_id, "handling add_availability_slot command");

    let slot_id = command_handlers::handle_add_availability_slot(&command, &state.db_pool).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddSlotResponse { ok: true, slot_id }),
    ))
}

/// DELETE /{user_id}/{slot_id}
#[instrument(skip(state), fields(user_id = user_id, slot_id = slot_id))]
async fn delete_slot(
    State(state): State<AppState>,
    Path((user_id, slot_id)): Path<(i64, i64)>,
) -> Result<Json<OkMessage>, ApiError> {
    let command = DeleteAvailabilitySlot {
        correlation_id: Uuid::new_v4(),
        user_id,
        slot_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_availability_slot command");

    command_handlers::handle_delete_availability_slot(&command, &state.db_pool).await?;

    Ok(Json(OkMessage::new("Availability slot deleted")))
}

/// PUT /{user_id}
#[instrument(skip(state, request), fields(user_id = user_id))]
async fn replace_slots(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<ReplaceSlotsRequest>,
) -> Result<Json<OkMessage>, ApiError> {
    let Some(slots) = request.slots else {
        return Err(DomainError::Validation("slots must be an array".into()).into());
    };

    let command = ReplaceAvailability {
        correlation_id: Uuid::new_v4(),
        user_id,
        slots,
    };

    info!(correlation_id = %command.correlation_id, "handling replace_availability command");

    command_handlers::handle_replace_availability(&command, &state.db_pool).await?;

    Ok(Json(OkMessage::new("Availability updated")))
}

/// Returns the availability command router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{user_id}", post(add_slot).put(replace_slots))
        .route("/{user_id}/{slot_id}", axum::routing::delete(delete_slot))
}
