//! Query routes for availability slots.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;

use classmatch_accounts::application::query_handlers::{self, AvailabilitySlotView};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /{user_id}
#[instrument(skip(state), fields(user_id = user_id))]
async fn get_user_availability(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<AvailabilitySlotView>>, ApiError> {
    let slots = query_handlers::list_availability(user_id, &state.db_pool).await?;
    Ok(Json(slots))
}

/// Returns the availability query router.
pub fn router() -> Router<AppState> {
    Router::new().route("/{user_id}", get(get_user_availability))
}
