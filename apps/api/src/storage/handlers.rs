//! Axum route handlers for history and settings.

use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::history::HistoryEntry;
use crate::storage::settings::{get_settings, update_settings, Settings, SettingsUpdate};

/// GET /api/v1/history
pub async fn handle_get_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    Ok(Json(state.history.entries().await?))
}

/// DELETE /api/v1/history
pub async fn handle_clear_history(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.history.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/settings
pub async fn handle_get_settings(State(state): State<AppState>) -> Result<Json<Settings>, AppError> {
    Ok(Json(get_settings(state.store.as_ref()).await?))
}

/// PUT /api/v1/settings
///
/// Partial update; returns the merged settings.
pub async fn handle_update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<Settings>, AppError> {
    Ok(Json(update_settings(state.store.as_ref(), update).await?))
}
