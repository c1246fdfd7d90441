//! Active failure handlers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::{error::ApiError, state::AppState};

/// Show the active failure, or 204 when there is none
pub async fn show_failure(State(state): State<AppState>) -> Result<Response, ApiError> {
    Ok(match state.registry.current().await? {
        Some(failure) => Json(failure).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// End the active failure early
pub async fn clear_failure(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.registry.clear().await?;
    info!("Simulated failure cleared");
    Ok(StatusCode::NO_CONTENT)
}
