//! One-shot document downloads.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Serve a parked document and release it.
///
/// # Errors
///
/// Returns 404 for malformed, unknown, expired or already-used tokens.
#[instrument(skip(state))]
pub async fn download(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse> {
    let token = Uuid::parse_str(&token)
        .map_err(|_| AppError::NotFound("download".to_string()))?;

    let document = state
        .downloads()
        .take(token)
        .await
        .ok_or_else(|| AppError::NotFound("download".to_string()))?;

    tracing::info!(filename = %document.filename, "Document downloaded");
    Ok(Arc::unwrap_or_clone(document))
}
