use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::SessionId;

/// Download the decoded replay exactly as the decoder produced it.
pub async fn export_replay(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response, ApiError> {
    let session_id = SessionId::from(session_id);
    let session = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    let body = session
        .decoded
        .to_pretty_json()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    info!(session = %session_id, bytes = body.len(), "Exported replay JSON");

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"replay.json\"",
            ),
        ],
        body,
    )
        .into_response())
}
