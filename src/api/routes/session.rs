use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::info;

use crate::api::state::AppState;
use crate::models::SessionId;

/// Drop a session. Unknown ids are not an error.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> StatusCode {
    let session_id = SessionId::from(session_id);
    if state.sessions.remove(&session_id).await.is_some() {
        info!(session = %session_id, "Session closed");
    }
    StatusCode::OK
}
