use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::SessionId;
use crate::session::ReplaySession;

/// Multipart field carrying the replay file.
pub const UPLOAD_FIELD: &str = "replayFile";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub index: usize,
    pub label: String,
    pub player_id: String,
    pub player_name: String,
    pub is_bot: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub session_id: SessionId,
    pub players: Vec<RosterEntry>,
}

pub async fn upload_replay(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.replay").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload
        .filter(|(_, bytes)| !bytes.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{} is required", UPLOAD_FIELD)))?;

    // Decoding is CPU-bound and may take a while for full replays.
    let decoder = state.decoder.clone();
    let decoded = tokio::task::spawn_blocking(move || decoder.decode(&bytes))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| {
            warn!(file = %file_name, "Failed to decode replay: {}", e);
            ApiError::BadRequest(format!("Failed to read replay file: {}", e))
        })?;

    let session = ReplaySession::new(file_name, decoded);
    let players: Vec<RosterEntry> = session
        .roster()
        .iter()
        .enumerate()
        .map(|(index, p)| RosterEntry {
            index,
            label: p.roster_label(),
            player_id: p.id.to_string(),
            player_name: p.name.clone(),
            is_bot: p.is_bot,
        })
        .collect();

    let file_name = session.file_name.clone();
    let session_id = state.sessions.insert(session).await;
    info!(
        session = %session_id,
        file = %file_name,
        players = players.len(),
        "Replay uploaded"
    );

    Ok(Json(UploadResponse {
        session_id,
        players,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::*;
    use crate::models::SessionId;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_upload_returns_sorted_roster() {
        let state = test_state();
        let app = build_router(state.clone());
        let (status, json) =
            post_file(app, "replayFile", "match.replay", REPLAY_JSON.as_bytes()).await;

        assert_eq!(status, StatusCode::OK);
        let session_id = json["sessionId"].as_str().unwrap();
        assert_eq!(session_id.len(), 32);

        let players = json["players"].as_array().unwrap();
        assert_eq!(players.len(), 3);
        assert_eq!(players[0]["index"], 0);
        assert_eq!(players[0]["playerName"], "Alpha");
        assert_eq!(players[0]["label"], "Alpha: AA01 - human");
        assert_eq!(players[1]["label"], "Bravo: BB02 - bot");
        assert_eq!(players[1]["isBot"], true);
        assert_eq!(players[2]["playerId"], "CC03");

        let session = state.sessions.get(&SessionId::from(session_id)).await.unwrap();
        assert_eq!(session.file_name, "match.replay");
    }

    #[tokio::test]
    async fn test_upload_wrong_field() {
        let state = test_state();
        let app = build_router(state.clone());
        let (status, json) = post_file(app, "file", "match.replay", REPLAY_JSON.as_bytes()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(state.sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_upload_empty_file() {
        let state = test_state();
        let app = build_router(state.clone());
        let (status, _) = post_file(app, "replayFile", "empty.replay", b"").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(state.sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_upload_undecodable_file_creates_no_session() {
        let state = test_state();
        let app = build_router(state.clone());
        let (status, json) = post_file(app, "replayFile", "bad.replay", b"\x01\x02not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Failed to read replay file"));
        assert!(state.sessions.is_empty().await);
    }
}
