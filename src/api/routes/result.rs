use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::SessionId;
use crate::report::{build_report, render_report, MatchReport, PlatformInfo, RenderOptions};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRequest {
    pub session_id: String,
    /// Roster index from the upload response; -1 for no player
    #[serde(default = "no_player")]
    pub player_index: i64,
    /// Seconds added to every elimination time
    #[serde(default)]
    pub offset: i64,
}

fn no_player() -> i64 {
    -1
}

#[derive(Debug, Serialize)]
pub struct ResultResponse {
    /// Rendered text report
    pub result: String,
    pub report: MatchReport,
}

pub async fn match_result(
    State(state): State<AppState>,
    Json(req): Json<ResultRequest>,
) -> Result<Json<ResultResponse>, ApiError> {
    if req.session_id.trim().is_empty() {
        return Err(ApiError::BadRequest("sessionId is required".to_string()));
    }

    let session = state
        .sessions
        .get(&SessionId::from(req.session_id))
        .await
        .ok_or_else(|| {
            ApiError::NotFound("Session not found; upload the replay file again".to_string())
        })?;

    let report = build_report(
        session.replay(),
        session.player_at(req.player_index),
        req.offset,
    );
    debug!(
        player_index = req.player_index,
        offset = req.offset,
        selected = report.player.is_some(),
        "Built match report"
    );

    let cosmetic_names = match &state.cosmetics {
        Some(client) => Some(client.lookup_names_or_empty(&report.cosmetic_ids()).await),
        None => None,
    };
    let options = RenderOptions {
        cosmetic_names: cosmetic_names.as_ref(),
        platform: state
            .config
            .report
            .include_platform
            .then(PlatformInfo::current),
    };
    let result = render_report(&report, &options);

    Ok(Json(ResultResponse { result, report }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn request(state: &crate::api::state::AppState, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        post_json(build_router(state.clone()), "/api/result", &body.to_string()).await
    }

    #[tokio::test]
    async fn test_result_without_player() {
        let state = test_state();
        let session_id = upload_fixture(&state).await;

        let (status, json) = request(
            &state,
            json!({ "sessionId": session_id, "playerIndex": -1, "offset": 0 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let text = json["result"].as_str().unwrap();
        assert!(text.contains("Total Players: 3(Humans : 2 / Bots : 1)"));
        assert!(!text.contains("Player Results"));
        assert!(json["report"]["player"].is_null());
        assert_eq!(json["report"]["roster"]["bots"], 1);
    }

    #[tokio::test]
    async fn test_result_winner_with_offset() {
        let state = test_state();
        let session_id = upload_fixture(&state).await;

        let (status, json) = request(
            &state,
            json!({ "sessionId": session_id, "playerIndex": 0, "offset": 5 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let text = json["result"].as_str().unwrap();
        assert!(text.contains("Player : Alpha (human) eliminated 2 players."));
        assert!(text.contains(" 1st: 04:15 - Bravo (bot)"));
        assert!(text.contains(" 2nd: 12:50 - Charlie (human)"));
        assert!(text.contains("Alpha won the game!"));
        assert_eq!(json["report"]["player"]["outcome"], "victory");
        assert_eq!(json["report"]["player"]["eliminations"][0]["time"], "04:15");
    }

    #[tokio::test]
    async fn test_result_eliminated_player() {
        let state = test_state();
        let session_id = upload_fixture(&state).await;

        let (_, json) = request(&state, json!({ "sessionId": session_id, "playerIndex": 2 })).await;

        let text = json["result"].as_str().unwrap();
        assert!(text.contains("Charlie was eliminated by Alpha (human) at 12:45 (Placement:  2nd)"));
        assert_eq!(json["report"]["player"]["outcome"], "eliminated");
    }

    #[tokio::test]
    async fn test_result_out_of_range_index_is_roster_only() {
        let state = test_state();
        let session_id = upload_fixture(&state).await;

        let (status, json) =
            request(&state, json!({ "sessionId": session_id, "playerIndex": 99 })).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["report"]["player"].is_null());
    }

    #[tokio::test]
    async fn test_result_unknown_session() {
        let state = test_state();
        let (status, json) =
            request(&state, json!({ "sessionId": "deadbeef", "playerIndex": 0 })).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_result_empty_session() {
        let state = test_state();
        let (status, _) = request(&state, json!({ "sessionId": "  ", "playerIndex": 0 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_result_includes_platform_when_enabled() {
        let mut state = test_state();
        let mut config = (*state.config).clone();
        config.report.include_platform = true;
        state.config = std::sync::Arc::new(config);
        let session_id = upload_fixture(&state).await;

        let (_, json) = request(&state, json!({ "sessionId": session_id })).await;
        assert!(json["result"].as_str().unwrap().contains("========= Platform"));
    }
}
