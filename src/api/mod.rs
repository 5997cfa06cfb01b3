//! REST API endpoints.
//!
//! Axum-based HTTP API behind the companion web page: upload a replay,
//! pick a player, read the report, export the decoded data.

pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::warn;

use self::state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Build the application router: API routes, then the web page as fallback.
pub fn build_router(state: AppState) -> Router {
    let server = state.config.server.clone();

    let index = server.static_dir.join("index.html");
    let web_page = ServeDir::new(&server.static_dir).not_found_service(ServeFile::new(index));

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/upload", post(routes::upload::upload_replay))
        .route("/api/result", post(routes::result::match_result))
        .route("/api/export/:session_id", get(routes::export::export_replay))
        .route("/api/session/:session_id", delete(routes::session::delete_session))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .with_state(state)
        .fallback_service(web_page)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_origin))
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Invalid CORS origin {:?}, allowing any origin", origin);
            layer.allow_origin(Any)
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        let resp = ApiError::NotFound("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = ApiError::BadRequest("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = ApiError::Internal("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_api_error_body() {
        let resp = ApiError::NotFound("Session not found".into()).into_response();
        let (status, json) = read_json(resp).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Not found: Session not found");
    }

    #[tokio::test]
    async fn test_health() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::util::ServiceExt;

        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_unknown_path_without_web_page_is_404() {
        let app = build_router(test_state());
        let (status, _) = get_json(app, "/no/such/page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_cors_layer_accepts_bad_origin() {
        // Falls back to any origin instead of panicking.
        let _ = cors_layer("bad\norigin");
        let _ = cors_layer("http://localhost:3000");
        let _ = cors_layer("*");
    }
}
