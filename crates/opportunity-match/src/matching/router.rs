use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::error;

use super::service::{MatchingService, MatchingServiceError, RankingRequest};

/// Router exposing the ranking pipeline as JSON over HTTP.
pub fn matching_router(service: Arc<MatchingService>) -> Router {
    Router::new()
        .route("/api/v1/opportunities/rank", post(rank_handler))
        .with_state(service)
}

pub(crate) async fn rank_handler(
    State(service): State<Arc<MatchingService>>,
    request: Result<axum::Json<RankingRequest>, JsonRejection>,
) -> Response {
    let axum::Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            let payload = json!({
                "error": rejection.body_text(),
            });
            return (rejection.status(), axum::Json(payload)).into_response();
        }
    };

    match service.rank_request(request) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(MatchingServiceError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(error = %other, "ranking failed");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
