//! Route handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use super::types::{BadgeQuery, ErrorResponse, HealthResponse, HeartbeatResponse};
use super::{AppError, AppState};

/// POST /api/heartbeat - Record a heartbeat.
pub(crate) async fn heartbeat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<HeartbeatResponse>, AppError> {
    let ack = state.ingestor.ingest(&body).await?;
    Ok(Json(HeartbeatResponse {
        success: true,
        public_id: ack.public_id,
        message: ack.message.to_string(),
    }))
}

/// GET /api/badge - Render a status badge. Always answers with an SVG.
pub(crate) async fn badge(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let query = BadgeQuery::from_pairs(pairs);
    let badge = state
        .renderer
        .render(
            query.id.as_deref(),
            query.badge_type.as_deref(),
            &query.options,
        )
        .await;

    let status = StatusCode::from_u16(badge.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, badge.cache_control.as_str()),
        ],
        badge.svg,
    )
        .into_response()
}

/// GET /health - Liveness probe.
pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: state.clock.now_millis(),
    })
}

/// GET /metrics - Prometheus text exposition.
pub(crate) async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => not_found().await.into_response(),
    }
}

/// Fallback for unknown routes.
pub(crate) async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
}
