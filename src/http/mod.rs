//! HTTP surface.
//!
//! | route | handler |
//! |---|---|
//! | `POST /api/heartbeat` | [`HeartbeatIngestor`] |
//! | `GET /api/badge` | [`BadgeRenderer`] |
//! | `GET /health` | liveness probe |
//! | `GET /metrics` | Prometheus exposition, when a recorder is installed |

mod handlers;
mod types;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::badge::BadgeRenderer;
use crate::clock::Clock;
use crate::error::Error;
use crate::heartbeat::HeartbeatIngestor;

pub use self::types::{ErrorResponse, HealthResponse, HeartbeatResponse};

/// How long browsers may cache a CORS preflight.
const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub ingestor: HeartbeatIngestor,
    pub renderer: BadgeRenderer,
    pub clock: Arc<dyn Clock>,
    /// Set when a Prometheus recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

/// Error returned from JSON handlers.
///
/// Renders as `{"error": "..."}` with the status of the wrapped [`Error`].
#[derive(Debug)]
pub struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.0.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE);

    Router::new()
        .route("/api/heartbeat", post(handlers::heartbeat))
        .route("/api/badge", get(handlers::badge))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
