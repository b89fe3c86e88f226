//! Report handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use fleetwatch_health::ReportError;

use crate::ApiState;

/// Body returned when no report could be built.
#[derive(serde::Serialize)]
struct UnavailableResponse {
    ok: bool,
    error: String,
}

fn unavailable_response(err: &ReportError) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(UnavailableResponse {
            ok: false,
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// GET / and GET /__health
pub async fn health_report(State(state): State<ApiState>) -> Response {
    match state.health.build_report().await {
        Ok(report) => Json(report).into_response(),
        Err(e) => unavailable_response(&e),
    }
}
