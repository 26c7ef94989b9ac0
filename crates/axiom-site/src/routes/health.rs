//! Health check endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
}

/// Basic health check (is the server running?)
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime_secs(),
    })
}

#[derive(Serialize)]
pub struct ReadyResponse {
    status: &'static str,
    captcha: bool,
    email: bool,
}

/// Readiness check (can submissions succeed?)
pub async fn ready_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadyResponse>) {
    let captcha = state.captcha_verifier.is_configured();
    let email = state.mailer.is_configured();

    let (status, label) = if captcha && email {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    };

    (
        status,
        Json(ReadyResponse {
            status: label,
            captcha,
            email,
        }),
    )
}
