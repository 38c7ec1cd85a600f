use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: String,
    /// `"configured"` when a signal service URL is set. Without one every
    /// refresh produces a partial snapshot.
    pub signals: String,
}

/// `GET /api/v1/health`
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let database = match state.db.sync().await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Health check database sync failed");
            "error"
        }
    };

    let signals = if state.signals_configured {
        "configured"
    } else {
        "unconfigured"
    };

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        signals: signals.to_string(),
    })
}
