use axum::extract::State;

use crate::api::v1::dto::PulseQuery;
use crate::api::v1::extract::ValidatedQuery;
use crate::api::v1::response::ApiResponse;
use crate::api::AppState;
use crate::models::GlobalPulse;

/// `GET /api/v1/pulse`
pub async fn get_pulse(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PulseQuery>,
) -> ApiResponse<GlobalPulse> {
    match state
        .radar
        .build_global_pulse(query.limit, query.skip_cache)
        .await
    {
        Ok(pulse) => ApiResponse::success(pulse),
        Err(e) => e.into(),
    }
}
