//! v1 cache administration handlers.

use axum::extract::State;

use crate::api::v1::dto::{ClearCacheQuery, ClearCacheResponse};
use crate::api::v1::extract::ValidatedQuery;
use crate::api::v1::response::ApiResponse;
use crate::api::AppState;
use crate::services::RadarCacheStats;

/// `GET /api/v1/admin/cache`
pub async fn cache_stats(State(state): State<AppState>) -> ApiResponse<RadarCacheStats> {
    ApiResponse::success(state.radar.cache_stats())
}

/// `DELETE /api/v1/admin/cache[?slug=..]`
pub async fn clear_cache(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ClearCacheQuery>,
) -> ApiResponse<ClearCacheResponse> {
    state.radar.clear_cache(query.slug.as_deref());
    tracing::info!(slug = ?query.slug, "Radar cache cleared");

    ApiResponse::success(ClearCacheResponse {
        cleared: query.slug.unwrap_or_else(|| "all".to_string()),
    })
}
