//! v1 per-artist handlers.

use axum::extract::{Path, State};

use crate::api::v1::dto::ProfileQuery;
use crate::api::v1::extract::ValidatedQuery;
use crate::api::v1::response::{ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::models::{CandidateProfile, ScoreSnapshot};

/// `GET /api/v1/artists/{slug}/profile`
pub async fn get_profile(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ValidatedQuery(query): ValidatedQuery<ProfileQuery>,
) -> ApiResponse<CandidateProfile> {
    match state.radar.build_artist_profile(&slug, query.skip_cache).await {
        Ok(Some(profile)) => ApiResponse::success(profile),
        Ok(None) => ApiResponse::error(
            ErrorCode::NotFound,
            format!("No scored artist with slug '{slug}'"),
        ),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/artists/{slug}/scores:refresh`
///
/// Recomputes the artist's snapshot immediately and drops any cached views
/// that include it.
pub async fn refresh_scores(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResponse<ScoreSnapshot> {
    match state.refresher.refresh_candidate(&slug).await {
        Ok(Some(snapshot)) => ApiResponse::success(snapshot),
        Ok(None) => ApiResponse::error(
            ErrorCode::NotFound,
            format!("No artist with slug '{slug}'"),
        ),
        Err(e) => e.into(),
    }
}
