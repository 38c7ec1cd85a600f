//! v1 collaboration pairing handlers.

use axum::extract::{Path, State};

use crate::api::v1::dto::{AssessPairingQuery, RosterCollaborationQuery};
use crate::api::v1::extract::ValidatedQuery;
use crate::api::v1::response::{ApiResponse, ErrorCode, ResponseMeta};
use crate::api::AppState;
use crate::models::CollaborationRecommendation;

/// `GET /api/v1/collaborations:assess?a=..&b=..`
pub async fn assess_pairing(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<AssessPairingQuery>,
) -> ApiResponse<CollaborationRecommendation> {
    match state.collaborations.assess_pairing(&query.a, &query.b).await {
        Ok(Some(rec)) => ApiResponse::success(rec),
        Ok(None) => ApiResponse::error(
            ErrorCode::NotFound,
            "Both artists must exist and have at least one score snapshot",
        ),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/rosters/{rosterId}/collaborations`
pub async fn roster_collaborations(
    State(state): State<AppState>,
    Path(roster_id): Path<String>,
    ValidatedQuery(query): ValidatedQuery<RosterCollaborationQuery>,
) -> ApiResponse<Vec<CollaborationRecommendation>> {
    let result = state
        .collaborations
        .suggest_collabs_within_roster(&roster_id, query.min_compatibility)
        .await;
    with_total(result)
}

/// `GET /api/v1/rosters/{rosterId}/collaborations/{slug}`
pub async fn candidate_collaborations(
    State(state): State<AppState>,
    Path((roster_id, slug)): Path<(String, String)>,
    ValidatedQuery(query): ValidatedQuery<RosterCollaborationQuery>,
) -> ApiResponse<Vec<CollaborationRecommendation>> {
    let result = state
        .collaborations
        .suggest_roster_candidate_collabs(&roster_id, &slug, query.min_compatibility)
        .await;
    with_total(result)
}

fn with_total(
    result: crate::error::Result<Vec<CollaborationRecommendation>>,
) -> ApiResponse<Vec<CollaborationRecommendation>> {
    match result {
        Ok(pairs) => {
            let total = pairs.len() as u64;
            ApiResponse::success_with_meta(pairs, ResponseMeta { total: Some(total) })
        }
        Err(e) => e.into(),
    }
}
