//! v1 insight handlers.

use axum::extract::{Path, State};

use crate::api::v1::dto::{GenerateInsightsResponse, ListInsightsQuery};
use crate::api::v1::extract::ValidatedQuery;
use crate::api::v1::response::{ApiResponse, ResponseMeta};
use crate::api::AppState;
use crate::models::Insight;

/// `POST /api/v1/users/{userId}/insights:generate`
pub async fn generate_insights(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResponse<GenerateInsightsResponse> {
    match state.insights.generate_insights_for_user(&user_id).await {
        Ok(insights) => ApiResponse::success(GenerateInsightsResponse::new(user_id, insights)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/users/{userId}/insights`
pub async fn list_insights(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedQuery(query): ValidatedQuery<ListInsightsQuery>,
) -> ApiResponse<Vec<Insight>> {
    let insights = match state.insights.list_insights(&user_id, query.limit).await {
        Ok(insights) => insights,
        Err(e) => return e.into(),
    };

    let total = insights.len() as u64;
    ApiResponse::success_with_meta(insights, ResponseMeta { total: Some(total) })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::api::v1::dto::GenerateInsightsResponse;
    use crate::models::InsightType;

    #[test]
    fn generate_response_counts_every_type() {
        let mut insights = HashMap::new();
        insights.insert(InsightType::RosterGap, Vec::new());
        let resp = GenerateInsightsResponse::new("u1", insights);
        assert_eq!(resp.total, 0);

        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["userId"], "u1");
        assert!(json["insights"].is_object());
    }
}
