use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Insight, InsightType};

/// `GET /api/v1/users/{userId}/insights`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListInsightsQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
}

/// Result of `POST /api/v1/users/{userId}/insights:generate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInsightsResponse {
    pub user_id: String,
    pub total: usize,
    pub insights: HashMap<InsightType, Vec<Insight>>,
}

impl GenerateInsightsResponse {
    pub fn new(user_id: impl Into<String>, insights: HashMap<InsightType, Vec<Insight>>) -> Self {
        Self {
            user_id: user_id.into(),
            total: insights.values().map(Vec::len).sum(),
            insights,
        }
    }
}
