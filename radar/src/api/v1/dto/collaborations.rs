use serde::Deserialize;
use validator::Validate;

/// `GET /api/v1/collaborations:assess`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssessPairingQuery {
    #[validate(length(min = 1, max = 200))]
    pub a: String,
    #[validate(length(min = 1, max = 200))]
    pub b: String,
}

/// `GET /api/v1/rosters/{rosterId}/collaborations[/{slug}]`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RosterCollaborationQuery {
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_compatibility: Option<f64>,
}
