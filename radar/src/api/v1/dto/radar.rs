use serde::Deserialize;
use validator::Validate;

/// `GET /api/v1/pulse`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PulseQuery {
    /// Entries per ranked list. The service enforces the configured maximum.
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,
    #[serde(default)]
    pub skip_cache: bool,
}

/// `GET /api/v1/artists/{slug}/profile`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
    #[serde(default)]
    pub skip_cache: bool,
}
