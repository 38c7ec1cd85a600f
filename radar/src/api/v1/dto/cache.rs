use serde::{Deserialize, Serialize};
use validator::Validate;

/// `DELETE /api/v1/admin/cache`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ClearCacheQuery {
    #[validate(length(min = 1, max = 200))]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    /// The slug whose entries were dropped, or `"all"`.
    pub cleared: String,
}
