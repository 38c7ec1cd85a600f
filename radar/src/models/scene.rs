use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate view of a genre/scene cluster, maintained by an external job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSummary {
    pub slug: String,
    pub display_name: String,
    pub node_count: i64,
    pub edge_count: i64,
    /// Nodes added within the rolling window.
    pub new_node_count: i64,
    pub growth_rate: f64,
    pub trending_subgenres: Vec<String>,
    pub updated_at: DateTime<Utc>,
}
