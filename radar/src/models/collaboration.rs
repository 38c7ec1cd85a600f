use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityComponents {
    pub network_overlap: f64,
    pub scene_overlap: f64,
    pub creative_complementarity: f64,
}

/// A computed pairing between two candidates. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationRecommendation {
    pub artist_a: String,
    pub artist_b: String,
    pub compatibility: f64,
    pub components: CompatibilityComponents,
    pub shared_network_nodes: Vec<String>,
    pub shared_scenes: Vec<String>,
    pub shared_motifs: Vec<String>,
    pub justification: Vec<String>,
}
