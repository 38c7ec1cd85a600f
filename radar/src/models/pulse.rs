use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MomentumDirection, ScoredCandidate};

/// Global ranked summary across all tracked candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalPulse {
    pub generated_at: DateTime<Utc>,
    pub top_rising: Vec<PulseEntry>,
    pub top_breakout: Vec<PulseEntry>,
    pub top_at_risk: Vec<PulseEntry>,
    pub summary: PulseSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseEntry {
    pub artist_slug: String,
    pub display_name: String,
    pub primary_scene_slug: Option<String>,
    pub momentum: f64,
    pub momentum_direction: MomentumDirection,
    pub breakout_probability: f64,
    pub risk: f64,
    pub composite: f64,
}

/// Counters over the distinct candidates appearing in any pulse list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseSummary {
    pub total_artists_tracked: usize,
    pub average_momentum: f64,
    pub high_breakout_count: usize,
    pub high_risk_count: usize,
}

impl From<&ScoredCandidate> for PulseEntry {
    fn from(scored: &ScoredCandidate) -> Self {
        Self {
            artist_slug: scored.candidate.artist_slug.clone(),
            display_name: scored.candidate.display_name.clone(),
            primary_scene_slug: scored.candidate.primary_scene_slug.clone(),
            momentum: scored.snapshot.momentum,
            momentum_direction: scored.snapshot.momentum_direction,
            breakout_probability: scored.snapshot.breakout_probability,
            risk: scored.snapshot.risk,
            composite: scored.snapshot.composite,
        }
    }
}
