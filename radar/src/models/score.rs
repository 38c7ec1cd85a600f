use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MomentumDirection {
    StronglyUp,
    ModeratelyUp,
    #[default]
    Flat,
    ModeratelyDown,
    StronglyDown,
}

impl MomentumDirection {
    pub fn is_upward(self) -> bool {
        matches!(self, Self::StronglyUp | Self::ModeratelyUp)
    }
}

impl std::fmt::Display for MomentumDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StronglyUp => write!(f, "strongly-up"),
            Self::ModeratelyUp => write!(f, "moderately-up"),
            Self::Flat => write!(f, "flat"),
            Self::ModeratelyDown => write!(f, "moderately-down"),
            Self::StronglyDown => write!(f, "strongly-down"),
        }
    }
}

impl std::str::FromStr for MomentumDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "strongly-up" => Ok(Self::StronglyUp),
            "moderately-up" => Ok(Self::ModeratelyUp),
            "flat" => Ok(Self::Flat),
            "moderately-down" => Ok(Self::ModeratelyDown),
            "strongly-down" => Ok(Self::StronglyDown),
            _ => Err(format!("Unknown momentum direction: {s}")),
        }
    }
}

/// The normalized inputs a snapshot is derived from.
///
/// The five dimensions and identity alignment lie in [0,1]; coverage
/// velocity is signed and lies in [-1,1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScores {
    pub network_connectivity: f64,
    pub scene_alignment: f64,
    pub creative_shift: f64,
    pub press_quality: f64,
    pub campaign_efficiency: f64,
    pub identity_alignment: f64,
    pub coverage_velocity: f64,
}

/// An immutable, timestamped score record for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    pub id: String,
    pub candidate_id: String,
    #[serde(flatten)]
    pub dimensions: DimensionScores,
    pub momentum: f64,
    pub momentum_direction: MomentumDirection,
    pub breakout_probability: f64,
    pub risk: f64,
    pub composite: f64,
    /// Set when one or more signal adapters failed and neutral defaults
    /// stood in for their values.
    pub partial: bool,
    pub model_version: String,
    pub explanation: String,
    pub snapshot_at: DateTime<Utc>,
}

/// A candidate joined with its latest snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub snapshot: ScoreSnapshot,
}

/// Latest-snapshot totals for one primary scene, over every scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneScoreStats {
    pub scene_slug: String,
    pub candidate_count: usize,
    pub average_composite: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn direction_round_trips_through_text() {
        for direction in [
            MomentumDirection::StronglyUp,
            MomentumDirection::ModeratelyUp,
            MomentumDirection::Flat,
            MomentumDirection::ModeratelyDown,
            MomentumDirection::StronglyDown,
        ] {
            let parsed = MomentumDirection::from_str(&direction.to_string()).unwrap();
            assert_eq!(parsed, direction);
        }
    }

    #[test]
    fn direction_accepts_snake_case() {
        assert_eq!(
            MomentumDirection::from_str("strongly_up").unwrap(),
            MomentumDirection::StronglyUp
        );
        assert!(MomentumDirection::from_str("sideways").is_err());
    }

    #[test]
    fn only_up_directions_are_upward() {
        assert!(MomentumDirection::StronglyUp.is_upward());
        assert!(MomentumDirection::ModeratelyUp.is_upward());
        assert!(!MomentumDirection::Flat.is_upward());
        assert!(!MomentumDirection::StronglyDown.is_upward());
    }

    #[test]
    fn direction_serializes_kebab_case() {
        let json = serde_json::to_string(&MomentumDirection::ModeratelyDown).unwrap();
        assert_eq!(json, "\"moderately-down\"");
    }
}
