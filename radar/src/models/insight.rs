use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsightType {
    CandidateToWatch,
    SceneOpportunity,
    RosterGap,
    CampaignPotential,
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CandidateToWatch => write!(f, "candidate-to-watch"),
            Self::SceneOpportunity => write!(f, "scene-opportunity"),
            Self::RosterGap => write!(f, "roster-gap"),
            Self::CampaignPotential => write!(f, "campaign-potential"),
        }
    }
}

impl std::str::FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "candidate-to-watch" => Ok(Self::CandidateToWatch),
            "scene-opportunity" => Ok(Self::SceneOpportunity),
            "roster-gap" => Ok(Self::RosterGap),
            "campaign-potential" => Ok(Self::CampaignPotential),
            _ => Err(format!("Unknown insight type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightContent {
    pub title: String,
    pub description: String,
    pub priority: InsightPriority,
    pub artist_slugs: Vec<String>,
    pub scene_slugs: Vec<String>,
    pub recommendations: Vec<String>,
}

/// A persisted, user-scoped insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub content: InsightContent,
    pub created_at: DateTime<Utc>,
}

impl Insight {
    pub fn new(user_id: impl Into<String>, insight_type: InsightType, content: InsightContent) -> Self {
        Self {
            id: nanoid!(),
            user_id: user_id.into(),
            insight_type,
            content,
            created_at: Utc::now(),
        }
    }
}
