use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type Metadata = HashMap<String, serde_json::Value>;

/// Axis a top-N ranking is ordered by. At-risk ranks by risk descending,
/// the others by their score descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankAxis {
    Momentum,
    Breakout,
    Risk,
}

impl std::fmt::Display for RankAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Momentum => write!(f, "momentum"),
            Self::Breakout => write!(f, "breakout"),
            Self::Risk => write!(f, "risk"),
        }
    }
}
