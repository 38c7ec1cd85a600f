mod candidates;
mod insights;
mod rosters;
mod scenes;
mod scores;

pub use candidates::CandidateRepository;
pub use insights::InsightRepository;
pub use rosters::RosterRepository;
pub use scenes::SceneRepository;
pub use scores::ScoreRepository;

use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width UTC timestamps so text ordering matches time ordering.
pub(crate) fn format_ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
