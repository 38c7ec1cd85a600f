use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Candidate, CandidateFilter, Insight, RankAxis, RosterMember, SceneScoreStats, SceneSummary,
    ScoreSnapshot, ScoredCandidate,
};

// ---------------------------------------------------------------------------
// Individual store traits
// ---------------------------------------------------------------------------

/// Lookup and ingestion of tracked artists.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn get_candidate_by_slug(&self, slug: &str) -> Result<Option<Candidate>>;
    async fn get_candidate_by_id(&self, id: &str) -> Result<Option<Candidate>>;
    async fn list_candidates(
        &self,
        filter: &CandidateFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Candidate>>;
    async fn upsert_candidate(&self, candidate: &Candidate) -> Result<()>;
}

/// Score history and latest-snapshot rankings.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn get_latest_score(&self, candidate_id: &str) -> Result<Option<ScoreSnapshot>>;
    async fn get_score_history(&self, candidate_id: &str, limit: usize) -> Result<Vec<ScoreSnapshot>>;
    async fn save_score_snapshot(&self, snapshot: &ScoreSnapshot) -> Result<()>;
    async fn top_scored_candidates(&self, axis: RankAxis, limit: usize) -> Result<Vec<ScoredCandidate>>;
    async fn list_scored_candidates(&self, limit: usize) -> Result<Vec<ScoredCandidate>>;
    async fn scene_score_stats(&self) -> Result<Vec<SceneScoreStats>>;
}

#[async_trait]
pub trait SceneStore: Send + Sync {
    async fn get_scene_by_slug(&self, slug: &str) -> Result<Option<SceneSummary>>;
    async fn upsert_scene(&self, scene: &SceneSummary) -> Result<()>;
}

#[async_trait]
pub trait InsightStore: Send + Sync {
    async fn save_insight(&self, insight: &Insight) -> Result<()>;
    async fn list_insights(&self, user_id: &str, limit: usize) -> Result<Vec<Insight>>;
    async fn cleanup_old_insights(&self, user_id: &str, keep: usize) -> Result<u64>;
}

#[async_trait]
pub trait RosterStore: Send + Sync {
    async fn get_roster_members(&self, roster_id: &str) -> Result<Vec<RosterMember>>;
    async fn add_roster_member(&self, roster_id: &str, artist_slug: &str) -> Result<RosterMember>;
    async fn remove_roster_member(&self, roster_id: &str, artist_slug: &str) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// Unified backend supertrait
// ---------------------------------------------------------------------------

/// A complete store backend combining every store trait plus lifecycle
/// operations.
#[async_trait]
pub trait RadarBackend:
    CandidateStore + ScoreStore + SceneStore + InsightStore + RosterStore
{
    /// Sync with remote (e.g. Turso replication). No-op for local-only backends.
    async fn sync(&self) -> Result<()>;
}
