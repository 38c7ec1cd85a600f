use async_trait::async_trait;

use crate::db::connection::Database;
use crate::db::repository::{
    CandidateRepository, InsightRepository, RosterRepository, SceneRepository, ScoreRepository,
};
use crate::db::traits::{
    CandidateStore, InsightStore, RadarBackend, RosterStore, SceneStore, ScoreStore,
};
use crate::error::Result;
use crate::models::{
    Candidate, CandidateFilter, Insight, RankAxis, RosterMember, SceneScoreStats, SceneSummary,
    ScoreSnapshot, ScoredCandidate,
};

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CandidateStore for LibSqlBackend {
    async fn get_candidate_by_slug(&self, slug: &str) -> Result<Option<Candidate>> {
        let conn = self.db.connect()?;
        CandidateRepository::get_by_slug(&conn, slug).await
    }
    async fn get_candidate_by_id(&self, id: &str) -> Result<Option<Candidate>> {
        let conn = self.db.connect()?;
        CandidateRepository::get_by_id(&conn, id).await
    }
    async fn list_candidates(
        &self,
        filter: &CandidateFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Candidate>> {
        let conn = self.db.connect()?;
        CandidateRepository::list(&conn, filter, limit, offset).await
    }
    async fn upsert_candidate(&self, candidate: &Candidate) -> Result<()> {
        let conn = self.db.connect()?;
        CandidateRepository::upsert(&conn, candidate).await
    }
}

#[async_trait]
impl ScoreStore for LibSqlBackend {
    async fn get_latest_score(&self, candidate_id: &str) -> Result<Option<ScoreSnapshot>> {
        let conn = self.db.connect()?;
        ScoreRepository::get_latest(&conn, candidate_id).await
    }
    async fn get_score_history(&self, candidate_id: &str, limit: usize) -> Result<Vec<ScoreSnapshot>> {
        let conn = self.db.connect()?;
        ScoreRepository::get_history(&conn, candidate_id, limit).await
    }
    async fn save_score_snapshot(&self, snapshot: &ScoreSnapshot) -> Result<()> {
        let conn = self.db.connect()?;
        ScoreRepository::create(&conn, snapshot).await
    }
    async fn top_scored_candidates(&self, axis: RankAxis, limit: usize) -> Result<Vec<ScoredCandidate>> {
        let conn = self.db.connect()?;
        ScoreRepository::top_by_axis(&conn, axis, limit).await
    }
    async fn list_scored_candidates(&self, limit: usize) -> Result<Vec<ScoredCandidate>> {
        let conn = self.db.connect()?;
        ScoreRepository::list_latest(&conn, limit).await
    }
    async fn scene_score_stats(&self) -> Result<Vec<SceneScoreStats>> {
        let conn = self.db.connect()?;
        ScoreRepository::scene_stats(&conn).await
    }
}

#[async_trait]
impl SceneStore for LibSqlBackend {
    async fn get_scene_by_slug(&self, slug: &str) -> Result<Option<SceneSummary>> {
        let conn = self.db.connect()?;
        SceneRepository::get_by_slug(&conn, slug).await
    }
    async fn upsert_scene(&self, scene: &SceneSummary) -> Result<()> {
        let conn = self.db.connect()?;
        SceneRepository::upsert(&conn, scene).await
    }
}

#[async_trait]
impl InsightStore for LibSqlBackend {
    async fn save_insight(&self, insight: &Insight) -> Result<()> {
        let conn = self.db.connect()?;
        InsightRepository::create(&conn, insight).await
    }
    async fn list_insights(&self, user_id: &str, limit: usize) -> Result<Vec<Insight>> {
        let conn = self.db.connect()?;
        InsightRepository::list_for_user(&conn, user_id, limit).await
    }
    async fn cleanup_old_insights(&self, user_id: &str, keep: usize) -> Result<u64> {
        let conn = self.db.connect()?;
        InsightRepository::cleanup_old(&conn, user_id, keep).await
    }
}

#[async_trait]
impl RosterStore for LibSqlBackend {
    async fn get_roster_members(&self, roster_id: &str) -> Result<Vec<RosterMember>> {
        let conn = self.db.connect()?;
        RosterRepository::get_members(&conn, roster_id).await
    }
    async fn add_roster_member(&self, roster_id: &str, artist_slug: &str) -> Result<RosterMember> {
        let conn = self.db.connect()?;
        RosterRepository::add_member(&conn, roster_id, artist_slug).await
    }
    async fn remove_roster_member(&self, roster_id: &str, artist_slug: &str) -> Result<bool> {
        let conn = self.db.connect()?;
        RosterRepository::remove_member(&conn, roster_id, artist_slug).await
    }
}

#[async_trait]
impl RadarBackend for LibSqlBackend {
    async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    async fn backend() -> (Arc<dyn RadarBackend>, NamedTempFile) {
        let file = NamedTempFile::new().unwrap();
        let config = DatabaseConfig::local(format!("file:{}", file.path().display()));
        let db = Database::new(&config).await.unwrap();
        (Arc::new(LibSqlBackend::new(db)), file)
    }

    #[tokio::test]
    async fn test_backend_round_trips_through_trait_objects() {
        let (db, _file) = backend().await;

        let candidate = Candidate::new("nova", "Nova").with_scene("uk-drill");
        db.upsert_candidate(&candidate).await.unwrap();
        db.add_roster_member("r1", "nova").await.unwrap();

        let fetched = db.get_candidate_by_slug("nova").await.unwrap().unwrap();
        assert_eq!(fetched.id, candidate.id);
        assert!(db.get_latest_score(&candidate.id).await.unwrap().is_none());
        assert_eq!(db.get_roster_members("r1").await.unwrap().len(), 1);
        assert!(db.sync().await.is_ok());
    }
}
