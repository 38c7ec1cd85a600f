use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info};

use crate::db::RadarBackend;
use crate::error::Result;
use crate::models::{Candidate, CandidateFilter, ScoreSnapshot};
use crate::scoring::ScoreComputer;
use crate::services::RadarService;

const PAGE_SIZE: usize = 200;

/// Background manager that recomputes every candidate's score snapshot.
#[derive(Clone)]
pub struct ScoreRefreshManager {
    db: Arc<dyn RadarBackend>,
    computer: ScoreComputer,
    radar: RadarService,
    batch_size: usize,
    interval_secs: u64,
}

impl ScoreRefreshManager {
    pub fn new(
        db: Arc<dyn RadarBackend>,
        computer: ScoreComputer,
        radar: RadarService,
        batch_size: usize,
        interval_secs: u64,
    ) -> Self {
        Self {
            db,
            computer,
            radar,
            batch_size: batch_size.max(1),
            interval_secs,
        }
    }

    /// Score all candidates, `batch_size` at a time. Failures on individual
    /// candidates are logged and skipped. Returns the number refreshed.
    pub async fn run_once(&self) -> Result<u64> {
        info!(batch_size = self.batch_size, "Starting score refresh");

        let mut refreshed = 0u64;
        let mut failed = 0u64;
        let mut offset = 0;

        loop {
            let page = self
                .db
                .list_candidates(&CandidateFilter::default(), PAGE_SIZE, offset)
                .await?;
            if page.is_empty() {
                break;
            }
            offset += page.len();

            for batch in page.chunks(self.batch_size) {
                let results = join_all(batch.iter().map(|c| self.refresh(c))).await;
                for (candidate, result) in batch.iter().zip(results) {
                    match result {
                        Ok(_) => refreshed += 1,
                        Err(e) => {
                            failed += 1;
                            error!(artist_slug = %candidate.artist_slug, error = %e, "Failed to refresh score");
                        }
                    }
                }
            }

            if page.len() < PAGE_SIZE {
                break;
            }
        }

        if refreshed > 0 {
            self.radar.clear_cache(None);
        }

        info!(refreshed, failed, "Score refresh complete");
        Ok(refreshed)
    }

    /// Recompute one artist now. `Ok(None)` when the slug is unknown.
    pub async fn refresh_candidate(&self, artist_slug: &str) -> Result<Option<ScoreSnapshot>> {
        let Some(candidate) = self.db.get_candidate_by_slug(artist_slug).await? else {
            return Ok(None);
        };
        let snapshot = self.refresh(&candidate).await?;
        self.radar.clear_cache(Some(artist_slug));
        Ok(Some(snapshot))
    }

    async fn refresh(&self, candidate: &Candidate) -> Result<ScoreSnapshot> {
        let prior = self.db.get_latest_score(&candidate.id).await?;
        let snapshot = self.computer.compute(candidate, prior.as_ref()).await;
        self.db.save_score_snapshot(&snapshot).await?;
        debug!(
            artist_slug = %candidate.artist_slug,
            direction = %snapshot.momentum_direction,
            "Saved score snapshot"
        );
        Ok(snapshot)
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }
}
