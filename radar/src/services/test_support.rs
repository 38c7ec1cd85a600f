//! Fixtures shared by the service tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tempfile::NamedTempFile;

use crate::config::DatabaseConfig;
use crate::db::{Database, LibSqlBackend, RadarBackend};
use crate::error::Result;
use crate::models::{Candidate, DimensionScores, MomentumDirection, ScoreSnapshot};
use crate::signals::{
    CampaignContext, CreativeContext, NetworkContext, SceneContext, SignalAdapter,
};

pub async fn backend() -> (Arc<dyn RadarBackend>, NamedTempFile) {
    let file = NamedTempFile::new().unwrap();
    let config = DatabaseConfig::local(format!("file:{}", file.path().display()));
    let db = Database::new(&config).await.unwrap();
    (Arc::new(LibSqlBackend::new(db)), file)
}

/// A healthy, unremarkable snapshot. Tests overwrite the fields they care
/// about.
pub fn snapshot(candidate_id: &str) -> ScoreSnapshot {
    ScoreSnapshot {
        id: nanoid::nanoid!(),
        candidate_id: candidate_id.to_string(),
        dimensions: DimensionScores {
            network_connectivity: 0.5,
            scene_alignment: 0.5,
            creative_shift: 0.5,
            press_quality: 0.5,
            campaign_efficiency: 0.5,
            identity_alignment: 0.5,
            coverage_velocity: 0.0,
        },
        momentum: 50.0,
        momentum_direction: MomentumDirection::Flat,
        breakout_probability: 0.5,
        risk: 0.0,
        composite: 0.5,
        partial: false,
        model_version: "test".to_string(),
        explanation: String::new(),
        snapshot_at: Utc::now(),
    }
}

/// Insert a candidate and its latest snapshot, letting `tweak` adjust the
/// snapshot first.
pub async fn seed<F>(
    db: &Arc<dyn RadarBackend>,
    slug: &str,
    scene: Option<&str>,
    tweak: F,
) -> Candidate
where
    F: FnOnce(&mut ScoreSnapshot),
{
    let mut candidate = Candidate::new(slug, slug.to_uppercase());
    if let Some(scene) = scene {
        candidate = candidate.with_scene(scene);
    }
    db.upsert_candidate(&candidate).await.unwrap();

    let mut snap = snapshot(&candidate.id);
    tweak(&mut snap);
    db.save_score_snapshot(&snap).await.unwrap();
    candidate
}

/// Adapter serving canned collaborators and motifs per artist. Unknown
/// artists get empty contexts.
#[derive(Default)]
pub struct StubAdapter {
    network: HashMap<String, Vec<String>>,
    motifs: HashMap<String, Vec<String>>,
}

impl StubAdapter {
    pub fn with_network(mut self, slug: &str, nodes: &[&str]) -> Self {
        self.network
            .insert(slug.to_string(), nodes.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_motifs(mut self, slug: &str, motifs: &[&str]) -> Self {
        self.motifs
            .insert(slug.to_string(), motifs.iter().map(|s| s.to_string()).collect());
        self
    }
}

#[async_trait]
impl SignalAdapter for StubAdapter {
    async fn network_context(&self, artist_slug: &str) -> Result<NetworkContext> {
        Ok(NetworkContext {
            collaborators: self.network.get(artist_slug).cloned().unwrap_or_default(),
            ..Default::default()
        })
    }

    async fn scene_context(&self, _artist_slug: &str) -> Result<SceneContext> {
        Ok(SceneContext::default())
    }

    async fn creative_context(&self, artist_slug: &str) -> Result<CreativeContext> {
        Ok(CreativeContext {
            motifs: self.motifs.get(artist_slug).cloned().unwrap_or_default(),
            ..Default::default()
        })
    }

    async fn campaign_context(&self, _artist_slug: &str) -> Result<CampaignContext> {
        Ok(CampaignContext::default())
    }
}
