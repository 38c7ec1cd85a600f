#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tempfile::NamedTempFile;

use radar::config::DatabaseConfig;
use radar::db::{Database, LibSqlBackend, RadarBackend};
use radar::error::Result;
use radar::models::{Candidate, DimensionScores, MomentumDirection, ScoreSnapshot};
use radar::signals::{CampaignContext, CreativeContext, NetworkContext, SceneContext, SignalAdapter};

/// A file-backed store that lives as long as the returned temp file.
pub async fn backend() -> (Arc<dyn RadarBackend>, NamedTempFile) {
    let file = NamedTempFile::new().expect("temp file");
    let config = DatabaseConfig::local(format!("file:{}", file.path().display()));
    let db = Database::new(&config).await.expect("open database");
    (Arc::new(LibSqlBackend::new(db)), file)
}

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

pub async fn seed(
    db: &Arc<dyn RadarBackend>,
    slug: &str,
    scene: Option<&str>,
    tweak: impl FnOnce(&mut ScoreSnapshot),
) -> Candidate {
    let mut candidate = Candidate::new(slug, slug.to_uppercase());
    if let Some(scene) = scene {
        candidate = candidate.with_scene(scene);
    }
    db.upsert_candidate(&candidate).await.expect("upsert candidate");

    let mut snap = snapshot(&candidate.id);
    tweak(&mut snap);
    db.save_score_snapshot(&snap).await.expect("save snapshot");
    candidate
}

/// Canned network, scene and motif data per artist slug.
#[derive(Default)]
pub struct StubAdapter {
    network: HashMap<String, Vec<String>>,
    scenes: HashMap<String, Vec<String>>,
    motifs: HashMap<String, Vec<String>>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl StubAdapter {
    pub fn with_network(mut self, slug: &str, nodes: &[&str]) -> Self {
        self.network.insert(slug.to_string(), owned(nodes));
        self
    }

    pub fn with_scenes(mut self, slug: &str, scenes: &[&str]) -> Self {
        self.scenes.insert(slug.to_string(), owned(scenes));
        self
    }

    pub fn with_motifs(mut self, slug: &str, motifs: &[&str]) -> Self {
        self.motifs.insert(slug.to_string(), owned(motifs));
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

    async fn scene_context(&self, artist_slug: &str) -> Result<SceneContext> {
        Ok(SceneContext {
            active_scenes: self.scenes.get(artist_slug).cloned().unwrap_or_default(),
            ..Default::default()
        })
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
