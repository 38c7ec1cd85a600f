use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::config::PairingConfig;
use crate::db::RadarBackend;
use crate::error::{RadarError, Result};
use crate::models::{Candidate, CollaborationRecommendation, CompatibilityComponents};
use crate::scoring::math::{complementarity, jaccard, round4, weighted_sum};
use crate::scoring::PairingWeights;
use crate::signals::{bounded, SignalAdapter};

/// Normalized identifier sets compared between two artists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairingFeatures {
    pub network_nodes: HashSet<String>,
    pub scenes: HashSet<String>,
    pub motifs: HashSet<String>,
}

fn normalize<'a, I>(ids: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    ids.into_iter()
        .map(|id| id.trim().to_lowercase())
        .filter(|id| !id.is_empty())
        .collect()
}

fn sorted_intersection(a: &HashSet<String>, b: &HashSet<String>) -> Vec<String> {
    let mut shared: Vec<String> = a.intersection(b).cloned().collect();
    shared.sort();
    shared
}

/// Score two artists' features. Pure; no I/O.
pub fn assess_features(
    weights: &PairingWeights,
    artist_a: &str,
    a: &PairingFeatures,
    artist_b: &str,
    b: &PairingFeatures,
) -> CollaborationRecommendation {
    let network_overlap = jaccard(&a.network_nodes, &b.network_nodes);
    let scene_overlap = jaccard(&a.scenes, &b.scenes);
    let creative_complementarity =
        complementarity(jaccard(&a.motifs, &b.motifs), weights.creative_peak);

    let compatibility = weighted_sum(&[
        (network_overlap, weights.network),
        (scene_overlap, weights.scene),
        (creative_complementarity, weights.creative),
    ]);

    let shared_network_nodes = sorted_intersection(&a.network_nodes, &b.network_nodes);
    let shared_scenes = sorted_intersection(&a.scenes, &b.scenes);
    let shared_motifs = sorted_intersection(&a.motifs, &b.motifs);

    let mut justification = Vec::new();
    if !shared_network_nodes.is_empty() {
        justification.push(format!(
            "Connected through {}",
            shared_network_nodes.join(", ")
        ));
    }
    if !shared_scenes.is_empty() {
        justification.push(format!("Both active in {}", shared_scenes.join(", ")));
    }
    if !shared_motifs.is_empty() {
        justification.push(format!(
            "Common creative ground in {}",
            shared_motifs.join(", ")
        ));
    }

    CollaborationRecommendation {
        artist_a: artist_a.to_string(),
        artist_b: artist_b.to_string(),
        compatibility: round4(compatibility),
        components: CompatibilityComponents {
            network_overlap: round4(network_overlap),
            scene_overlap: round4(scene_overlap),
            creative_complementarity: round4(creative_complementarity),
        },
        shared_network_nodes,
        shared_scenes,
        shared_motifs,
        justification,
    }
}

/// Compatibility between tracked artists, alone or across a roster.
#[derive(Clone)]
pub struct CollaborationService {
    db: Arc<dyn RadarBackend>,
    adapter: Arc<dyn SignalAdapter>,
    adapter_timeout: Duration,
    weights: PairingWeights,
    config: PairingConfig,
}

impl CollaborationService {
    pub fn new(
        db: Arc<dyn RadarBackend>,
        adapter: Arc<dyn SignalAdapter>,
        adapter_timeout: Duration,
        weights: PairingWeights,
        config: PairingConfig,
    ) -> Self {
        Self {
            db,
            adapter,
            adapter_timeout,
            weights,
            config,
        }
    }

    /// `Ok(None)` when either artist is unknown or unscored.
    pub async fn assess_pairing(
        &self,
        artist_a: &str,
        artist_b: &str,
    ) -> Result<Option<CollaborationRecommendation>> {
        let (a, b) = tokio::try_join!(self.scored_candidate(artist_a), self.scored_candidate(artist_b))?;
        let (Some(a), Some(b)) = (a, b) else {
            return Ok(None);
        };

        let (fa, fb) = tokio::join!(self.features(&a), self.features(&b));
        Ok(Some(assess_features(
            &self.weights,
            &a.artist_slug,
            &fa,
            &b.artist_slug,
            &fb,
        )))
    }

    /// Every member pair at or above `min_compatibility`, best first.
    pub async fn suggest_collabs_within_roster(
        &self,
        roster_id: &str,
        min_compatibility: Option<f64>,
    ) -> Result<Vec<CollaborationRecommendation>> {
        let min = self.min_compatibility(min_compatibility)?;
        let slugs = self.roster_slugs(roster_id).await?;
        let members = self.member_features(slugs).await;

        let mut pairs = Vec::new();
        for (i, (slug_a, fa)) in members.iter().enumerate() {
            for (slug_b, fb) in &members[i + 1..] {
                let rec = assess_features(&self.weights, slug_a, fa, slug_b, fb);
                if rec.compatibility >= min {
                    pairs.push(rec);
                }
            }
        }

        sort_recommendations(&mut pairs);
        debug!(roster_id, pairs = pairs.len(), "Assessed roster pairings");
        Ok(pairs)
    }

    /// One artist against each roster member. Empty when the artist is
    /// unknown or unscored.
    pub async fn suggest_roster_candidate_collabs(
        &self,
        roster_id: &str,
        artist_slug: &str,
        min_compatibility: Option<f64>,
    ) -> Result<Vec<CollaborationRecommendation>> {
        let min = self.min_compatibility(min_compatibility)?;
        let slugs = self.roster_slugs(roster_id).await?;

        let Some(candidate) = self.scored_candidate(artist_slug).await? else {
            return Ok(Vec::new());
        };
        let target = self.features(&candidate).await;

        let others = slugs
            .into_iter()
            .filter(|slug| slug != &candidate.artist_slug)
            .collect();
        let members = self.member_features(others).await;

        let mut pairs: Vec<_> = members
            .iter()
            .map(|(slug, features)| {
                assess_features(&self.weights, &candidate.artist_slug, &target, slug, features)
            })
            .filter(|rec| rec.compatibility >= min)
            .collect();

        sort_recommendations(&mut pairs);
        Ok(pairs)
    }

    fn min_compatibility(&self, requested: Option<f64>) -> Result<f64> {
        let min = requested.unwrap_or(self.config.min_compatibility);
        if !(0.0..=1.0).contains(&min) {
            return Err(RadarError::Validation(
                "minCompatibility must be between 0 and 1".to_string(),
            ));
        }
        Ok(min)
    }

    async fn roster_slugs(&self, roster_id: &str) -> Result<Vec<String>> {
        let members = self.db.get_roster_members(roster_id).await?;
        if members.len() > self.config.max_roster_size {
            return Err(RadarError::CapacityExceeded {
                what: "roster size",
                limit: self.config.max_roster_size,
                actual: members.len(),
            });
        }
        Ok(members.into_iter().map(|m| m.artist_slug).collect())
    }

    async fn scored_candidate(&self, artist_slug: &str) -> Result<Option<Candidate>> {
        let Some(candidate) = self.db.get_candidate_by_slug(artist_slug).await? else {
            return Ok(None);
        };
        if self.db.get_latest_score(&candidate.id).await?.is_none() {
            return Ok(None);
        }
        Ok(Some(candidate))
    }

    /// Features for each slug, fetched with bounded concurrency and returned
    /// in slug order. Members that fail to load are skipped.
    async fn member_features(&self, slugs: Vec<String>) -> Vec<(String, PairingFeatures)> {
        let concurrency = self.config.concurrency.max(1);
        let mut loaded: Vec<(String, PairingFeatures)> = stream::iter(slugs)
            .map(|slug| async move {
                match self.scored_candidate(&slug).await {
                    Ok(Some(candidate)) => Some((slug, self.features(&candidate).await)),
                    Ok(None) => {
                        debug!(artist_slug = %slug, "Roster member is unknown or unscored");
                        None
                    }
                    Err(e) => {
                        warn!(artist_slug = %slug, error = %e, "Failed to load roster member");
                        None
                    }
                }
            })
            .buffer_unordered(concurrency)
            .filter_map(|member| async move { member })
            .collect()
            .await;

        loaded.sort_by(|a, b| a.0.cmp(&b.0));
        loaded
    }

    /// Adapter failures leave the affected set empty.
    async fn features(&self, candidate: &Candidate) -> PairingFeatures {
        let slug = candidate.artist_slug.as_str();
        let limit = self.adapter_timeout;
        let (network, scene, creative) = tokio::join!(
            bounded(limit, self.adapter.network_context(slug)),
            bounded(limit, self.adapter.scene_context(slug)),
            bounded(limit, self.adapter.creative_context(slug)),
        );

        let network_nodes = match network {
            Ok(ctx) => normalize(ctx.nodes()),
            Err(e) => {
                warn!(artist_slug = %slug, error = %e, "Network context unavailable for pairing");
                HashSet::new()
            }
        };

        let mut scenes = normalize(
            candidate
                .primary_scene_slug
                .iter()
                .chain(candidate.microgenres.iter()),
        );
        match scene {
            Ok(ctx) => scenes.extend(normalize(ctx.active_scenes.iter())),
            Err(e) => warn!(artist_slug = %slug, error = %e, "Scene context unavailable for pairing"),
        }

        let motifs = match creative {
            Ok(ctx) => normalize(ctx.motifs.iter()),
            Err(e) => {
                warn!(artist_slug = %slug, error = %e, "Creative context unavailable for pairing");
                HashSet::new()
            }
        };

        PairingFeatures {
            network_nodes,
            scenes,
            motifs,
        }
    }
}

fn sort_recommendations(pairs: &mut [CollaborationRecommendation]) {
    pairs.sort_by(|a, b| {
        b.compatibility
            .total_cmp(&a.compatibility)
            .then_with(|| a.artist_a.cmp(&b.artist_a))
            .then_with(|| a.artist_b.cmp(&b.artist_b))
    });
}
