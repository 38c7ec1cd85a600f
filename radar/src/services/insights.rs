use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::InsightConfig;
use crate::db::RadarBackend;
use crate::error::{RadarError, Result};
use crate::models::{
    CandidateFilter, Insight, InsightContent, InsightPriority, InsightType, SceneScoreStats,
    ScoredCandidate,
};
use crate::scoring::{math::round4, ScoringModel};

/// Rule-based insight generation over the scored population.
#[derive(Clone)]
pub struct InsightEngine {
    db: Arc<dyn RadarBackend>,
    model: Arc<ScoringModel>,
    config: InsightConfig,
}

impl InsightEngine {
    pub fn new(db: Arc<dyn RadarBackend>, model: Arc<ScoringModel>, config: InsightConfig) -> Self {
        Self { db, model, config }
    }

    /// Run every generator for `user_id`, persist what they produce and prune
    /// the user's history to the configured retention.
    ///
    /// Only a failure to load the population is returned as an error. A
    /// failing generator or save is logged and left out of the result.
    pub async fn generate_insights_for_user(
        &self,
        user_id: &str,
    ) -> Result<HashMap<InsightType, Vec<Insight>>> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(RadarError::Validation("user id must not be empty".to_string()));
        }

        let population = self
            .db
            .list_scored_candidates(self.config.population_limit)
            .await?;
        debug!(user_id, population = population.len(), "Loaded scored population");

        let (watch, scenes, gaps, campaigns) = tokio::join!(
            self.candidates_to_watch(&population),
            self.scene_opportunities(&population),
            self.roster_gaps(),
            self.campaign_potential(&population),
        );

        let mut generated: HashMap<InsightType, Vec<Insight>> = HashMap::new();
        for (insight_type, outcome) in [
            (InsightType::CandidateToWatch, watch),
            (InsightType::SceneOpportunity, scenes),
            (InsightType::RosterGap, gaps),
            (InsightType::CampaignPotential, campaigns),
        ] {
            let contents = match outcome {
                Ok(contents) => contents,
                Err(e) => {
                    warn!(user_id, insight_type = %insight_type, error = %e, "Insight generator failed");
                    continue;
                }
            };

            let saved = generated.entry(insight_type).or_default();
            for content in contents {
                let insight = Insight::new(user_id, insight_type, content);
                match self.db.save_insight(&insight).await {
                    Ok(()) => saved.push(insight),
                    Err(e) => {
                        warn!(user_id, insight_type = %insight_type, error = %e, "Failed to save insight")
                    }
                }
            }
        }

        match self
            .db
            .cleanup_old_insights(user_id, self.config.retention)
            .await
        {
            Ok(removed) if removed > 0 => debug!(user_id, removed, "Pruned old insights"),
            Ok(_) => {}
            Err(e) => warn!(user_id, error = %e, "Failed to prune old insights"),
        }

        let total: usize = generated.values().map(Vec::len).sum();
        info!(user_id, total, "Generated insights");
        Ok(generated)
    }

    /// Most recent first. `limit` defaults to the configured list size.
    pub async fn list_insights(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<Insight>> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(RadarError::Validation("user id must not be empty".to_string()));
        }
        let limit = limit.unwrap_or(self.config.list_limit).clamp(1, 100);
        self.db.list_insights(user_id, limit).await
    }

    async fn candidates_to_watch(
        &self,
        population: &[ScoredCandidate],
    ) -> Result<Vec<InsightContent>> {
        let rules = &self.model.insights;
        let mut picks: Vec<&ScoredCandidate> = population
            .iter()
            .filter(|s| {
                s.snapshot.breakout_probability >= rules.watch_min_breakout
                    && s.snapshot.momentum_direction.is_upward()
            })
            .collect();
        if picks.is_empty() {
            return Ok(Vec::new());
        }

        picks.sort_by(|a, b| {
            b.snapshot
                .breakout_probability
                .total_cmp(&a.snapshot.breakout_probability)
        });
        picks.truncate(rules.watch_top);

        let names: Vec<&str> = picks.iter().map(|s| s.candidate.display_name.as_str()).collect();
        Ok(vec![InsightContent {
            title: format!("{} artists to watch", picks.len()),
            description: format!(
                "High breakout probability with upward momentum: {}",
                names.join(", ")
            ),
            priority: InsightPriority::High,
            artist_slugs: picks.iter().map(|s| s.candidate.artist_slug.clone()).collect(),
            scene_slugs: scene_slugs(&picks),
            recommendations: vec![
                "Reach out before the wider market notices".to_string(),
                "Track weekly momentum for confirmation".to_string(),
            ],
        }])
    }

    async fn scene_opportunities(
        &self,
        population: &[ScoredCandidate],
    ) -> Result<Vec<InsightContent>> {
        let rules = &self.model.insights;
        let mut by_scene: BTreeMap<&str, Vec<&ScoredCandidate>> = BTreeMap::new();
        for scored in population {
            if scored.snapshot.composite < rules.scene_min_composite {
                continue;
            }
            if let Some(scene) = scored.candidate.primary_scene_slug.as_deref() {
                by_scene.entry(scene).or_default().push(scored);
            }
        }

        let mut scenes: Vec<(&str, Vec<&ScoredCandidate>)> = by_scene
            .into_iter()
            .filter(|(_, members)| members.len() >= rules.scene_min_candidates)
            .collect();
        scenes.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        scenes.truncate(rules.scene_max_insights);

        let mut insights = Vec::with_capacity(scenes.len());
        for (scene, members) in scenes {
            let name = self.scene_name(scene).await?;
            insights.push(InsightContent {
                title: format!("{name} is heating up"),
                description: format!(
                    "{} strong candidates are emerging from {name}",
                    members.len()
                ),
                priority: if members.len() >= rules.scene_min_candidates * 2 {
                    InsightPriority::High
                } else {
                    InsightPriority::Medium
                },
                artist_slugs: members.iter().map(|s| s.candidate.artist_slug.clone()).collect(),
                scene_slugs: vec![scene.to_string()],
                recommendations: vec![
                    format!("Scout {name} showcases and playlists"),
                    "Compare the strongest candidates side by side".to_string(),
                ],
            });
        }
        Ok(insights)
    }

    /// Scenes with few tracked artists whose average quality is high. Counts
    /// and averages come from the store over every scored candidate, not the
    /// loaded population.
    async fn roster_gaps(&self) -> Result<Vec<InsightContent>> {
        let rules = &self.model.insights;
        let mut gaps: Vec<SceneScoreStats> = self
            .db
            .scene_score_stats()
            .await?
            .into_iter()
            .filter(|stats| {
                stats.candidate_count <= rules.gap_max_candidates
                    && stats.average_composite >= rules.gap_min_average
            })
            .collect();
        gaps.sort_by(|a, b| b.average_composite.total_cmp(&a.average_composite));
        gaps.truncate(rules.gap_max_insights);

        let mut insights = Vec::with_capacity(gaps.len());
        for gap in gaps {
            let name = self.scene_name(&gap.scene_slug).await?;
            let artist_slugs = self.scored_slugs_in(&gap.scene_slug, gap.candidate_count).await?;
            insights.push(InsightContent {
                title: format!("Coverage gap in {name}"),
                description: format!(
                    "Only {} tracked in {name}, averaging a composite of {:.2}",
                    gap.candidate_count,
                    round4(gap.average_composite)
                ),
                priority: InsightPriority::Medium,
                artist_slugs,
                scene_slugs: vec![gap.scene_slug],
                recommendations: vec![format!("Widen scouting in {name}")],
            });
        }
        Ok(insights)
    }

    /// Up to `count` slugs of scored candidates whose primary scene is `scene`.
    async fn scored_slugs_in(&self, scene: &str, count: usize) -> Result<Vec<String>> {
        let filter = CandidateFilter {
            scene_slug: Some(scene.to_string()),
            country: None,
        };
        let members = self
            .db
            .list_candidates(&filter, self.config.population_limit, 0)
            .await?;

        let mut slugs = Vec::with_capacity(count);
        for candidate in members {
            if slugs.len() == count {
                break;
            }
            if self.db.get_latest_score(&candidate.id).await?.is_some() {
                slugs.push(candidate.artist_slug);
            }
        }
        Ok(slugs)
    }

    async fn campaign_potential(
        &self,
        population: &[ScoredCandidate],
    ) -> Result<Vec<InsightContent>> {
        let rules = &self.model.insights;
        let mut picks: Vec<&ScoredCandidate> = population
            .iter()
            .filter(|s| {
                s.snapshot.dimensions.campaign_efficiency >= rules.campaign_min_efficiency
                    && s.snapshot.dimensions.scene_alignment >= rules.campaign_min_scene_alignment
            })
            .collect();
        if picks.is_empty() {
            return Ok(Vec::new());
        }

        picks.sort_by(|a, b| {
            b.snapshot
                .dimensions
                .campaign_efficiency
                .total_cmp(&a.snapshot.dimensions.campaign_efficiency)
        });
        picks.truncate(rules.campaign_top);

        Ok(vec![InsightContent {
            title: "Campaign-ready artists".to_string(),
            description: format!(
                "{} artists convert campaign spend efficiently and fit their scene",
                picks.len()
            ),
            priority: InsightPriority::Medium,
            artist_slugs: picks.iter().map(|s| s.candidate.artist_slug.clone()).collect(),
            scene_slugs: scene_slugs(&picks),
            recommendations: vec![
                "Prioritise these artists for the next campaign cycle".to_string(),
            ],
        }])
    }

    async fn scene_name(&self, slug: &str) -> Result<String> {
        Ok(self
            .db
            .get_scene_by_slug(slug)
            .await?
            .map(|scene| scene.display_name)
            .unwrap_or_else(|| slug.to_string()))
    }
}

/// Distinct primary scenes, in first-seen order.
fn scene_slugs(picks: &[&ScoredCandidate]) -> Vec<String> {
    let mut slugs: Vec<String> = Vec::new();
    for scored in picks {
        if let Some(scene) = &scored.candidate.primary_scene_slug {
            if !slugs.contains(scene) {
                slugs.push(scene.clone());
            }
        }
    }
    slugs
}
