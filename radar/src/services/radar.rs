use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{CacheStats, FreshnessCache};
use crate::config::{CacheConfig, RadarConfig};
use crate::db::RadarBackend;
use crate::error::{RadarError, Result};
use crate::models::{
    Candidate, CandidateProfile, GlobalPulse, MomentumTier, Opportunity, OpportunityType,
    PulseEntry, PulseSummary, RankAxis, Risk, RiskType, ScoreSnapshot, ScoredCandidate, Tier,
    Trajectory,
};
use crate::scoring::{math::round4, risk_factors, ScoringModel};

/// Statistics for both radar caches.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarCacheStats {
    pub pulse: CacheStats,
    pub profile: CacheStats,
}

/// Cache-first aggregation of the global pulse and per-artist profiles.
#[derive(Clone)]
pub struct RadarService {
    db: Arc<dyn RadarBackend>,
    model: Arc<ScoringModel>,
    config: RadarConfig,
    partial_ttl: Duration,
    pulse_cache: FreshnessCache<GlobalPulse>,
    profile_cache: FreshnessCache<CandidateProfile>,
}

impl RadarService {
    pub fn new(
        db: Arc<dyn RadarBackend>,
        model: Arc<ScoringModel>,
        config: RadarConfig,
        cache: &CacheConfig,
    ) -> Self {
        Self {
            db,
            model,
            config,
            partial_ttl: Duration::from_secs(cache.partial_ttl_secs),
            pulse_cache: FreshnessCache::new(
                "pulse",
                Duration::from_secs(cache.pulse_ttl_secs),
                cache.pulse_max_entries,
            ),
            profile_cache: FreshnessCache::new(
                "profile",
                Duration::from_secs(cache.profile_ttl_secs),
                cache.profile_max_entries,
            ),
        }
    }

    pub async fn build_global_pulse(
        &self,
        limit: Option<usize>,
        skip_cache: bool,
    ) -> Result<GlobalPulse> {
        let limit = limit.unwrap_or(self.config.default_top_n);
        if limit == 0 || limit > self.config.max_top_n {
            return Err(RadarError::Validation(format!(
                "limit must be between 1 and {}",
                self.config.max_top_n
            )));
        }

        let key = format!("pulse:{limit}");
        if !skip_cache {
            if let Some(pulse) = self.pulse_cache.get(&key) {
                debug!(limit, "Pulse cache hit");
                return Ok(pulse);
            }
        }

        let (rising, breakout, at_risk) = tokio::try_join!(
            self.db.top_scored_candidates(RankAxis::Momentum, limit),
            self.db.top_scored_candidates(RankAxis::Breakout, limit),
            self.db.top_scored_candidates(RankAxis::Risk, limit),
        )?;

        let summary = summarize(&self.model, [&rising, &breakout, &at_risk]);
        let pulse = GlobalPulse {
            generated_at: Utc::now(),
            top_rising: rising.iter().map(PulseEntry::from).collect(),
            top_breakout: breakout.iter().map(PulseEntry::from).collect(),
            top_at_risk: at_risk.iter().map(PulseEntry::from).collect(),
            summary,
        };

        self.pulse_cache.set(key, pulse.clone(), None);
        info!(
            limit,
            tracked = pulse.summary.total_artists_tracked,
            "Built global pulse"
        );
        Ok(pulse)
    }

    /// `Ok(None)` when the artist is unknown or has never been scored.
    pub async fn build_artist_profile(
        &self,
        artist_slug: &str,
        skip_cache: bool,
    ) -> Result<Option<CandidateProfile>> {
        let key = profile_key(artist_slug);
        if !skip_cache {
            if let Some(profile) = self.profile_cache.get(&key) {
                debug!(artist_slug, "Profile cache hit");
                return Ok(Some(profile));
            }
        }

        let Some(candidate) = self.db.get_candidate_by_slug(artist_slug).await? else {
            return Ok(None);
        };
        let Some(snapshot) = self.db.get_latest_score(&candidate.id).await? else {
            debug!(artist_slug, "Artist has no score snapshot yet");
            return Ok(None);
        };

        let ttl = snapshot.partial.then_some(self.partial_ttl);
        let profile = derive_profile(&self.model, candidate, snapshot);
        self.profile_cache.set(key, profile.clone(), ttl);

        Ok(Some(profile))
    }

    pub fn cache_stats(&self) -> RadarCacheStats {
        RadarCacheStats {
            pulse: self.pulse_cache.stats(),
            profile: self.profile_cache.stats(),
        }
    }

    /// With a slug, drops that artist's profile and every pulse (each pulse
    /// may include the artist). Without, empties both caches.
    pub fn clear_cache(&self, artist_slug: Option<&str>) {
        match artist_slug {
            Some(slug) => {
                self.profile_cache.clear(Some(&profile_key(slug)));
                self.pulse_cache.clear(None);
            }
            None => {
                self.profile_cache.clear(None);
                self.pulse_cache.clear(None);
            }
        }
    }

    /// Remove expired entries from both caches.
    pub fn sweep_expired(&self) -> usize {
        self.pulse_cache.clean_expired() + self.profile_cache.clean_expired()
    }
}

fn profile_key(artist_slug: &str) -> String {
    format!("profile:{artist_slug}")
}

/// Summary over the distinct candidates appearing in any of the lists.
fn summarize(model: &ScoringModel, lists: [&Vec<ScoredCandidate>; 3]) -> PulseSummary {
    let mut unique: HashMap<&str, &ScoreSnapshot> = HashMap::new();
    for scored in lists.into_iter().flatten() {
        unique
            .entry(scored.candidate.artist_slug.as_str())
            .or_insert(&scored.snapshot);
    }

    let total = unique.len();
    let average_momentum = if total == 0 {
        0.0
    } else {
        round4(unique.values().map(|s| s.momentum).sum::<f64>() / total as f64)
    };
    let t = &model.thresholds;

    PulseSummary {
        total_artists_tracked: total,
        average_momentum,
        high_breakout_count: unique
            .values()
            .filter(|s| s.breakout_probability > t.breakout_high)
            .count(),
        high_risk_count: unique.values().filter(|s| s.risk > t.risk_high).count(),
    }
}

/// Opportunities, risks and trajectory tiers for one scored candidate.
pub fn derive_profile(
    model: &ScoringModel,
    candidate: Candidate,
    snapshot: ScoreSnapshot,
) -> CandidateProfile {
    let t = &model.thresholds;
    let dims = &snapshot.dimensions;

    let mut opportunities = Vec::new();
    if snapshot.momentum > t.momentum_rising {
        opportunities.push(Opportunity {
            kind: OpportunityType::Momentum,
            description: format!("Momentum is surging at {:.0}/100", snapshot.momentum),
            score: round4(snapshot.momentum / 100.0),
        });
    }
    if snapshot.breakout_probability > t.breakout_high {
        opportunities.push(Opportunity {
            kind: OpportunityType::Breakout,
            description: format!(
                "Breakout probability of {:.0}%",
                snapshot.breakout_probability * 100.0
            ),
            score: snapshot.breakout_probability,
        });
    }
    if dims.network_connectivity > t.connectivity_opportunity {
        opportunities.push(Opportunity {
            kind: OpportunityType::Network,
            description: "Well connected to collaborators, labels and producers".to_string(),
            score: dims.network_connectivity,
        });
    }
    if dims.press_quality > t.press_opportunity {
        opportunities.push(Opportunity {
            kind: OpportunityType::Press,
            description: "Strong press coverage from quality outlets".to_string(),
            score: dims.press_quality,
        });
    }
    opportunities.sort_by(|a, b| b.score.total_cmp(&a.score));

    let factors = risk_factors(model, dims, snapshot.momentum);
    let mut risks = Vec::new();
    if snapshot.risk > t.risk_high {
        risks.push(Risk {
            kind: RiskType::Overall,
            description: "Several risk factors are active at once".to_string(),
            severity: snapshot.risk,
        });
    }
    let mut push_factor = |kind: RiskType, severity: f64, description: &str| {
        if severity > 0.0 {
            risks.push(Risk {
                kind,
                description: description.to_string(),
                severity: round4(severity),
            });
        }
    };
    push_factor(RiskType::Momentum, factors.momentum, "Momentum has stalled");
    push_factor(
        RiskType::CreativeStagnation,
        factors.creative_shift,
        "Little creative evolution between releases",
    );
    push_factor(
        RiskType::IdentityDrift,
        factors.identity_alignment,
        "Output is drifting from the artist's established identity",
    );
    push_factor(
        RiskType::CoverageDecline,
        factors.coverage_velocity,
        "Press coverage is slowing down",
    );
    risks.sort_by(|a, b| b.severity.total_cmp(&a.severity));

    let trajectory = Trajectory {
        momentum: if snapshot.momentum > t.momentum_rising {
            MomentumTier::Rising
        } else if snapshot.momentum < t.momentum_low {
            MomentumTier::Declining
        } else {
            MomentumTier::Stable
        },
        breakout: tier(snapshot.breakout_probability, t.breakout_high, t.breakout_medium),
        risk: tier(snapshot.risk, t.risk_high, t.risk_medium),
    };

    CandidateProfile {
        candidate,
        snapshot,
        opportunities,
        risks,
        trajectory,
        generated_at: Utc::now(),
    }
}

fn tier(value: f64, high: f64, medium: f64) -> Tier {
    if value > high {
        Tier::High
    } else if value > medium {
        Tier::Medium
    } else {
        Tier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MomentumDirection;
    use crate::services::test_support::{backend, seed, snapshot};
    use pretty_assertions::assert_eq;

    fn service(db: Arc<dyn RadarBackend>) -> RadarService {
        RadarService::new(
            db,
            Arc::new(ScoringModel::default()),
            RadarConfig::default(),
            &CacheConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_pulse_rejects_limit_over_maximum() {
        let (db, _file) = backend().await;
        let radar = service(db);

        let err = radar.build_global_pulse(Some(21), false).await.unwrap_err();
        assert!(matches!(err, RadarError::Validation(_)));
        assert!(matches!(
            radar.build_global_pulse(Some(0), false).await,
            Err(RadarError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_pulse_summary_counts_union_once() {
        let (db, _file) = backend().await;
        // "star" tops every list; "steady" and "fragile" appear in some.
        seed(&db, "star", None, |s| {
            s.momentum = 90.0;
            s.breakout_probability = 0.8;
            s.risk = 0.9;
        })
        .await;
        seed(&db, "steady", None, |s| {
            s.momentum = 60.0;
            s.breakout_probability = 0.65;
            s.risk = 0.0;
        })
        .await;
        seed(&db, "fragile", None, |s| {
            s.momentum = 20.0;
            s.breakout_probability = 0.1;
            s.risk = 0.75;
        })
        .await;
        seed(&db, "quiet", None, |s| {
            s.momentum = 10.0;
            s.breakout_probability = 0.05;
            s.risk = 0.1;
        })
        .await;

        let radar = service(db);
        let pulse = radar.build_global_pulse(Some(2), false).await.unwrap();

        let slugs = |entries: &[PulseEntry]| {
            entries
                .iter()
                .map(|e| e.artist_slug.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(slugs(&pulse.top_rising), vec!["star", "steady"]);
        assert_eq!(slugs(&pulse.top_breakout), vec!["star", "steady"]);
        assert_eq!(slugs(&pulse.top_at_risk), vec!["star", "fragile"]);

        assert_eq!(pulse.summary.total_artists_tracked, 3);
        assert_eq!(pulse.summary.average_momentum, round4(170.0 / 3.0));
        assert_eq!(pulse.summary.high_breakout_count, 2);
        assert_eq!(pulse.summary.high_risk_count, 2);
    }

    #[tokio::test]
    async fn test_pulse_served_from_cache_until_cleared() {
        let (db, _file) = backend().await;
        seed(&db, "first", None, |_| {}).await;
        let radar = service(db.clone());

        let before = radar.build_global_pulse(None, false).await.unwrap();
        assert_eq!(before.summary.total_artists_tracked, 1);

        seed(&db, "second", None, |_| {}).await;
        let cached = radar.build_global_pulse(None, false).await.unwrap();
        assert_eq!(cached.summary.total_artists_tracked, 1);

        let fresh = radar.build_global_pulse(None, true).await.unwrap();
        assert_eq!(fresh.summary.total_artists_tracked, 2);

        radar.clear_cache(Some("second"));
        assert_eq!(radar.cache_stats().pulse.size, 0);
    }

    #[tokio::test]
    async fn test_profile_unknown_artist_is_none_and_not_cached() {
        let (db, _file) = backend().await;
        db.upsert_candidate(&Candidate::new("unscored", "Unscored"))
            .await
            .unwrap();
        let radar = service(db);

        assert!(radar.build_artist_profile("ghost", false).await.unwrap().is_none());
        assert!(radar
            .build_artist_profile("unscored", false)
            .await
            .unwrap()
            .is_none());
        assert_eq!(radar.cache_stats().profile.size, 0);
    }

    #[tokio::test]
    async fn test_profile_is_cached() {
        let (db, _file) = backend().await;
        seed(&db, "nova", Some("uk-drill"), |_| {}).await;
        let radar = service(db);

        let first = radar.build_artist_profile("nova", false).await.unwrap().unwrap();
        let second = radar.build_artist_profile("nova", false).await.unwrap().unwrap();
        assert_eq!(first.generated_at, second.generated_at);

        let stats = radar.cache_stats();
        assert_eq!(stats.profile.size, 1);
        assert_eq!(stats.profile.hits, 1);

        radar.clear_cache(None);
        assert_eq!(radar.cache_stats().profile.size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_profile_expires_sooner() {
        let (db, _file) = backend().await;
        seed(&db, "partial", None, |s| s.partial = true).await;
        seed(&db, "full", None, |_| {}).await;
        let radar = service(db);

        radar.build_artist_profile("partial", false).await.unwrap();
        radar.build_artist_profile("full", false).await.unwrap();
        assert_eq!(radar.cache_stats().profile.size, 2);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(radar.sweep_expired(), 1);
        assert_eq!(radar.cache_stats().profile.size, 1);
    }

    #[test]
    fn test_profile_opportunities_and_risks_match_tiers() {
        let model = ScoringModel::default();
        let candidate = Candidate::new("nova", "Nova");

        let mut hot = snapshot(&candidate.id);
        hot.momentum = 88.0;
        hot.momentum_direction = MomentumDirection::StronglyUp;
        hot.breakout_probability = 0.72;
        hot.dimensions.network_connectivity = 0.9;
        hot.dimensions.press_quality = 0.75;

        let profile = derive_profile(&model, candidate.clone(), hot);
        let kinds: Vec<_> = profile.opportunities.iter().map(|o| o.kind).collect();
        assert_eq!(
            kinds,
            vec![
                OpportunityType::Network,
                OpportunityType::Momentum,
                OpportunityType::Press,
                OpportunityType::Breakout,
            ]
        );
        assert!(profile.risks.is_empty());
        assert_eq!(profile.trajectory.momentum, MomentumTier::Rising);
        assert_eq!(profile.trajectory.breakout, Tier::High);
        assert_eq!(profile.trajectory.risk, Tier::Low);

        let mut cold = snapshot(&candidate.id);
        cold.momentum = 15.0;
        cold.dimensions.creative_shift = 0.05;
        cold.dimensions.identity_alignment = 0.1;
        cold.dimensions.coverage_velocity = -0.8;
        cold.risk = 0.75;
        cold.breakout_probability = 0.2;

        let profile = derive_profile(&model, candidate, cold);
        assert!(profile.opportunities.is_empty());
        assert_eq!(profile.risks.len(), 5);
        assert_eq!(profile.risks[0].kind, RiskType::Overall);
        assert!(profile
            .risks
            .windows(2)
            .all(|w| w[0].severity >= w[1].severity));
        assert_eq!(profile.trajectory.momentum, MomentumTier::Declining);
        assert_eq!(profile.trajectory.breakout, Tier::Low);
        assert_eq!(profile.trajectory.risk, Tier::High);
    }
}
