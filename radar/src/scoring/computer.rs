use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use nanoid::nanoid;
use tracing::{debug, warn};

use super::math::{clamp, clamp_unit, round4, weighted_sum};
use super::model::{ScoringModel, NEUTRAL_MOMENTUM, NEUTRAL_SIGNAL, NEUTRAL_VELOCITY};
use crate::error::Result;
use crate::models::{Candidate, DimensionScores, MomentumDirection, ScoreSnapshot};
use crate::signals::{bounded, SignalAdapter, SignalBundle};

/// Scores that are pure functions of the dimension scores, momentum and the
/// model constants.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedScores {
    pub momentum: f64,
    pub momentum_direction: MomentumDirection,
    pub breakout_probability: f64,
    pub risk: f64,
    pub composite: f64,
}

/// Normalized severity of each risk factor. A factor is zero until its
/// input crosses the model threshold.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RiskFactors {
    pub momentum: f64,
    pub creative_shift: f64,
    pub identity_alignment: f64,
    pub coverage_velocity: f64,
}

pub fn scene_alignment(model: &ScoringModel, fit: Option<f64>, opportunity: Option<f64>) -> f64 {
    let w = &model.scene_alignment;
    clamp_unit(weighted_sum(&[
        (clamp_unit(fit.unwrap_or(NEUTRAL_SIGNAL)), w.fit),
        (clamp_unit(opportunity.unwrap_or(NEUTRAL_SIGNAL)), w.opportunity),
    ]))
}

/// Normalize a signal bundle into dimension scores. Missing values become
/// the neutral midpoint, never zero.
pub fn dimensions(model: &ScoringModel, bundle: &SignalBundle) -> DimensionScores {
    let unit = |value: Option<f64>| round4(clamp_unit(value.unwrap_or(NEUTRAL_SIGNAL)));

    DimensionScores {
        network_connectivity: unit(bundle.network.connectivity_score),
        scene_alignment: round4(scene_alignment(
            model,
            bundle.scene.scene_fit,
            bundle.scene.scene_opportunity,
        )),
        creative_shift: unit(bundle.creative.creative_shift),
        press_quality: unit(bundle.campaign.press_quality),
        campaign_efficiency: unit(bundle.campaign.campaign_efficiency),
        identity_alignment: unit(bundle.creative.identity_alignment),
        coverage_velocity: round4(clamp(
            bundle.campaign.coverage_velocity.unwrap_or(NEUTRAL_VELOCITY),
            -1.0,
            1.0,
        )),
    }
}

/// Momentum from growth in combined activity between the previous and the
/// current window. Without any activity windows momentum is neutral.
pub fn momentum(model: &ScoringModel, bundle: &SignalBundle) -> f64 {
    let windows: Vec<_> = [bundle.network.activity, bundle.campaign.coverage_activity]
        .into_iter()
        .flatten()
        .collect();

    if windows.is_empty() {
        return NEUTRAL_MOMENTUM;
    }

    let current: f64 = windows.iter().map(|w| w.current.max(0.0)).sum();
    let previous: f64 = windows.iter().map(|w| w.previous.max(0.0)).sum();
    let growth = (current - previous) / previous.max(1.0);

    round4(clamp(
        NEUTRAL_MOMENTUM + model.momentum.growth_scale * growth,
        0.0,
        100.0,
    ))
}

pub fn momentum_direction(
    model: &ScoringModel,
    momentum: f64,
    prior_momentum: Option<f64>,
) -> MomentumDirection {
    let delta = momentum - prior_momentum.unwrap_or(NEUTRAL_MOMENTUM);
    let bands = &model.momentum;

    if delta >= bands.strong_delta {
        MomentumDirection::StronglyUp
    } else if delta >= bands.moderate_delta {
        MomentumDirection::ModeratelyUp
    } else if delta > -bands.moderate_delta {
        MomentumDirection::Flat
    } else if delta > -bands.strong_delta {
        MomentumDirection::ModeratelyDown
    } else {
        MomentumDirection::StronglyDown
    }
}

pub fn risk_factors(model: &ScoringModel, dims: &DimensionScores, momentum: f64) -> RiskFactors {
    let t = &model.thresholds;
    let below = |value: f64, threshold: f64, floor: f64| {
        if value < threshold {
            clamp_unit((threshold - value) / (threshold - floor))
        } else {
            0.0
        }
    };

    RiskFactors {
        momentum: below(momentum, t.momentum_low, 0.0),
        creative_shift: below(dims.creative_shift, t.creative_shift_low, 0.0),
        identity_alignment: below(dims.identity_alignment, t.identity_low, 0.0),
        coverage_velocity: below(dims.coverage_velocity, t.coverage_velocity_low, -1.0),
    }
}

pub fn risk(model: &ScoringModel, dims: &DimensionScores, momentum: f64) -> f64 {
    let factors = risk_factors(model, dims, momentum);
    let w = &model.risk;
    round4(clamp_unit(weighted_sum(&[
        (factors.momentum, w.momentum),
        (factors.creative_shift, w.creative_shift),
        (factors.identity_alignment, w.identity_alignment),
        (factors.coverage_velocity, w.coverage_velocity),
    ])))
}

pub fn breakout_probability(model: &ScoringModel, dims: &DimensionScores) -> f64 {
    let w = &model.breakout;
    round4(clamp_unit(weighted_sum(&[
        (dims.scene_alignment, w.scene_alignment),
        (dims.creative_shift, w.creative_shift),
        (dims.network_connectivity, w.network_connectivity),
    ])))
}

pub fn composite(model: &ScoringModel, breakout: f64, dims: &DimensionScores) -> f64 {
    let w = &model.composite;
    round4(clamp_unit(weighted_sum(&[
        (breakout, w.breakout),
        (dims.scene_alignment, w.scene_alignment),
    ])))
}

pub fn derive(
    model: &ScoringModel,
    dims: &DimensionScores,
    momentum: f64,
    prior_momentum: Option<f64>,
) -> DerivedScores {
    let momentum = round4(clamp(momentum, 0.0, 100.0));
    let breakout_probability = breakout_probability(model, dims);

    DerivedScores {
        momentum,
        momentum_direction: momentum_direction(model, momentum, prior_momentum),
        breakout_probability,
        risk: risk(model, dims, momentum),
        composite: composite(model, breakout_probability, dims),
    }
}

fn explain(model: &ScoringModel, dims: &DimensionScores, derived: &DerivedScores, partial: bool) -> String {
    let mut parts = Vec::new();

    if derived.composite >= 0.75 {
        parts.push("High breakout potential.".to_string());
    } else if derived.composite >= 0.5 {
        parts.push("Moderate breakout potential.".to_string());
    } else {
        parts.push("Early-stage artist.".to_string());
    }

    let mut strengths = Vec::new();
    if derived.breakout_probability >= 0.7 {
        strengths.push("breakout probability");
    }
    if derived.momentum > model.thresholds.momentum_rising {
        strengths.push("high momentum");
    }
    if dims.creative_shift >= 0.7 {
        strengths.push("creative evolution");
    }
    if dims.scene_alignment >= 0.7 {
        strengths.push("scene alignment");
    }
    if !strengths.is_empty() {
        parts.push(format!("Strengths: {}.", strengths.join(", ")));
    }

    let factors = risk_factors(model, dims, derived.momentum);
    let mut weaknesses = Vec::new();
    if factors.momentum > 0.0 {
        weaknesses.push("low momentum");
    }
    if factors.creative_shift > 0.0 {
        weaknesses.push("creative stagnation");
    }
    if factors.identity_alignment > 0.0 {
        weaknesses.push("identity drift");
    }
    if factors.coverage_velocity > 0.0 {
        weaknesses.push("declining coverage");
    }
    if !weaknesses.is_empty() {
        parts.push(format!("Risk factors: {}.", weaknesses.join(", ")));
    }

    if partial {
        parts.push("Based on partial signal data.".to_string());
    }

    parts.join(" ")
}

/// Assemble a snapshot from already-normalized inputs.
pub fn build_snapshot(
    model: &ScoringModel,
    candidate_id: &str,
    dims: DimensionScores,
    momentum: f64,
    prior_momentum: Option<f64>,
    partial: bool,
) -> ScoreSnapshot {
    let derived = derive(model, &dims, momentum, prior_momentum);
    let explanation = explain(model, &dims, &derived, partial);

    ScoreSnapshot {
        id: nanoid!(),
        candidate_id: candidate_id.to_string(),
        dimensions: dims,
        momentum: derived.momentum,
        momentum_direction: derived.momentum_direction,
        breakout_probability: derived.breakout_probability,
        risk: derived.risk,
        composite: derived.composite,
        partial,
        model_version: model.version.clone(),
        explanation,
        snapshot_at: Utc::now(),
    }
}

fn settle<T: Default>(artist_slug: &str, kind: &str, result: Result<T>, partial: &mut bool) -> T {
    match result {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!(
                artist_slug = %artist_slug,
                signal = kind,
                error = %e,
                "Signal adapter failed, using neutral defaults"
            );
            *partial = true;
            T::default()
        }
    }
}

/// Gathers signals for a candidate and turns them into a [`ScoreSnapshot`].
#[derive(Clone)]
pub struct ScoreComputer {
    adapter: Arc<dyn SignalAdapter>,
    model: Arc<ScoringModel>,
    adapter_timeout: Duration,
}

impl ScoreComputer {
    pub fn new(
        adapter: Arc<dyn SignalAdapter>,
        model: ScoringModel,
        adapter_timeout: Duration,
    ) -> Result<Self> {
        model.validate()?;
        Ok(Self {
            adapter,
            model: Arc::new(model),
            adapter_timeout,
        })
    }

    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    pub fn adapter(&self) -> Arc<dyn SignalAdapter> {
        self.adapter.clone()
    }

    pub fn adapter_timeout(&self) -> Duration {
        self.adapter_timeout
    }

    /// Query all four adapters concurrently. A failed or timed-out call
    /// contributes an empty context and marks the bundle partial.
    pub async fn gather(&self, artist_slug: &str) -> SignalBundle {
        let limit = self.adapter_timeout;
        let (network, scene, creative, campaign) = tokio::join!(
            bounded(limit, self.adapter.network_context(artist_slug)),
            bounded(limit, self.adapter.scene_context(artist_slug)),
            bounded(limit, self.adapter.creative_context(artist_slug)),
            bounded(limit, self.adapter.campaign_context(artist_slug)),
        );

        let mut partial = false;
        let network = settle(artist_slug, "network", network, &mut partial);
        let scene = settle(artist_slug, "scene", scene, &mut partial);
        let creative = settle(artist_slug, "creative", creative, &mut partial);
        let campaign = settle(artist_slug, "campaign", campaign, &mut partial);

        SignalBundle {
            network,
            scene,
            creative,
            campaign,
            partial,
        }
    }

    /// Compute a fresh snapshot. Never fails: adapter errors, timeouts and
    /// missing fields only set the `partial` flag.
    pub async fn compute(&self, candidate: &Candidate, prior: Option<&ScoreSnapshot>) -> ScoreSnapshot {
        let bundle = self.gather(&candidate.artist_slug).await;
        let snapshot = self.score_bundle(&candidate.id, &bundle, prior.map(|p| p.momentum));

        debug!(
            artist_slug = %candidate.artist_slug,
            composite = snapshot.composite,
            breakout = snapshot.breakout_probability,
            partial = snapshot.partial,
            "Computed score snapshot"
        );

        snapshot
    }

    pub fn score_bundle(
        &self,
        candidate_id: &str,
        bundle: &SignalBundle,
        prior_momentum: Option<f64>,
    ) -> ScoreSnapshot {
        let missing = bundle.missing_signals();
        if !missing.is_empty() {
            debug!(candidate_id, missing = ?missing, "Signals missing, using neutral defaults");
        }

        build_snapshot(
            &self.model,
            candidate_id,
            dimensions(&self.model, bundle),
            momentum(&self.model, bundle),
            prior_momentum,
            bundle.is_partial(),
        )
    }
}
