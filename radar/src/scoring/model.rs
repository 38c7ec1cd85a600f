//! Weights and thresholds for every score the radar derives.
//!
//! All constants live here so they can be tuned and validated in isolation
//! from the code that consumes them. The thresholds are empirical defaults,
//! not statistically derived baselines.

use serde::{Deserialize, Serialize};

use crate::error::{RadarError, Result};

/// Midpoint used for any [0,1] signal an adapter failed to provide.
pub const NEUTRAL_SIGNAL: f64 = 0.5;

/// Coverage velocity is signed; "no change" is the neutral value.
pub const NEUTRAL_VELOCITY: f64 = 0.0;

/// Momentum reported when no activity windows are available.
pub const NEUTRAL_MOMENTUM: f64 = 50.0;

const WEIGHT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringModel {
    pub version: String,
    pub scene_alignment: SceneAlignmentWeights,
    pub breakout: BreakoutWeights,
    pub composite: CompositeWeights,
    pub risk: RiskWeights,
    pub momentum: MomentumBands,
    pub thresholds: Thresholds,
    pub insights: InsightRules,
    pub pairing: PairingWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneAlignmentWeights {
    pub fit: f64,
    pub opportunity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutWeights {
    pub scene_alignment: f64,
    pub creative_shift: f64,
    pub network_connectivity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub breakout: f64,
    pub scene_alignment: f64,
}

/// Contribution of each degraded factor to the risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    pub momentum: f64,
    pub creative_shift: f64,
    pub identity_alignment: f64,
    pub coverage_velocity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumBands {
    /// Points added per unit of relative activity growth.
    pub growth_scale: f64,
    pub strong_delta: f64,
    pub moderate_delta: f64,
}

/// Cut-offs shared by risk factors, profile opportunities/risks and
/// trajectory tiers, so the three never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub momentum_rising: f64,
    pub momentum_low: f64,
    pub breakout_high: f64,
    pub breakout_medium: f64,
    pub risk_high: f64,
    pub risk_medium: f64,
    pub connectivity_opportunity: f64,
    pub press_opportunity: f64,
    pub creative_shift_low: f64,
    pub identity_low: f64,
    pub coverage_velocity_low: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRules {
    pub watch_min_breakout: f64,
    pub watch_top: usize,
    pub scene_min_composite: f64,
    pub scene_min_candidates: usize,
    pub scene_max_insights: usize,
    pub gap_max_candidates: usize,
    pub gap_min_average: f64,
    pub gap_max_insights: usize,
    pub campaign_min_efficiency: f64,
    pub campaign_min_scene_alignment: f64,
    pub campaign_top: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingWeights {
    pub network: f64,
    pub scene: f64,
    pub creative: f64,
    /// Motif Jaccard at which complementarity peaks.
    pub creative_peak: f64,
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self {
            version: "radar-v1".to_string(),
            scene_alignment: SceneAlignmentWeights {
                fit: 0.6,
                opportunity: 0.4,
            },
            breakout: BreakoutWeights {
                scene_alignment: 0.4,
                creative_shift: 0.3,
                network_connectivity: 0.3,
            },
            composite: CompositeWeights {
                breakout: 0.6,
                scene_alignment: 0.4,
            },
            risk: RiskWeights {
                momentum: 0.3,
                creative_shift: 0.25,
                identity_alignment: 0.25,
                coverage_velocity: 0.2,
            },
            momentum: MomentumBands {
                growth_scale: 50.0,
                strong_delta: 15.0,
                moderate_delta: 5.0,
            },
            thresholds: Thresholds::default(),
            insights: InsightRules::default(),
            pairing: PairingWeights::default(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            momentum_rising: 75.0,
            momentum_low: 30.0,
            breakout_high: 0.6,
            breakout_medium: 0.3,
            risk_high: 0.7,
            risk_medium: 0.4,
            connectivity_opportunity: 0.7,
            press_opportunity: 0.7,
            creative_shift_low: 0.2,
            identity_low: 0.4,
            coverage_velocity_low: -0.3,
        }
    }
}

impl Default for InsightRules {
    fn default() -> Self {
        Self {
            watch_min_breakout: 0.7,
            watch_top: 5,
            scene_min_composite: 0.6,
            scene_min_candidates: 3,
            scene_max_insights: 3,
            gap_max_candidates: 2,
            gap_min_average: 0.6,
            gap_max_insights: 2,
            campaign_min_efficiency: 0.7,
            campaign_min_scene_alignment: 0.6,
            campaign_top: 5,
        }
    }
}

impl Default for PairingWeights {
    fn default() -> Self {
        Self {
            network: 0.3,
            scene: 0.4,
            creative: 0.3,
            creative_peak: 0.5,
        }
    }
}

impl ScoringModel {
    /// Check that every weight group sums to 1 and every tiered threshold
    /// pair is ordered.
    pub fn validate(&self) -> Result<()> {
        check_sum(
            "scene alignment weights",
            &[self.scene_alignment.fit, self.scene_alignment.opportunity],
        )?;
        check_sum(
            "breakout weights",
            &[
                self.breakout.scene_alignment,
                self.breakout.creative_shift,
                self.breakout.network_connectivity,
            ],
        )?;
        check_sum(
            "composite weights",
            &[self.composite.breakout, self.composite.scene_alignment],
        )?;
        check_sum(
            "risk weights",
            &[
                self.risk.momentum,
                self.risk.creative_shift,
                self.risk.identity_alignment,
                self.risk.coverage_velocity,
            ],
        )?;
        check_sum(
            "pairing weights",
            &[self.pairing.network, self.pairing.scene, self.pairing.creative],
        )?;

        let t = &self.thresholds;
        if !(0.0..=100.0).contains(&t.momentum_low) || t.momentum_low >= t.momentum_rising {
            return Err(RadarError::Validation(format!(
                "momentum thresholds out of order: low {} must be below rising {}",
                t.momentum_low, t.momentum_rising
            )));
        }
        if t.breakout_medium >= t.breakout_high {
            return Err(RadarError::Validation(format!(
                "breakout tiers out of order: medium {} must be below high {}",
                t.breakout_medium, t.breakout_high
            )));
        }
        if t.risk_medium >= t.risk_high {
            return Err(RadarError::Validation(format!(
                "risk tiers out of order: medium {} must be below high {}",
                t.risk_medium, t.risk_high
            )));
        }
        if t.creative_shift_low <= 0.0 || t.identity_low <= 0.0 {
            return Err(RadarError::Validation(
                "creative shift and identity thresholds must be positive".to_string(),
            ));
        }
        if !(t.coverage_velocity_low > -1.0 && t.coverage_velocity_low < 0.0) {
            return Err(RadarError::Validation(format!(
                "coverage velocity threshold {} must lie in (-1, 0)",
                t.coverage_velocity_low
            )));
        }
        if self.momentum.moderate_delta >= self.momentum.strong_delta {
            return Err(RadarError::Validation(
                "moderate momentum delta must be below the strong delta".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.pairing.creative_peak) {
            return Err(RadarError::Validation(
                "creative complementarity peak must lie in [0, 1]".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_sum(group: &str, weights: &[f64]) -> Result<()> {
    if weights.iter().any(|w| *w < 0.0) {
        return Err(RadarError::Validation(format!(
            "{group} must not be negative"
        )));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_EPSILON {
        return Err(RadarError::Validation(format!(
            "{group} must sum to 1.0, got {sum}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_valid() {
        assert!(ScoringModel::default().validate().is_ok());
    }

    #[test]
    fn breakout_weights_must_sum_to_one() {
        let mut model = ScoringModel::default();
        model.breakout.creative_shift = 0.5;
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("breakout weights"));
    }

    #[test]
    fn negative_weight_rejected() {
        let mut model = ScoringModel::default();
        model.composite.breakout = 1.2;
        model.composite.scene_alignment = -0.2;
        assert!(model.validate().is_err());
    }

    #[test]
    fn momentum_thresholds_must_be_ordered() {
        let mut model = ScoringModel::default();
        model.thresholds.momentum_low = 80.0;
        assert!(model.validate().is_err());
    }

    #[test]
    fn risk_tiers_must_be_ordered() {
        let mut model = ScoringModel::default();
        model.thresholds.risk_medium = 0.9;
        assert!(model.validate().is_err());
    }

    #[test]
    fn coverage_threshold_must_be_negative() {
        let mut model = ScoringModel::default();
        model.thresholds.coverage_velocity_low = 0.1;
        assert!(model.validate().is_err());
    }

    #[test]
    fn scene_dominates_pairing() {
        let weights = PairingWeights::default();
        assert!(weights.scene > weights.network);
        assert!(weights.scene > weights.creative);
    }
}
