use serde::{Deserialize, Serialize};

/// Activity totals for the current and the preceding window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActivityWindow {
    pub current: f64,
    pub previous: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkContext {
    pub connectivity_score: Option<f64>,
    pub collaborators: Vec<String>,
    pub labels: Vec<String>,
    pub producers: Vec<String>,
    pub activity: Option<ActivityWindow>,
}

impl NetworkContext {
    /// Every node identifier the artist is linked to.
    pub fn nodes(&self) -> impl Iterator<Item = &String> {
        self.collaborators
            .iter()
            .chain(self.labels.iter())
            .chain(self.producers.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneContext {
    pub scene_fit: Option<f64>,
    pub scene_opportunity: Option<f64>,
    pub active_scenes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreativeContext {
    pub creative_shift: Option<f64>,
    pub identity_alignment: Option<f64>,
    pub motifs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CampaignContext {
    pub press_quality: Option<f64>,
    /// Signed change in coverage, in [-1, 1].
    pub coverage_velocity: Option<f64>,
    pub campaign_efficiency: Option<f64>,
    pub coverage_activity: Option<ActivityWindow>,
}

/// Everything the score computer gathered for one artist.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignalBundle {
    pub network: NetworkContext,
    pub scene: SceneContext,
    pub creative: CreativeContext,
    pub campaign: CampaignContext,
    pub partial: bool,
}

impl SignalBundle {
    /// Inputs that scoring needs but the adapters did not supply. Each one
    /// falls back to a neutral value.
    pub fn missing_signals(&self) -> Vec<&'static str> {
        let checks = [
            ("connectivityScore", self.network.connectivity_score.is_none()),
            ("sceneFit", self.scene.scene_fit.is_none()),
            ("sceneOpportunity", self.scene.scene_opportunity.is_none()),
            ("creativeShift", self.creative.creative_shift.is_none()),
            ("identityAlignment", self.creative.identity_alignment.is_none()),
            ("pressQuality", self.campaign.press_quality.is_none()),
            ("coverageVelocity", self.campaign.coverage_velocity.is_none()),
            ("campaignEfficiency", self.campaign.campaign_efficiency.is_none()),
            (
                "activity",
                self.network.activity.is_none() && self.campaign.coverage_activity.is_none(),
            ),
        ];
        checks
            .into_iter()
            .filter(|(_, missing)| *missing)
            .map(|(name, _)| name)
            .collect()
    }

    /// An adapter failed or returned incomplete data.
    pub fn is_partial(&self) -> bool {
        self.partial || !self.missing_signals().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let ctx: NetworkContext = serde_json::from_str(r#"{"labels": ["xl"]}"#).unwrap();
        assert_eq!(ctx.connectivity_score, None);
        assert!(ctx.collaborators.is_empty());
        assert_eq!(ctx.labels, vec!["xl"]);
        assert!(ctx.activity.is_none());
    }

    #[test]
    fn nodes_chain_all_link_kinds() {
        let ctx = NetworkContext {
            collaborators: vec!["a".into()],
            labels: vec!["b".into()],
            producers: vec!["c".into()],
            ..Default::default()
        };
        let nodes: Vec<&String> = ctx.nodes().collect();
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn campaign_context_reads_camel_case() {
        let ctx: CampaignContext = serde_json::from_str(
            r#"{"pressQuality": 0.8, "coverageVelocity": -0.4, "coverageActivity": {"current": 12, "previous": 10}}"#,
        )
        .unwrap();
        assert_eq!(ctx.press_quality, Some(0.8));
        assert_eq!(ctx.coverage_velocity, Some(-0.4));
        assert_eq!(ctx.coverage_activity.unwrap().current, 12.0);
    }

    #[test]
    fn empty_bundle_reports_every_signal_missing() {
        let bundle = SignalBundle::default();
        assert_eq!(bundle.missing_signals().len(), 9);
        assert!(bundle.is_partial());
    }

    #[test]
    fn one_activity_window_is_enough() {
        let mut bundle = SignalBundle {
            network: NetworkContext {
                connectivity_score: Some(0.5),
                ..Default::default()
            },
            scene: SceneContext {
                scene_fit: Some(0.5),
                scene_opportunity: Some(0.5),
                ..Default::default()
            },
            creative: CreativeContext {
                creative_shift: Some(0.5),
                identity_alignment: Some(0.5),
                ..Default::default()
            },
            campaign: CampaignContext {
                press_quality: Some(0.5),
                coverage_velocity: Some(0.0),
                campaign_efficiency: Some(0.5),
                coverage_activity: Some(ActivityWindow {
                    current: 1.0,
                    previous: 1.0,
                }),
            },
            partial: false,
        };
        assert!(bundle.missing_signals().is_empty());
        assert!(!bundle.is_partial());

        bundle.creative.identity_alignment = None;
        assert_eq!(bundle.missing_signals(), vec!["identityAlignment"]);
        assert!(bundle.is_partial());
    }
}
