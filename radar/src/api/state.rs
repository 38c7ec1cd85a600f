use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::RadarBackend;
use crate::error::Result;
use crate::scoring::ScoreComputer;
use crate::services::{CollaborationService, InsightEngine, RadarService, ScoreRefreshManager};
use crate::signals::SignalAdapter;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn RadarBackend>,
    pub radar: RadarService,
    pub insights: InsightEngine,
    pub collaborations: CollaborationService,
    pub refresher: ScoreRefreshManager,
    pub signals_configured: bool,
}

impl AppState {
    /// Wire every service against one store and one signal source. Fails
    /// only when the configured scoring model is inconsistent.
    pub fn new(
        config: Config,
        db: Arc<dyn RadarBackend>,
        adapter: Arc<dyn SignalAdapter>,
    ) -> Result<Self> {
        let adapter_timeout = Duration::from_millis(config.signals.timeout_ms);
        let computer = ScoreComputer::new(
            adapter.clone(),
            config.scoring.model.clone(),
            adapter_timeout,
        )?;
        let model = Arc::new(computer.model().clone());

        let radar = RadarService::new(db.clone(), model.clone(), config.radar.clone(), &config.cache);
        let insights = InsightEngine::new(db.clone(), model.clone(), config.insights.clone());
        let collaborations = CollaborationService::new(
            db.clone(),
            adapter,
            adapter_timeout,
            model.pairing.clone(),
            config.pairing.clone(),
        );
        let refresher = ScoreRefreshManager::new(
            db.clone(),
            computer,
            radar.clone(),
            config.scoring.batch_size,
            config.scoring.refresh_interval_secs,
        );

        Ok(Self {
            signals_configured: config.signals.base_url.is_some(),
            config: Arc::new(config),
            db,
            radar,
            insights,
            collaborations,
            refresher,
        })
    }
}
