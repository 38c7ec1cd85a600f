use tracing::debug;

use crate::error::Result;
use crate::services::RadarService;

/// Background manager that drops expired pulse and profile entries.
#[derive(Clone)]
pub struct CacheSweepManager {
    radar: RadarService,
    interval_secs: u64,
}

impl CacheSweepManager {
    pub fn new(radar: RadarService, interval_secs: u64) -> Self {
        Self {
            radar,
            interval_secs,
        }
    }

    pub async fn run_once(&self) -> Result<u64> {
        let removed = self.radar.sweep_expired() as u64;
        if removed > 0 {
            debug!(removed, "Swept expired cache entries");
        }
        Ok(removed)
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheConfig, RadarConfig};
    use crate::scoring::ScoringModel;
    use crate::services::test_support::{backend, seed};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_only_expired() {
        let (db, _file) = backend().await;
        seed(&db, "nova", None, |_| {}).await;
        let cache = CacheConfig::default();
        let radar = RadarService::new(
            db,
            Arc::new(ScoringModel::default()),
            RadarConfig::default(),
            &cache,
        );
        let sweeper = CacheSweepManager::new(radar.clone(), cache.sweep_interval_secs);

        radar.build_global_pulse(None, false).await.unwrap();
        radar.build_artist_profile("nova", false).await.unwrap();
        assert_eq!(sweeper.run_once().await.unwrap(), 0);

        // Past the pulse TTL but well inside the profile TTL.
        tokio::time::advance(Duration::from_secs(cache.pulse_ttl_secs + 1)).await;
        assert_eq!(sweeper.run_once().await.unwrap(), 1);

        let stats = radar.cache_stats();
        assert_eq!(stats.pulse.size, 0);
        assert_eq!(stats.profile.size, 1);
        assert_eq!(sweeper.interval_secs(), 300);
    }
}
