mod cache_sweep;
mod insights;
mod pairing;
mod radar;
mod score_refresh;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache_sweep::CacheSweepManager;
pub use insights::InsightEngine;
pub use pairing::{assess_features, CollaborationService, PairingFeatures};
pub use radar::{derive_profile, RadarCacheStats, RadarService};
pub use score_refresh::ScoreRefreshManager;
