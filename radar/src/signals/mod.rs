//! Read-only signal sources for tracked artists.
//!
//! The engine only ever talks to [`SignalAdapter`]; raw signals (graph
//! connectivity, scene membership, theme extraction) are computed elsewhere.

mod http;
mod types;

pub use http::HttpSignalAdapter;
pub use types::*;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{RadarError, Result};

#[async_trait]
pub trait SignalAdapter: Send + Sync {
    async fn network_context(&self, artist_slug: &str) -> Result<NetworkContext>;

    async fn scene_context(&self, artist_slug: &str) -> Result<SceneContext>;

    async fn creative_context(&self, artist_slug: &str) -> Result<CreativeContext>;

    /// Press quality, coverage velocity and campaign efficiency.
    async fn campaign_context(&self, artist_slug: &str) -> Result<CampaignContext>;
}

/// Stands in when no signal source is configured. Every call fails, so
/// computed snapshots are flagged partial rather than passing neutral
/// defaults off as real data.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredSignalAdapter;

impl UnconfiguredSignalAdapter {
    fn unavailable<T>() -> Result<T> {
        Err(RadarError::SignalAdapter(
            "no signal source configured".to_string(),
        ))
    }
}

#[async_trait]
impl SignalAdapter for UnconfiguredSignalAdapter {
    async fn network_context(&self, _artist_slug: &str) -> Result<NetworkContext> {
        Self::unavailable()
    }

    async fn scene_context(&self, _artist_slug: &str) -> Result<SceneContext> {
        Self::unavailable()
    }

    async fn creative_context(&self, _artist_slug: &str) -> Result<CreativeContext> {
        Self::unavailable()
    }

    async fn campaign_context(&self, _artist_slug: &str) -> Result<CampaignContext> {
        Self::unavailable()
    }
}

/// Run an adapter call under a deadline. Elapsed deadlines surface as
/// [`RadarError::Timeout`] and the in-flight call is dropped.
pub async fn bounded<T, F>(limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(RadarError::Timeout(limit.as_millis() as u64)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn bounded_times_out_slow_calls() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, RadarError>(1)
        };
        let err = bounded(Duration::from_millis(250), slow).await.unwrap_err();
        assert!(matches!(err, RadarError::Timeout(250)));
    }

    #[tokio::test]
    async fn bounded_passes_results_through() {
        let value = bounded(Duration::from_secs(1), async { Ok::<_, RadarError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn unconfigured_adapter_always_fails() {
        let adapter = UnconfiguredSignalAdapter;
        assert!(adapter.network_context("nova").await.is_err());
        assert!(adapter.campaign_context("nova").await.is_err());
    }
}
