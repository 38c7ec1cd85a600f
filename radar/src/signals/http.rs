use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{CampaignContext, CreativeContext, NetworkContext, SceneContext, SignalAdapter};
use crate::{
    config::SignalsConfig,
    error::{RadarError, Result},
};

/// Fetches signal bundles from a JSON service at
/// `{base_url}/artists/{slug}/{network|scene|creative|campaign}`. The slug
/// is sent as a single percent-encoded path segment.
///
/// A 404 means the service has no data for the artist and yields an empty
/// bundle; every other failure is an error.
#[derive(Debug, Clone)]
pub struct HttpSignalAdapter {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpSignalAdapter {
    pub fn new(config: &SignalsConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| RadarError::SignalAdapter("signal base URL required".to_string()))?;
        let base_url = Url::parse(base_url)
            .map_err(|e| RadarError::SignalAdapter(format!("invalid signal base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RadarError::SignalAdapter(format!(
                "signal base URL cannot carry a path: {base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                RadarError::SignalAdapter(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, slug: &str, kind: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RadarError::SignalAdapter("signal base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["artists", slug, kind]);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned + Default>(&self, slug: &str, kind: &str) -> Result<T> {
        let url = self.endpoint(slug, kind)?;
        debug!("Fetching {} signals from {}", kind, url);

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RadarError::SignalAdapter(format!("{kind} signals timed out"))
            } else {
                RadarError::SignalAdapter(format!("{kind} signals request failed: {e}"))
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(T::default());
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(RadarError::SignalAdapter(format!(
                "{kind} signals returned {status}: {body}"
            )));
        }

        response.json::<T>().await.map_err(|e| {
            RadarError::SignalAdapter(format!("Failed to parse {kind} signals: {e}"))
        })
    }
}

#[async_trait]
impl SignalAdapter for HttpSignalAdapter {
    async fn network_context(&self, artist_slug: &str) -> Result<NetworkContext> {
        self.fetch(artist_slug, "network").await
    }

    async fn scene_context(&self, artist_slug: &str) -> Result<SceneContext> {
        self.fetch(artist_slug, "scene").await
    }

    async fn creative_context(&self, artist_slug: &str) -> Result<CreativeContext> {
        self.fetch(artist_slug, "creative").await
    }

    async fn campaign_context(&self, artist_slug: &str) -> Result<CampaignContext> {
        self.fetch(artist_slug, "campaign").await
    }
}
