//! Hyperliquid REST API client.
//!
//! Read-only access to the perpetuals universe and per-asset contexts
//! (funding, open interest, notional volume).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::types::*;
use crate::config::HyperliquidConfig;
use crate::exchange::traits::FundingSource;

/// Base URL for Hyperliquid mainnet API.
pub const MAINNET_API_URL: &str = "https://api.hyperliquid.xyz";

/// Hyperliquid API client for fetching market data.
#[derive(Debug, Clone)]
pub struct HyperliquidClient {
    client: Client,
    base_url: String,
}

impl HyperliquidClient {
    /// Create a new Hyperliquid client for mainnet.
    pub fn new() -> Result<Self> {
        Self::with_base_url(MAINNET_API_URL, Duration::from_secs(30))
    }

    /// Create a client from configuration.
    pub fn from_config(config: &HyperliquidConfig) -> Result<Self> {
        Self::with_base_url(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Create a new Hyperliquid client with a custom base URL.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST an info request and decode the JSON body.
    async fn info<T: DeserializeOwned>(&self, request: &InfoRequest) -> Result<T> {
        let url = format!("{}/info", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("Failed to send {:?} request", request))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Hyperliquid API error {}: {}", status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {:?} response", request))
    }

    /// Check connectivity with a cheap `meta` request.
    #[instrument(skip(self), name = "hl_ping")]
    pub async fn ping(&self) -> Result<()> {
        let meta: Meta = self.info(&InfoRequest::Meta).await?;
        debug!(universe = meta.universe.len(), "Hyperliquid reachable");
        Ok(())
    }

    /// Get metadata and asset contexts for all perpetuals, positionally aligned.
    #[instrument(skip(self), name = "hl_meta_and_asset_ctxs")]
    pub async fn get_meta_and_asset_ctxs(&self) -> Result<AssetContexts> {
        let data: MetaAndAssetCtxsResponse = self.info(&InfoRequest::MetaAndAssetCtxs).await?;
        let contexts = AssetContexts::from(data);

        info!(
            descriptors = contexts.descriptors.len(),
            states = contexts.states.len(),
            "Fetched Hyperliquid asset contexts"
        );

        Ok(contexts)
    }
}

#[async_trait]
impl FundingSource for HyperliquidClient {
    async fn fetch_asset_contexts(&self) -> Result<AssetContexts> {
        self.get_meta_and_asset_ctxs().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HyperliquidClient {
        HyperliquidClient::with_base_url(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_asset_contexts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/info"))
            .and(body_json(json!({"type": "metaAndAssetCtxs"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"universe": [{"name": "BTC", "szDecimals": 5, "maxLeverage": 40}, {"name": "ETH"}]},
                [{"funding": "0.0001", "dayNtlVlm": "100"}, {"funding": "-0.0002"}]
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let contexts = client_for(&server).fetch_asset_contexts().await.unwrap();
        assert_eq!(contexts.descriptors.len(), 2);
        assert_eq!(contexts.descriptors[1].market_name(), Some("ETH"));
        assert_eq!(contexts.states.len(), 2);
    }

    #[tokio::test]
    async fn test_ping_uses_meta_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/info"))
            .and(body_json(json!({"type": "meta"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"universe": []})))
            .expect(1)
            .mount(&server)
            .await;

        tokio_test::assert_ok!(client_for(&server).ping().await);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_asset_contexts().await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("429"), "{message}");
        assert!(message.contains("rate limited"), "{message}");
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        assert!(client_for(&server).fetch_asset_contexts().await.is_err());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_fetch() {
        let client = HyperliquidClient::new().unwrap();
        let contexts = client.get_meta_and_asset_ctxs().await.unwrap();

        assert!(!contexts.descriptors.is_empty());
        assert_eq!(contexts.descriptors.len(), contexts.states.len());
        assert!(contexts
            .descriptors
            .iter()
            .any(|d| d.market_name() == Some("BTC")));
    }
}
