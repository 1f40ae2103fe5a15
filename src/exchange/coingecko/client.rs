//! CoinGecko REST API client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::types::*;
use crate::config::CoinGeckoConfig;
use crate::exchange::traits::MarketDataSource;

/// Base URL for the public CoinGecko API.
pub const PUBLIC_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Header carrying a demo-plan API key.
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// CoinGecko API client for spot market listings.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    /// Create a client for the public API without a key.
    pub fn new() -> Result<Self> {
        Self::with_base_url(PUBLIC_API_URL, None, Duration::from_secs(30))
    }

    /// Create a client from configuration.
    pub fn from_config(config: &CoinGeckoConfig) -> Result<Self> {
        let api_key = Some(config.api_key.clone()).filter(|k| !k.is_empty());
        Self::with_base_url(
            &config.base_url,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Create a client with a custom base URL.
    pub fn with_base_url(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn get(&self, endpoint: &str) -> RequestBuilder {
        let request = self.client.get(format!("{}{}", self.base_url, endpoint));
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    /// Check connectivity via `/ping`.
    #[instrument(skip(self), name = "cg_ping")]
    pub async fn ping(&self) -> Result<()> {
        let response = self
            .get("/ping")
            .send()
            .await
            .context("Failed to send ping request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("CoinGecko API error {}: {}", status, body);
        }

        debug!("CoinGecko reachable");
        Ok(())
    }

    /// Fetch a single page of `/coins/markets`.
    #[instrument(skip(self, query), name = "cg_markets_page")]
    pub async fn get_markets_page(&self, query: &MarketsQuery, page: u32) -> Result<Vec<CoinMarket>> {
        let response = self
            .get("/coins/markets")
            .query(&query.params(page))
            .send()
            .await
            .context("Failed to send coins/markets request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("CoinGecko API error {}: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse coins/markets response")
    }

    /// Fetch pages `1..=query.pages`, stopping at the first short page.
    #[instrument(skip(self, query), fields(pages = query.pages, per_page = query.per_page), name = "cg_markets")]
    pub async fn get_markets(&self, query: &MarketsQuery) -> Result<Vec<CoinMarket>> {
        let mut markets = Vec::new();

        for page in 1..=query.pages.max(1) {
            let rows = self.get_markets_page(query, page).await?;
            let short_page = rows.len() < query.per_page as usize;
            markets.extend(rows);
            if short_page {
                break;
            }
        }

        info!(coins = markets.len(), "Fetched CoinGecko market listing");
        Ok(markets)
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn fetch_markets(&self, query: &MarketsQuery) -> Result<Vec<CoinMarket>> {
        self.get_markets(query).await
    }
}
