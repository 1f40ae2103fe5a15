//! Venue-agnostic traits for the upstream data providers.
//!
//! The service only depends on these seams, so request handling can be
//! exercised without the network and other venues can be added later.

use async_trait::async_trait;

use super::coingecko::{CoinMarket, MarketsQuery};
use super::hyperliquid::AssetContexts;

/// A perpetuals venue exposing a universe and positionally-aligned asset states.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FundingSource: Send + Sync {
    /// Fetch the asset descriptors and their states in one consistent call.
    async fn fetch_asset_contexts(&self) -> anyhow::Result<AssetContexts>;
}

/// A spot market-data provider with a paginated market listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch every page the query asks for, concatenated in page order.
    async fn fetch_markets(&self, query: &MarketsQuery) -> anyhow::Result<Vec<CoinMarket>>;
}

/// Upstream identifier used in logs and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    Hyperliquid,
    CoinGecko,
}

impl Upstream {
    pub fn name(&self) -> &'static str {
        match self {
            Upstream::Hyperliquid => "Hyperliquid",
            Upstream::CoinGecko => "CoinGecko",
        }
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
