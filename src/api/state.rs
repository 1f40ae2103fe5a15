use futures_util::FutureExt;
use std::sync::Arc;

use crate::config::{CoinGeckoConfig, Config, HyperliquidConfig, RankingConfig, SparklineConfig};
use crate::exchange::coingecko::MarketsQuery;
use crate::exchange::{
    ClientProvider, CoinGeckoClient, FundingSource, HyperliquidClient, MarketDataSource, Upstream,
};

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub funding: ClientProvider<dyn FundingSource>,
    pub market_data: ClientProvider<dyn MarketDataSource>,
    pub ranking: RankingConfig,
    pub sparkline: SparklineConfig,
    pub markets_query: MarketsQuery,
}

impl AppState {
    /// State backed by the real upstream clients. Nothing connects until first use.
    pub fn from_config(config: &Config) -> Arc<Self> {
        let hl_config = config.hyperliquid.clone();
        let funding = ClientProvider::new(
            Upstream::Hyperliquid,
            hl_config.reconnect,
            Box::new(move || connect_hyperliquid(hl_config.clone()).boxed()),
        );

        let cg_config = config.coingecko.clone();
        let market_data = ClientProvider::new(
            Upstream::CoinGecko,
            cg_config.reconnect,
            Box::new(move || connect_coingecko(cg_config.clone()).boxed()),
        );

        Self::new(config, funding, market_data)
    }

    pub fn new(
        config: &Config,
        funding: ClientProvider<dyn FundingSource>,
        market_data: ClientProvider<dyn MarketDataSource>,
    ) -> Arc<Self> {
        Arc::new(Self {
            funding,
            market_data,
            ranking: config.ranking.clone(),
            sparkline: config.sparkline.clone(),
            markets_query: config.coingecko.markets_query(),
        })
    }
}

async fn connect_hyperliquid(config: HyperliquidConfig) -> anyhow::Result<Arc<dyn FundingSource>> {
    let client = HyperliquidClient::from_config(&config)?;
    client.ping().await?;
    Ok(Arc::new(client))
}

async fn connect_coingecko(config: CoinGeckoConfig) -> anyhow::Result<Arc<dyn MarketDataSource>> {
    let client = CoinGeckoClient::from_config(&config)?;
    client.ping().await?;
    Ok(Arc::new(client))
}
