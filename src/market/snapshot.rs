//! Request pipelines: fetch, reshape, rank.
//!
//! Shared by the HTTP handlers and the `scan` command. Every upstream failure
//! is reported back to its provider so the reconnect policy can react.

use tracing::{info, instrument, warn};

use super::assembler::assemble;
use super::error::MarketDataError;
use super::overview::coin_overview;
use super::ranker::top_positive;
use super::types::{unix_timestamp, FundingSnapshot, MarketOverview};
use crate::config::{RankingConfig, SparklineConfig};
use crate::exchange::coingecko::MarketsQuery;
use crate::exchange::{ClientProvider, FundingSource, MarketDataSource};

/// Fetch asset contexts, assemble every market and rank the top N.
#[instrument(skip_all, name = "funding_snapshot")]
pub async fn funding_snapshot(
    provider: &ClientProvider<dyn FundingSource>,
    ranking: &RankingConfig,
) -> Result<FundingSnapshot, MarketDataError> {
    let source = provider.get().await?;

    let contexts = match source.fetch_asset_contexts().await {
        Ok(contexts) => contexts,
        Err(e) => {
            warn!("Funding data fetch failed: {:#}", e);
            provider.report_failure().await;
            return Err(MarketDataError::upstream(&e));
        }
    };

    if contexts.descriptors.is_empty() {
        return Err(MarketDataError::DataShape(
            "perpetuals universe is empty".to_string(),
        ));
    }

    let all_markets = assemble(&contexts.descriptors, &contexts.states, &ranking.market_suffix)?;
    let top_funding_opportunities = top_positive(&all_markets, ranking.top_n);

    info!(
        markets = all_markets.len(),
        top = top_funding_opportunities.len(),
        "Funding snapshot ready"
    );

    Ok(FundingSnapshot {
        all_markets,
        top_funding_opportunities,
        last_updated_timestamp: unix_timestamp(),
        error_message: None,
    })
}

/// Fetch the spot listing and reshape every coin.
#[instrument(skip_all, name = "market_overview")]
pub async fn market_overview(
    provider: &ClientProvider<dyn MarketDataSource>,
    query: &MarketsQuery,
    sparkline: &SparklineConfig,
) -> Result<MarketOverview, MarketDataError> {
    let source = provider.get().await?;

    let coins = match source.fetch_markets(query).await {
        Ok(coins) => coins,
        Err(e) => {
            warn!("Market listing fetch failed: {:#}", e);
            provider.report_failure().await;
            return Err(MarketDataError::upstream(&e));
        }
    };

    let all_coins: Vec<_> = coins
        .into_iter()
        .map(|coin| coin_overview(coin, sparkline))
        .collect();

    info!(coins = all_coins.len(), "Market overview ready");

    Ok(MarketOverview {
        all_coins,
        last_updated_timestamp: unix_timestamp(),
        error_message: None,
    })
}
