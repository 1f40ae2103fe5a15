//! Spot market overview reshaping.

use super::types::CoinOverviewRecord;
use crate::config::SparklineConfig;
use crate::exchange::coingecko::CoinMarket;

/// Thin a price series: above `threshold` points keep every `step`-th one.
pub fn downsample<T: Copy>(series: &[T], threshold: usize, step: usize) -> Vec<T> {
    if series.len() > threshold && step > 1 {
        series.iter().step_by(step).copied().collect()
    } else {
        series.to_vec()
    }
}

/// Flatten a listing row into the record served to clients.
pub fn coin_overview(coin: CoinMarket, sparkline: &SparklineConfig) -> CoinOverviewRecord {
    // Sample on the hourly grid first; gaps must not shift it.
    let hourly = coin.sparkline_in_7d.map(|s| s.price).unwrap_or_default();
    let sparkline_7d = downsample(&hourly, sparkline.threshold, sparkline.step)
        .into_iter()
        .flatten()
        .collect();

    CoinOverviewRecord {
        rank: coin.market_cap_rank,
        id: coin.id,
        name: coin.name,
        symbol: coin.symbol.to_uppercase(),
        price: coin.current_price,
        price_change_percentage_1h: coin.price_change_percentage_1h_in_currency,
        price_change_percentage_24h: coin.price_change_percentage_24h_in_currency,
        price_change_percentage_7d: coin.price_change_percentage_7d_in_currency,
        market_cap: coin.market_cap,
        circulating_supply: coin.circulating_supply,
        fully_diluted_valuation: coin.fully_diluted_valuation,
        volume_24h: coin.total_volume,
        sparkline_7d,
    }
}
