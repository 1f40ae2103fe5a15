//! Records served to clients.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One perpetual market, flattened from a descriptor and its state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    /// Display identifier, e.g. "BTC-PERP"
    pub market: String,
    /// Hourly funding rate as a percentage (0.01 = 0.01%/h)
    #[serde(with = "rust_decimal::serde::float")]
    pub hourly_percentage: Decimal,
    /// Hourly rate × 24 × 365, as a percentage
    #[serde(with = "rust_decimal::serde::float")]
    pub apr: Decimal,
    /// 24h notional volume in USD
    #[serde(with = "rust_decimal::serde::float")]
    pub volume_24h: Decimal,
    /// Open interest
    #[serde(with = "rust_decimal::serde::float")]
    pub open_interest: Decimal,
}

/// Payload of `GET /api/funding-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingSnapshot {
    pub all_markets: Vec<MarketRecord>,
    pub top_funding_opportunities: Vec<MarketRecord>,
    /// Unix seconds
    pub last_updated_timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl FundingSnapshot {
    /// Empty payload carrying an error message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            all_markets: Vec::new(),
            top_funding_opportunities: Vec::new(),
            last_updated_timestamp: unix_timestamp(),
            error_message: Some(message.into()),
        }
    }
}

/// One coin of the spot market overview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinOverviewRecord {
    pub rank: Option<u32>,
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: Option<f64>,
    pub price_change_percentage_1h: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub price_change_percentage_7d: Option<f64>,
    pub market_cap: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub fully_diluted_valuation: Option<f64>,
    pub volume_24h: Option<f64>,
    pub sparkline_7d: Vec<f64>,
}

/// Payload of `GET /api/market-overview`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOverview {
    pub all_coins: Vec<CoinOverviewRecord>,
    /// Unix seconds
    pub last_updated_timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl MarketOverview {
    /// Empty payload carrying an error message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            all_coins: Vec::new(),
            last_updated_timestamp: unix_timestamp(),
            error_message: Some(message.into()),
        }
    }
}

/// Current time as fractional Unix seconds.
pub fn unix_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
