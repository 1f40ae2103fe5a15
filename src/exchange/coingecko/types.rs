//! Type definitions for CoinGecko API responses.

use serde::{Deserialize, Serialize};

/// Parameters of a `/coins/markets` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketsQuery {
    /// Quote currency, e.g. "usd"
    pub vs_currency: String,
    /// Sort order, e.g. "market_cap_desc"
    pub order: String,
    /// Rows per page (CoinGecko caps this at 250)
    pub per_page: u32,
    /// Number of pages to fetch, starting at page 1
    pub pages: u32,
    /// Percentage-change windows, e.g. ["1h", "24h", "7d"]
    pub price_change_windows: Vec<String>,
}

impl MarketsQuery {
    /// Query-string pairs for one page.
    pub fn params(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.vs_currency.clone()),
            ("order", self.order.clone()),
            ("per_page", self.per_page.to_string()),
            ("page", page.to_string()),
            ("sparkline", "true".to_string()),
            ("price_change_percentage", self.price_change_windows.join(",")),
        ]
    }
}

impl Default for MarketsQuery {
    fn default() -> Self {
        Self {
            vs_currency: "usd".to_string(),
            order: "market_cap_desc".to_string(),
            per_page: 100,
            pages: 1,
            price_change_windows: vec!["1h".to_string(), "24h".to_string(), "7d".to_string()],
        }
    }
}

/// One row of `/coins/markets`.
///
/// CoinGecko sends `null` for anything it cannot compute, so every numeric
/// field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub fully_diluted_valuation: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_1h_in_currency: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h_in_currency: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d_in_currency: Option<f64>,
    #[serde(default)]
    pub sparkline_in_7d: Option<Sparkline>,
}

/// Hourly prices over the last 7 days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sparkline {
    #[serde(default)]
    pub price: Vec<Option<f64>>,
}
