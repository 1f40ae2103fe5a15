//! Upstream data integrations.
//!
//! ## Hyperliquid
//! Perpetuals universe and asset contexts:
//! - Hourly funding rates
//! - Open interest and 24h notional volume
//!
//! ## CoinGecko
//! Spot market listing:
//! - Prices, market caps, supply
//! - 1h/24h/7d changes and 7-day sparklines

pub mod coingecko;
pub mod hyperliquid;
mod provider;
mod traits;

pub use coingecko::CoinGeckoClient;
pub use hyperliquid::HyperliquidClient;
pub use provider::{ClientProvider, Connector, ReconnectPolicy};
pub use traits::*;
