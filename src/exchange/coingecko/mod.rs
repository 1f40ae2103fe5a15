//! CoinGecko market-data integration.
//!
//! Spot prices, market caps, supply figures and 7-day sparklines from the
//! paginated `/coins/markets` listing.

mod client;
mod types;

pub use client::{CoinGeckoClient, PUBLIC_API_URL};
pub use types::*;
