//! Market data shaping: assembly, ranking and overview records.
//!
//! Components:
//! - `assembler`: Joins the Hyperliquid universe with asset states by position
//! - `ranker`: Top-N positive funding selection
//! - `overview`: CoinGecko listing rows to overview records
//! - `snapshot`: End-to-end request pipelines

pub mod assembler;
mod error;
pub mod overview;
pub mod ranker;
pub mod snapshot;
mod types;

pub use assembler::{assemble, perpetual_market_names};
pub use error::MarketDataError;
pub use overview::{coin_overview, downsample};
pub use ranker::top_positive;
pub use snapshot::{funding_snapshot, market_overview};
pub use types::*;
