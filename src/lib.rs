//! # Funding Rate API
//!
//! Ranks Hyperliquid perpetual markets by funding rate and serves them,
//! together with a CoinGecko spot market overview, over HTTP.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading and validation
//! - `exchange`: Hyperliquid and CoinGecko clients, source traits, client providers
//! - `market`: Record assembly, ranking, sparkline reshaping and the request pipelines
//! - `api`: axum router, handlers and status mapping
//! - `utils`: Shared decimal arithmetic

pub mod api;
pub mod config;
pub mod exchange;
pub mod market;
pub mod utils;

pub use config::Config;
