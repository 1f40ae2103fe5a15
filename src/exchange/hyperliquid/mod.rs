//! Hyperliquid exchange integration.
//!
//! Provides read-only access to Hyperliquid perpetuals market data.
//!
//! # Funding Rate Notes
//!
//! Hyperliquid funding is paid **hourly**; the `funding` field of an asset
//! context is the current hourly rate as a fraction (0.0001 = 0.01%/h).
//!
//! The universe (`meta.universe`) and the asset contexts are parallel lists:
//! index `i` of one describes index `i` of the other. Nothing else links them.

mod client;
mod types;

pub use client::{HyperliquidClient, MAINNET_API_URL};
pub use types::*;
