//! Failures of a market data request.

use thiserror::Error;

/// Why a request produced no data. None of these are fatal to the process.
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// The upstream client could not be initialised or pinged.
    #[error("{source_name} is unavailable: {reason}")]
    UpstreamUnavailable {
        source_name: &'static str,
        reason: String,
    },

    /// The upstream call itself failed (transport, status, body decoding).
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// The universe and the asset states cannot be aligned by position.
    #[error(
        "length mismatch: {descriptors} asset descriptors vs {states} asset states"
    )]
    LengthMismatch { descriptors: usize, states: usize },

    /// The upstream answered with something structurally unusable.
    #[error("unexpected data shape: {0}")]
    DataShape(String),
}

impl MarketDataError {
    /// Wrap a client error, keeping its context chain in the message.
    pub fn upstream(err: &anyhow::Error) -> Self {
        Self::Upstream(format!("{:#}", err))
    }

    /// Whether the failure came from talking to the upstream.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. } | Self::Upstream(_))
    }
}
