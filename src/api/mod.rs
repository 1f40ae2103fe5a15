//! HTTP API.
//!
//! - `GET /api/funding-data`: every Hyperliquid perpetual plus the top positive funding markets
//! - `GET /api/market-overview`: CoinGecko spot listing with down-sampled sparklines
//! - `GET /health`: liveness and upstream handle status
//!
//! Failed data requests answer 503 (upstream unavailable) or 502 (upstream
//! error or unusable data) with the endpoint's usual payload, empty, plus an
//! `error_message`.

mod error;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

pub use error::status_for;
pub use state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::routes())
        .fallback(error::not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr: SocketAddr = listener.local_addr().context("Listener has no local address")?;
    info!("Funding rate API listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}
