use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::error::respond;
use super::state::AppState;
use crate::market::{self, FundingSnapshot, MarketDataError, MarketOverview};

// ── Route definitions ────────────────────────────────────────────────────

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/funding-data", get(funding_data))
        .route("/api/market-overview", get(market_overview))
        .route("/health", get(health))
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn funding_data(State(state): State<Arc<AppState>>) -> Response {
    info!("GET /api/funding-data");

    match market::funding_snapshot(&state.funding, &state.ranking).await {
        Ok(snapshot) => {
            info!(
                markets = snapshot.all_markets.len(),
                top = snapshot.top_funding_opportunities.len(),
                "Sending funding data"
            );
            respond(snapshot, None)
        }
        Err(e) => {
            log_failure("Funding data", &e);
            respond(FundingSnapshot::failed(e.to_string()), Some(&e))
        }
    }
}

async fn market_overview(State(state): State<Arc<AppState>>) -> Response {
    info!("GET /api/market-overview");

    match market::market_overview(&state.market_data, &state.markets_query, &state.sparkline).await
    {
        Ok(overview) => {
            info!(coins = overview.all_coins.len(), "Sending market overview");
            respond(overview, None)
        }
        Err(e) => {
            log_failure("Market overview", &e);
            respond(MarketOverview::failed(e.to_string()), Some(&e))
        }
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "funding_source": state.funding.is_ready(),
        "market_data_source": state.market_data.is_ready(),
    }))
}

/// Upstream trouble is expected now and then; bad data is not.
fn log_failure(what: &str, err: &MarketDataError) {
    if err.is_upstream() {
        warn!("{} unavailable: {}", what, err);
    } else {
        error!("{} unusable: {}", what, err);
    }
}
