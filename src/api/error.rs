use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::market::MarketDataError;

/// Status code for a failed data request.
///
/// Failures always carry the endpoint's full payload shape; only the status
/// distinguishes "could not connect" from "connected but got bad data".
pub fn status_for(err: &MarketDataError) -> StatusCode {
    match err {
        MarketDataError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        MarketDataError::Upstream(_)
        | MarketDataError::LengthMismatch { .. }
        | MarketDataError::DataShape(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Payload plus the status matching its error, if any.
pub fn respond<T: Serialize>(payload: T, err: Option<&MarketDataError>) -> Response {
    let status = err.map(status_for).unwrap_or(StatusCode::OK);
    (status, Json(payload)).into_response()
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not_found" }))).into_response()
}
