//! Market detail assembly.
//!
//! Joins the Hyperliquid universe with its asset states by position and
//! converts each pair into a `MarketRecord`. Positional correspondence is the
//! only link between the two lists, so a length mismatch rejects the batch;
//! anything smaller (a bad field, a malformed entry) only affects its own
//! field or market.

use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::error::MarketDataError;
use super::types::MarketRecord;
use crate::exchange::hyperliquid::{AssetDescriptor, AssetState, RawNumeric, StateEntry};
use crate::utils::decimal::{hourly_to_apr, to_percentage};

/// Build one record per named descriptor, in universe order.
pub fn assemble(
    descriptors: &[AssetDescriptor],
    states: &[StateEntry],
    market_suffix: &str,
) -> Result<Vec<MarketRecord>, MarketDataError> {
    if descriptors.len() != states.len() {
        warn!(
            descriptors = descriptors.len(),
            states = states.len(),
            "Universe and asset states differ in length; refusing to map by position"
        );
        return Err(MarketDataError::LengthMismatch {
            descriptors: descriptors.len(),
            states: states.len(),
        });
    }

    let mut records = Vec::with_capacity(descriptors.len());

    for (index, (descriptor, entry)) in descriptors.iter().zip(states).enumerate() {
        let Some(name) = descriptor.market_name() else {
            debug!(index, "Skipping universe entry without a name");
            continue;
        };

        match entry {
            StateEntry::State(state) => records.push(build_record(name, state, market_suffix)),
            StateEntry::Malformed(raw) => {
                warn!(market = name, index, state = %raw, "Asset state is not an object; skipping");
            }
        }
    }

    info!(markets = records.len(), "Assembled market details");
    Ok(records)
}

fn build_record(name: &str, state: &AssetState, market_suffix: &str) -> MarketRecord {
    let mut record = MarketRecord {
        market: format!("{}{}", name, market_suffix),
        ..MarketRecord::default()
    };

    if let Some(hourly_rate) = parse_field(name, "funding", state.funding.as_ref()) {
        // Both or neither, so apr always matches hourly_percentage.
        match to_percentage(hourly_rate).zip(hourly_to_apr(hourly_rate)) {
            Some((hourly_percentage, apr)) => {
                record.hourly_percentage = hourly_percentage;
                record.apr = apr;
            }
            None => {
                warn!(market = name, funding = %hourly_rate, "Funding rate out of range; using 0");
            }
        }
    }

    if let Some(volume) = parse_field(name, "dayNtlVlm", state.day_ntl_vlm.as_ref()) {
        record.volume_24h = volume;
    }

    if let Some(open_interest) = parse_field(name, "openInterest", state.open_interest.as_ref()) {
        record.open_interest = open_interest;
    }

    record
}

/// Parse an optional numeric field; absent is silent, unparsable warns.
fn parse_field(market: &str, field: &'static str, raw: Option<&RawNumeric>) -> Option<Decimal> {
    let raw = raw?;
    let parsed = raw.to_decimal();
    if parsed.is_none() {
        warn!(market, field, value = %raw.raw(), "Could not parse numeric field; using 0");
    }
    parsed
}

/// Unique, non-empty market names in universe order.
pub fn perpetual_market_names(descriptors: &[AssetDescriptor]) -> Vec<String> {
    let mut seen = HashSet::new();
    descriptors
        .iter()
        .filter_map(AssetDescriptor::market_name)
        .filter(|name| seen.insert(*name))
        .map(String::from)
        .collect()
}
