//! Funding rate ranking.

use rust_decimal::Decimal;

use super::types::MarketRecord;

/// The `n` markets with the highest strictly positive hourly funding.
///
/// Stable: markets with equal rates keep their assembly order.
pub fn top_positive(records: &[MarketRecord], n: usize) -> Vec<MarketRecord> {
    let mut positive: Vec<MarketRecord> = records
        .iter()
        .filter(|r| r.hourly_percentage > Decimal::ZERO)
        .cloned()
        .collect();

    positive.sort_by(|a, b| b.hourly_percentage.cmp(&a.hourly_percentage));
    positive.truncate(n);
    positive
}
