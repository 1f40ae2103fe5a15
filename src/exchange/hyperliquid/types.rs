//! Type definitions for Hyperliquid API responses.
//!
//! Hyperliquid returns the perpetuals universe and the per-asset contexts as
//! two parallel lists. Both are decoded leniently here: a malformed entry must
//! keep its slot so positional alignment with the other list survives.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::utils::decimal::parse_decimal;

/// Request type for Hyperliquid info endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum InfoRequest {
    /// Get metadata and asset contexts (funding rates, volume, OI).
    #[serde(rename = "metaAndAssetCtxs")]
    MetaAndAssetCtxs,

    /// Get the perpetuals universe only. Cheap; used as a connectivity check.
    #[serde(rename = "meta")]
    Meta,
}

/// Raw response from metaAndAssetCtxs: `[meta, [ctx, ...]]`.
pub type MetaAndAssetCtxsResponse = (Meta, Vec<StateEntry>);

/// Universe metadata for perpetuals.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub universe: Vec<UniverseEntry>,
}

/// One slot of the universe list.
#[derive(Debug, Clone, PartialEq)]
pub enum UniverseEntry {
    Asset(AssetDescriptor),
    Malformed(Value),
}

impl<'de> Deserialize<'de> for UniverseEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match object_entry(&value) {
            Some(descriptor) => UniverseEntry::Asset(descriptor),
            None => UniverseEntry::Malformed(value),
        })
    }
}

impl From<UniverseEntry> for AssetDescriptor {
    fn from(entry: UniverseEntry) -> Self {
        match entry {
            UniverseEntry::Asset(descriptor) => descriptor,
            // Keeps the slot; the assembler skips nameless descriptors.
            UniverseEntry::Malformed(_) => AssetDescriptor::default(),
        }
    }
}

/// Metadata for a single asset in the universe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDescriptor {
    /// Asset name (e.g., "BTC", "ETH")
    #[serde(default)]
    pub name: Option<String>,
    /// Size decimal precision
    #[serde(default, deserialize_with = "lenient")]
    pub sz_decimals: Option<u32>,
    /// Maximum allowed leverage
    #[serde(default, deserialize_with = "lenient")]
    pub max_leverage: Option<u32>,
    /// Whether only isolated margin is allowed
    #[serde(default, deserialize_with = "lenient_flag")]
    pub only_isolated: bool,
    /// Delisted assets stay in the universe to preserve indices
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_delisted: bool,
}

impl AssetDescriptor {
    /// Descriptor with just a name, as most callers only care about that.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The name, if present and non-empty.
    pub fn market_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// One slot of the asset context list.
#[derive(Debug, Clone, PartialEq)]
pub enum StateEntry {
    State(AssetState),
    Malformed(Value),
}

impl<'de> Deserialize<'de> for StateEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match object_entry(&value) {
            Some(state) => StateEntry::State(state),
            None => StateEntry::Malformed(value),
        })
    }
}

/// Decode a list slot. Only JSON objects qualify; serde would otherwise
/// read an array positionally into the struct's fields.
fn object_entry<T: DeserializeOwned>(value: &Value) -> Option<T> {
    if !value.is_object() {
        return None;
    }
    T::deserialize(value).ok()
}

/// Optional field where a wrong type counts as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(&value).ok())
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    lenient(deserializer).map(Option::unwrap_or_default)
}

/// Real-time context for an asset. Only the fields the service reports.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetState {
    /// Current funding rate (hourly, fractional)
    #[serde(default)]
    pub funding: Option<RawNumeric>,
    /// Daily notional volume
    #[serde(default)]
    pub day_ntl_vlm: Option<RawNumeric>,
    /// Open interest
    #[serde(default)]
    pub open_interest: Option<RawNumeric>,
}

/// A numeric field exactly as the API sent it.
///
/// Hyperliquid encodes numbers as strings, but plain JSON numbers are accepted
/// too. Parsing is deferred so one bad field never fails the whole response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNumeric(Value);

impl RawNumeric {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// Parse as a decimal; `None` for non-numeric content.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match &self.0 {
            Value::String(s) => parse_decimal(s),
            Value::Number(n) => parse_decimal(&n.to_string()),
            _ => None,
        }
    }

    /// The raw JSON, for log messages.
    pub fn raw(&self) -> &Value {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RawNumeric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(RawNumeric)
    }
}

/// Decoded metaAndAssetCtxs payload, positionally aligned.
#[derive(Debug, Clone, Default)]
pub struct AssetContexts {
    pub descriptors: Vec<AssetDescriptor>,
    pub states: Vec<StateEntry>,
}

impl From<MetaAndAssetCtxsResponse> for AssetContexts {
    fn from((meta, states): MetaAndAssetCtxsResponse) -> Self {
        Self {
            descriptors: meta.universe.into_iter().map(AssetDescriptor::from).collect(),
            states,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_meta_and_asset_ctxs() {
        let json = r#"[
            {"universe": [
                {"name": "BTC", "szDecimals": 5, "maxLeverage": 50},
                {"name": "ETH", "szDecimals": 4, "maxLeverage": 50, "onlyIsolated": false}
            ]},
            [
                {"funding": "0.0000125", "openInterest": "1234567.89", "dayNtlVlm": "999999999.0",
                 "prevDayPx": "50000.0", "markPx": "50005.0", "premium": null},
                {"funding": "-0.00002", "openInterest": "1000.5", "dayNtlVlm": "12.0"}
            ]
        ]"#;

        let response: MetaAndAssetCtxsResponse = serde_json::from_str(json).unwrap();
        let contexts = AssetContexts::from(response);

        assert_eq!(contexts.descriptors.len(), 2);
        assert_eq!(contexts.descriptors[0].market_name(), Some("BTC"));
        assert_eq!(contexts.descriptors[0].max_leverage, Some(50));
        assert_eq!(contexts.states.len(), 2);

        let StateEntry::State(btc) = &contexts.states[0] else {
            panic!("expected a state object");
        };
        assert_eq!(btc.funding.as_ref().unwrap().to_decimal(), Some(dec!(0.0000125)));
        assert_eq!(btc.open_interest.as_ref().unwrap().to_decimal(), Some(dec!(1234567.89)));
    }

    #[test]
    fn test_malformed_entries_keep_their_slot() {
        let json = r#"[
            {"universe": [{"name": "BTC"}, 42, {"name": 7}, {"szDecimals": 2}]},
            [{"funding": "0.0001"}, "oops", {}, null]
        ]"#;

        let response: MetaAndAssetCtxsResponse = serde_json::from_str(json).unwrap();
        let contexts = AssetContexts::from(response);

        assert_eq!(contexts.descriptors.len(), 4);
        assert_eq!(contexts.descriptors[0].market_name(), Some("BTC"));
        assert_eq!(contexts.descriptors[1].market_name(), None);
        assert_eq!(contexts.descriptors[2].market_name(), None);
        assert_eq!(contexts.descriptors[3].market_name(), None);

        assert_eq!(contexts.states.len(), 4);
        assert!(matches!(contexts.states[1], StateEntry::Malformed(_)));
        assert_eq!(contexts.states[2], StateEntry::State(AssetState::default()));
        assert!(matches!(contexts.states[3], StateEntry::Malformed(Value::Null)));
    }

    #[test]
    fn test_wrong_typed_descriptor_fields_keep_the_market() {
        let json = r#"{"universe": [
            {"name": "BTC", "szDecimals": 5},
            {"name": "ETH", "maxLeverage": "50", "szDecimals": -1, "onlyIsolated": "yes", "isDelisted": 1}
        ]}"#;

        let meta: Meta = serde_json::from_str(json).unwrap();
        let descriptors: Vec<AssetDescriptor> =
            meta.universe.into_iter().map(AssetDescriptor::from).collect();

        assert_eq!(descriptors[0].sz_decimals, Some(5));
        assert_eq!(descriptors[1].market_name(), Some("ETH"));
        assert_eq!(descriptors[1].max_leverage, None);
        assert_eq!(descriptors[1].sz_decimals, None);
        assert!(!descriptors[1].only_isolated);
        assert!(!descriptors[1].is_delisted);
    }

    #[test]
    fn test_array_states_are_malformed() {
        let states: Vec<StateEntry> =
            serde_json::from_str(r#"[[], ["0.0001"], {"funding": "0.0001"}]"#).unwrap();

        assert_eq!(states[0], StateEntry::Malformed(serde_json::json!([])));
        assert_eq!(states[1], StateEntry::Malformed(serde_json::json!(["0.0001"])));
        let StateEntry::State(state) = &states[2] else {
            panic!("expected a state object");
        };
        assert_eq!(state.funding.as_ref().unwrap().to_decimal(), Some(dec!(0.0001)));

        let universe: Vec<UniverseEntry> =
            serde_json::from_str(r#"[["BTC"], {"name": "BTC"}]"#).unwrap();
        assert!(matches!(universe[0], UniverseEntry::Malformed(_)));
        assert!(matches!(universe[1], UniverseEntry::Asset(_)));
    }

    #[test]
    fn test_raw_numeric_parsing() {
        assert_eq!(RawNumeric::new("0.0001").to_decimal(), Some(dec!(0.0001)));
        assert_eq!(RawNumeric::new(0.5).to_decimal(), Some(dec!(0.5)));
        assert_eq!(RawNumeric::new(serde_json::json!(1e-7)).to_decimal(), Some(dec!(0.0000001)));
        assert_eq!(RawNumeric::new("abc").to_decimal(), None);
        assert_eq!(RawNumeric::new(true).to_decimal(), None);
    }

    #[test]
    fn test_info_request_serialization() {
        let json = serde_json::to_string(&InfoRequest::MetaAndAssetCtxs).unwrap();
        assert_eq!(json, r#"{"type":"metaAndAssetCtxs"}"#);

        let json = serde_json::to_string(&InfoRequest::Meta).unwrap();
        assert_eq!(json, r#"{"type":"meta"}"#);
    }
}
