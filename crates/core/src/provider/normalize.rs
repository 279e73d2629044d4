//! Field-level normalization shared by the provider adapters.
//!
//! Upstream APIs disagree on how they encode the same metric (int64 as JSON
//! strings, competition as an index or a label, bids as a single CPC), so each
//! adapter deserializes permissively and maps through these helpers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::keyword::{to_micros, Competition};

/// Bid range derived from a single suggested CPC: 80% to 120% of it.
pub(crate) fn bids_from_cpc(cpc: f64) -> (u64, u64) {
    if !cpc.is_finite() {
        return (0, 0);
    }
    (to_micros(cpc * 0.8), to_micros(cpc * 1.2))
}

/// Competition from a numeric index (0..1) or a textual bucket.
pub(crate) fn competition_from_value(value: Option<&Value>) -> Competition {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Competition::from_index)
            .unwrap_or_default(),
        Some(Value::String(s)) => Competition::from_label(s),
        _ => Competition::Unknown,
    }
}

pub(crate) fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.round() as u64)
            })
        }
        _ => None,
    }
}

pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

/// Deserialize an optional unsigned integer sent as a number or a string.
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_u64))
}

/// Deserialize an optional float sent as a number or a string.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

/// Deserialize a string that configuration sources may have typed as a number
/// (customer ids, numeric passwords). Null becomes empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

pub(crate) fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = lenient_string(deserializer)?;
    Ok(if s.is_empty() { None } else { Some(s) })
}

/// Keep the first occurrence of each string.
pub(crate) fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
