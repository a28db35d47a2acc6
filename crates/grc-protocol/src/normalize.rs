//! Best-effort extraction from remote responses.
//!
//! The call-data API has returned several shapes over time: a bare
//! `{to, data}`, the same object wrapped under `result`, `data`, `calldata`,
//! `tx`, or `transaction`, and ad hoc objects that name the fields
//! differently. Extraction tries the known shapes first and falls back to a
//! breadth-first search for any recognized field name.

use std::collections::VecDeque;

use grc_types::CallData;
use serde_json::Value;

const WRAPPER_KEYS: [&str; 5] = ["result", "data", "calldata", "tx", "transaction"];
const TO_KEYS: [&str; 3] = ["to", "address", "contractAddress"];
const DATA_KEYS: [&str; 3] = ["data", "calldata", "txData"];
const CID_KEYS: [&str; 4] = ["cid", "contentId", "hash", "ipfsHash"];

/// Search depth for the heuristic pass.
const MAX_DEPTH: usize = 4;

/// Normalize a call-data response to `{to, data}`.
pub fn normalize_call_data(value: &Value) -> Option<CallData> {
    if let Some(call_data) = exact_shape(value) {
        return Some(call_data);
    }
    for key in WRAPPER_KEYS {
        if let Some(call_data) = value.get(key).and_then(exact_shape) {
            return Some(call_data);
        }
    }
    heuristic(value)
}

fn exact_shape(value: &Value) -> Option<CallData> {
    let to = non_empty_str(value.get("to")?)?;
    let data = non_empty_str(value.get("data")?)?;
    Some(CallData::new(to, data))
}

fn heuristic(value: &Value) -> Option<CallData> {
    let mut to = None;
    let mut data = None;
    let mut queue = VecDeque::from([(value, 0usize)]);

    while let Some((node, depth)) = queue.pop_front() {
        match node {
            Value::Object(map) => {
                // Prefer a single object that carries both fields.
                let local_to = first_string(map, &TO_KEYS);
                let local_data = first_string(map, &DATA_KEYS);
                if let (Some(t), Some(d)) = (local_to, local_data) {
                    return Some(CallData::new(t, d));
                }
                to = to.or(local_to);
                data = data.or(local_data);
                if depth < MAX_DEPTH {
                    queue.extend(map.values().map(|v| (v, depth + 1)));
                }
            }
            Value::Array(items) if depth < MAX_DEPTH => {
                queue.extend(items.iter().map(|v| (v, depth + 1)));
            }
            _ => {}
        }
    }

    Some(CallData::new(to?, data?))
}

fn first_string<'a>(map: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| map.get(*k).and_then(non_empty_str))
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

/// Pull a content id out of a publish response.
pub fn extract_content_id(value: &Value) -> Option<String> {
    if let Some(s) = non_empty_str(value) {
        return Some(s.to_string());
    }
    let direct = |v: &Value| {
        v.as_object()
            .and_then(|map| first_string(map, &CID_KEYS))
            .map(str::to_string)
    };
    direct(value).or_else(|| {
        WRAPPER_KEYS
            .iter()
            .find_map(|key| value.get(*key).and_then(direct))
    })
}

/// `0x` followed by 32 bytes of hex.
pub fn is_tx_hash(s: &str) -> bool {
    s.strip_prefix("0x")
        .and_then(|rest| hex::decode(rest).ok())
        .is_some_and(|bytes| bytes.len() == 32)
}
