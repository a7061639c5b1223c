//! Record codec
//!
//! Typed records are stored as UTF-8 JSON. Field names and order come from
//! each record's struct declaration (with `serde` renames), so encoding is
//! canonical: the same record always produces the same bytes, on every peer.
//!
//! Keys are not namespaced across contracts. Decoding a payload written under
//! another contract's schema is not supported.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ContractError, Result};

/// A value record stored under its own primary key.
pub trait Record: Serialize + DeserializeOwned {
    /// Wire name of the primary-key field (`id`, `farmer`, `cropID`)
    const KEY_FIELD: &'static str;

    /// The record's primary key
    fn key(&self) -> &str;

    /// A record with only the primary key set and every other field at its
    /// default. Stands in for the payload of a deletion in history.
    fn placeholder(key: &str) -> Self;
}

/// Encode a value to its JSON payload.
///
/// `key` is only used to label the error. Non-finite reals cannot be
/// represented and fail here rather than being written as `null`.
pub fn encode<T: Serialize>(key: &str, value: &T) -> Result<Vec<u8>> {
    let json = serde_json::to_value(value).map_err(|e| ContractError::codec(key, e))?;
    if contains_null(&json) {
        return Err(ContractError::codec(key, "value is not representable (non-finite number?)"));
    }
    // Serialize the typed value, not `json`: the tree form sorts object keys.
    serde_json::to_vec(value).map_err(|e| ContractError::codec(key, e))
}

/// Decode a JSON payload stored under `key`.
pub fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| ContractError::codec(key, e))
}

fn contains_null(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Array(items) => items.iter().any(contains_null),
        serde_json::Value::Object(map) => map.values().any(contains_null),
        _ => false,
    }
}
