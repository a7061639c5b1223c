//! World-state helpers shared by every contract
//!
//! Each contract is a thin facade over these functions: they pair a stub
//! operation with the record codec so handlers read and write typed records
//! instead of bytes.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{self, Record};
use crate::composite::create_composite_key;
use crate::error::Result;
use crate::stub::{LedgerStub, StateIter};

/// Read and decode the record stored under `key`.
///
/// Returns `None` if the key is absent.
pub fn read<R: DeserializeOwned>(stub: &dyn LedgerStub, key: &str) -> Result<Option<R>> {
    match stub.get(key)? {
        Some(bytes) => Ok(Some(codec::decode(key, &bytes)?)),
        None => Ok(None),
    }
}

/// Whether a value is committed under `key`
pub fn exists(stub: &dyn LedgerStub, key: &str) -> Result<bool> {
    Ok(stub.get(key)?.is_some())
}

/// Stage `record` under its own primary key
pub fn write<R: Record>(stub: &mut dyn LedgerStub, record: &R) -> Result<()> {
    write_at(stub, record.key(), record)
}

/// Stage `value` under an explicit key (used for composite keys)
pub fn write_at<T: Serialize>(stub: &mut dyn LedgerStub, key: &str, value: &T) -> Result<()> {
    let bytes = codec::encode(key, value)?;
    stub.put(key, bytes)?;
    Ok(())
}

/// Stage a tombstone for `key`
pub fn remove(stub: &mut dyn LedgerStub, key: &str) -> Result<()> {
    stub.delete(key)?;
    Ok(())
}

/// Decode every simple-key record in `[start, end)`, in key order.
pub fn scan_range<R: DeserializeOwned>(
    stub: &dyn LedgerStub,
    start: &str,
    end: &str,
) -> Result<Vec<R>> {
    let iter = stub.range_scan(start, end)?;
    collect(iter)
}

/// Decode every simple-key record, in key order. Empty ledger yields `[]`.
pub fn scan_all<R: DeserializeOwned>(stub: &dyn LedgerStub) -> Result<Vec<R>> {
    scan_range(stub, "", "")
}

/// Decode every composite-key record under `object_type` + `attributes`
pub fn scan_composite<R: DeserializeOwned>(
    stub: &dyn LedgerStub,
    object_type: &str,
    attributes: &[&str],
) -> Result<Vec<R>> {
    let iter = stub.prefix_scan(object_type, attributes)?;
    collect(iter)
}

/// Composite key for `object_type` + `attributes`
pub fn composite_key(object_type: &str, attributes: &[&str]) -> Result<String> {
    Ok(create_composite_key(object_type, attributes)?)
}

/// The transaction timestamp rendered for a record's `timestamp` field
pub fn tx_stamp(stub: &dyn LedgerStub) -> Result<String> {
    Ok(stub.tx_timestamp()?.to_rfc3339()?)
}

// The iterator is dropped (released) on every return, including `?`.
fn collect<R: DeserializeOwned>(iter: StateIter<'_>) -> Result<Vec<R>> {
    let mut records = Vec::new();
    for entry in iter {
        let kv = entry?;
        records.push(codec::decode(&kv.key, &kv.value)?);
    }
    Ok(records)
}
