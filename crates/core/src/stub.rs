//! Ledger stub abstraction
//!
//! This module defines the interface a contract consumes from its host
//! ledger. Contracts never touch storage directly: every read, staged write,
//! scan and history lookup flows through a [`LedgerStub`] handed to the
//! handler for the duration of one transaction.
//!
//! ## Transaction Semantics
//!
//! - Reads observe the committed snapshot fixed at transaction start
//! - Writes and deletes are staged into the transaction's write set and are
//!   NOT visible to later reads in the same transaction
//! - The write set commits atomically or not at all (host decision)
//!
//! ## Iterators
//!
//! Scans return boxed iterators. Releasing an iterator is tied to `Drop`, so
//! it happens on every exit path: normal completion, early return via `?`,
//! and unwinding.

use serde::{Deserialize, Serialize};

use crate::timestamp::TxTimestamp;

/// Result type for stub operations
pub type StubResult<T> = std::result::Result<T, StubError>;

/// Errors surfaced by the ledger stub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum StubError {
    /// Put/Delete/Get with an empty key
    #[error("key must not be an empty string")]
    EmptyKey,

    /// Composite key could not be built or split
    #[error("invalid composite key: {reason}")]
    InvalidCompositeKey {
        /// Which part was rejected and why
        reason: String,
    },

    /// Host storage failure
    #[error("ledger I/O error: {reason}")]
    Io {
        /// Host-reported cause
        reason: String,
    },

    /// Transaction timestamp could not be converted
    #[error("invalid transaction timestamp: {reason}")]
    Timestamp {
        /// Why the instant could not be used
        reason: String,
    },

    /// The stub was used outside its transaction
    #[error("ledger unavailable: {reason}")]
    Unavailable {
        /// What the host could not provide
        reason: String,
    },
}

/// One entry of a range or composite-prefix scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// Storage key
    pub key: String,
    /// Committed payload
    pub value: Vec<u8>,
}

/// One commit in a key's history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyModification {
    /// Transaction that produced this commit
    pub tx_id: String,
    /// Payload written; empty for deletions
    pub value: Vec<u8>,
    /// Timestamp of the committing transaction
    pub timestamp: TxTimestamp,
    /// Whether this commit deleted the key
    pub is_delete: bool,
}

/// Iterator over scan results
pub type StateIter<'a> = Box<dyn Iterator<Item = StubResult<KeyValue>> + 'a>;

/// Iterator over a key's commit history, oldest first
pub type HistoryIter<'a> = Box<dyn Iterator<Item = StubResult<KeyModification>> + 'a>;

/// Interface to the host ledger for a single transaction.
///
/// Implementations must be deterministic for a given snapshot and
/// transaction header: two peers executing the same handler against the
/// same stub state produce identical write sets.
pub trait LedgerStub {
    /// Read the committed value of `key` at the transaction's snapshot.
    ///
    /// Returns `None` if the key is absent.
    fn get(&self, key: &str) -> StubResult<Option<Vec<u8>>>;

    /// Stage a write into the transaction's write set.
    fn put(&mut self, key: &str, value: Vec<u8>) -> StubResult<()>;

    /// Stage a deletion (tombstone) into the transaction's write set.
    fn delete(&mut self, key: &str) -> StubResult<()>;

    /// Scan simple keys in `[start, end)`, in key order.
    ///
    /// An empty `start` means "from the first key", an empty `end` means
    /// "to the last key". Composite keys are never returned.
    fn range_scan(&self, start: &str, end: &str) -> StubResult<StateIter<'_>>;

    /// Scan composite keys of `object_type` whose leading attributes equal
    /// `attributes`, in key order.
    fn prefix_scan(&self, object_type: &str, attributes: &[&str]) -> StubResult<StateIter<'_>>;

    /// Commit log for `key`, oldest to newest, including deletions.
    fn history_for(&self, key: &str) -> StubResult<HistoryIter<'_>>;

    /// Timestamp assigned to this transaction by the ordering service.
    fn tx_timestamp(&self) -> StubResult<TxTimestamp>;

    /// Identifier assigned to this transaction by the host.
    fn tx_id(&self) -> &str;
}
