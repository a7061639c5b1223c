//! History projection
//!
//! Folds a key's commit log into typed entries. One entry per commit,
//! oldest first, deletions included:
//!
//! ```text
//! commit(value = {...})        -> HistoryEntry { record: decoded,     is_delete: false }
//! commit(value = <empty>, del) -> HistoryEntry { record: placeholder, is_delete: true  }
//! ```
//!
//! The projector never skips or reorders commits and never fails on an empty
//! payload. A non-empty payload that fails to decode fails the whole call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::{self, Record};
use crate::error::Result;
use crate::stub::LedgerStub;

/// One commit of a record, as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry<R> {
    /// Record as written; a key-only placeholder for deletions
    pub record: R,
    /// Transaction that produced the commit
    pub tx_id: String,
    /// Commit instant (the committing transaction's timestamp)
    pub timestamp: DateTime<Utc>,
    /// Whether the commit deleted the key
    pub is_delete: bool,
}

/// Project the commit log of `key` into typed history entries.
pub fn project_history<R: Record>(stub: &dyn LedgerStub, key: &str) -> Result<Vec<HistoryEntry<R>>> {
    let iter = stub.history_for(key)?;

    let mut entries = Vec::new();
    for modification in iter {
        let modification = modification?;
        let record = if modification.value.is_empty() {
            R::placeholder(key)
        } else {
            codec::decode(key, &modification.value)?
        };
        entries.push(HistoryEntry {
            record,
            tx_id: modification.tx_id,
            timestamp: modification.timestamp.to_datetime()?,
            is_delete: modification.is_delete,
        });
    }

    debug!(target: "agri::history", key, entries = entries.len(), "History projected");
    Ok(entries)
}
