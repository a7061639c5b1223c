//! Committed world state
//!
//! The world state is a key-ordered map of committed values plus a per-key
//! commit log. Both live behind `Arc`s so a snapshot is two pointer clones;
//! a commit copies on write when a snapshot is still alive.
//!
//! # Version Handling
//!
//! A single monotonic version counts committed writing transactions. Every
//! key written by a transaction carries that transaction's version; an absent
//! key reads as version 0.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use agri_core::composite::{is_composite_key, prefix_range_end};
use agri_core::KeyModification;

use crate::transaction::{TxHeader, WriteOp, WriteSet};

/// A committed value and the version that wrote it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    /// Payload
    pub value: Vec<u8>,
    /// Version of the writing transaction
    pub version: u64,
}

/// Live committed state of the ledger
#[derive(Debug, Clone, Default)]
pub struct WorldState {
    version: u64,
    keys: Arc<BTreeMap<String, Committed>>,
    history: Arc<BTreeMap<String, Vec<KeyModification>>>,
}

impl WorldState {
    /// Empty world state at version 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest committed version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Point-in-time view of the committed state
    pub fn snapshot(&self, history_enabled: bool) -> Snapshot {
        Snapshot {
            version: self.version,
            keys: Arc::clone(&self.keys),
            history: Arc::clone(&self.history),
            history_enabled,
        }
    }

    /// Current version of `key` (0 if absent)
    pub fn key_version(&self, key: &str) -> u64 {
        self.keys.get(key).map_or(0, |c| c.version)
    }

    /// Committed payload of `key`
    pub fn get(&self, key: &str) -> Option<&Committed> {
        self.keys.get(key)
    }

    /// All committed keys, in key order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.keys.keys()
    }

    /// Number of commits recorded for `key`
    pub fn history_len(&self, key: &str) -> usize {
        self.history.get(key).map_or(0, Vec::len)
    }

    /// Apply a validated write set under a fresh version.
    ///
    /// Returns the version assigned to every write in the set.
    pub fn apply(&mut self, header: &TxHeader, writes: &WriteSet, record_history: bool) -> u64 {
        self.version += 1;
        let version = self.version;

        let keys = Arc::make_mut(&mut self.keys);
        for (key, op) in writes.iter() {
            match op {
                WriteOp::Put(value) => {
                    keys.insert(
                        key.clone(),
                        Committed {
                            value: value.clone(),
                            version,
                        },
                    );
                }
                WriteOp::Delete => {
                    keys.remove(key);
                }
            }
        }

        if record_history {
            let history = Arc::make_mut(&mut self.history);
            for (key, op) in writes.iter() {
                let (value, is_delete) = match op {
                    WriteOp::Put(value) => (value.clone(), false),
                    WriteOp::Delete => (Vec::new(), true),
                };
                history.entry(key.clone()).or_default().push(KeyModification {
                    tx_id: header.tx_id.clone(),
                    value,
                    timestamp: header.timestamp,
                    is_delete,
                });
            }
        }

        version
    }
}

/// Immutable view of the world state at one version
#[derive(Debug, Clone)]
pub struct Snapshot {
    version: u64,
    keys: Arc<BTreeMap<String, Committed>>,
    history: Arc<BTreeMap<String, Vec<KeyModification>>>,
    history_enabled: bool,
}

impl Snapshot {
    /// Version this snapshot was taken at
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Committed value of `key` at this snapshot
    pub fn get(&self, key: &str) -> Option<&Committed> {
        self.keys.get(key)
    }

    /// Whether per-key history is kept
    pub fn history_enabled(&self) -> bool {
        self.history_enabled
    }

    /// Commit log of `key`, oldest first
    pub fn history(&self, key: &str) -> &[KeyModification] {
        self.history.get(key).map_or(&[], Vec::as_slice)
    }

    /// Simple keys in `[start, end)`; empty bounds are open.
    pub fn range<'a>(
        &'a self,
        start: &str,
        end: &str,
    ) -> Box<dyn Iterator<Item = (&'a String, &'a Committed)> + 'a> {
        if !start.is_empty() && !end.is_empty() && start >= end {
            return Box::new(std::iter::empty());
        }
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start.to_string())
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end.to_string())
        };
        Box::new(
            self.keys
                .range::<String, _>((lower, upper))
                .filter(|(key, _)| !is_composite_key(key)),
        )
    }

    /// Composite keys starting with `prefix`
    pub fn prefixed<'a>(
        &'a self,
        prefix: &str,
    ) -> Box<dyn Iterator<Item = (&'a String, &'a Committed)> + 'a> {
        let lower = Bound::Included(prefix.to_string());
        let upper = Bound::Excluded(prefix_range_end(prefix));
        Box::new(self.keys.range::<String, _>((lower, upper)))
    }
}
