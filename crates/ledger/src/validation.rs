//! Commit-time validation
//!
//! Conflicts are detected on the READ set: a transaction is valid only if
//! every key it read still has the version it observed. Blind writes never
//! conflict.

use std::collections::BTreeMap;

use crate::error::LedgerError;
use crate::world::WorldState;

/// A key whose committed version moved after it was read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadConflict {
    /// The key
    pub key: String,
    /// Version recorded when read (0 = absent)
    pub read_version: u64,
    /// Version committed now (0 = absent)
    pub current_version: u64,
}

impl From<ReadConflict> for LedgerError {
    fn from(c: ReadConflict) -> Self {
        LedgerError::MvccConflict {
            key: c.key,
            read_version: c.read_version,
            current_version: c.current_version,
        }
    }
}

/// Every read-set entry whose version no longer matches, in key order.
pub fn validate_read_set(read_set: &BTreeMap<String, u64>, world: &WorldState) -> Vec<ReadConflict> {
    read_set
        .iter()
        .filter_map(|(key, &read_version)| {
            let current_version = world.key_version(key);
            (current_version != read_version).then(|| ReadConflict {
                key: key.clone(),
                read_version,
                current_version,
            })
        })
        .collect()
}
