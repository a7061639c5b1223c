//! Error types for the reference ledger

use agri_core::{ContractError, StubError};
use thiserror::Error;

/// Result type alias for ledger operations
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Errors raised while executing or committing a transaction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// The handler failed; nothing was committed
    #[error("{0}")]
    Contract(#[from] ContractError),

    /// A key read by the transaction changed before it committed
    #[error("MVCC read conflict on key {key:?}: read version {read_version}, committed version {current_version}")]
    MvccConflict {
        /// Conflicting key
        key: String,
        /// Version observed at the transaction's snapshot (0 = absent)
        read_version: u64,
        /// Version committed in the meantime (0 = absent)
        current_version: u64,
    },

    /// Invalid configuration
    #[error("configuration error: {reason}")]
    Config {
        /// What is wrong
        reason: String,
    },

    /// The stub failed outside of a handler
    #[error(transparent)]
    Stub(#[from] StubError),
}

impl LedgerError {
    /// The contract error, if the handler failed
    pub fn contract_error(&self) -> Option<&ContractError> {
        match self {
            LedgerError::Contract(e) => Some(e),
            _ => None,
        }
    }
}
