//! Error types for contract execution
//!
//! All handler failures are represented by [`ContractError`]. Errors are:
//! - **Structured**: each variant has typed fields for error details
//! - **Serializable**: they can cross the host boundary as JSON
//! - **Single-message**: `Display` renders the one human-readable line the
//!   host hands back to the client
//!
//! | Category | Variants | Description |
//! |----------|----------|-------------|
//! | Presence | `NotFound`, `AlreadyExists` | Key absent/present when the other was required |
//! | Balance | `InsufficientBalance` | Amount exceeds the farmer's balance |
//! | Data | `Codec` | Stored payload failed to decode |
//! | Host | `Stub` | Any error raised by the ledger stub |
//! | Dispatch | `InvalidArgument` | Unknown function, wrong arity, bad number |

use serde::{Deserialize, Serialize};

use crate::stub::StubError;

/// Result type alias for contract operations
pub type Result<T> = std::result::Result<T, ContractError>;

/// Contract execution errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum ContractError {
    /// Key absent when presence was required
    #[error("{what} does not exist")]
    NotFound {
        /// Description of the missing entity, e.g. `the crop record Crop1`
        what: String,
    },

    /// Key present when absence was required
    #[error("{what} already exists")]
    AlreadyExists {
        /// Description of the existing entity
        what: String,
    },

    /// Requested amount exceeds the current balance
    #[error("{farmer} doesn't have enough crops{}", purpose_suffix(.purpose))]
    InsufficientBalance {
        /// Farmer whose balance was short
        farmer: String,
        /// What the crops were needed for (`discard`, `plant`); empty for transfers
        purpose: String,
        /// Amount the handler tried to take
        requested: f64,
        /// Balance at the transaction's snapshot
        available: f64,
    },

    /// Payload failed to encode or decode
    #[error("codec error for key {key:?}: {reason}")]
    Codec {
        /// Key the payload is stored under
        key: String,
        /// Underlying serde error
        reason: String,
    },

    /// Error surfaced by the ledger stub
    #[error("ledger stub error: {0}")]
    Stub(#[from] StubError),

    /// Bad transaction name or arguments
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the call
        reason: String,
    },
}

fn purpose_suffix(purpose: &str) -> String {
    if purpose.is_empty() {
        String::new()
    } else {
        format!(" to {}", purpose)
    }
}

impl ContractError {
    /// Create a NotFound error for a described entity
    pub fn not_found(what: impl Into<String>) -> Self {
        ContractError::NotFound { what: what.into() }
    }

    /// Create an AlreadyExists error for a described entity
    pub fn already_exists(what: impl Into<String>) -> Self {
        ContractError::AlreadyExists { what: what.into() }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        ContractError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a codec error for `key`
    pub fn codec(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        ContractError::Codec {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContractError::NotFound { .. })
    }
}
