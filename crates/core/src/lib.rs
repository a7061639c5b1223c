//! Core types and traits for AgriLedger contracts
//!
//! This crate defines the pieces every contract shares:
//! - LedgerStub: the interface consumed from the host ledger
//! - TxTimestamp: the deterministic transaction instant
//! - Composite keys: object-type + attribute keys for prefix scans
//! - Record / codec: typed records <-> canonical JSON payloads
//! - State helpers: typed read / write / scan over the stub
//! - History projection: commit log -> typed history entries
//! - Contract / Output: the named-transaction surface
//! - ContractError: the error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod codec;
pub mod composite;
pub mod contract;
pub mod error;
pub mod history;
pub mod state;
pub mod stub;
pub mod timestamp;

pub use codec::Record;
pub use composite::{create_composite_key, split_composite_key};
pub use contract::{Contract, Output};
pub use error::{ContractError, Result};
pub use history::{project_history, HistoryEntry};
pub use stub::{
    HistoryIter, KeyModification, KeyValue, LedgerStub, StateIter, StubError, StubResult,
};
pub use timestamp::TxTimestamp;
