//! Reference ledger host for AgriLedger contracts
//!
//! An in-memory, single-channel stand-in for a permissioned ledger peer:
//! - MemoryLedger: orders, executes, validates and commits transactions
//! - TxContext: the `LedgerStub` a handler runs against
//! - WorldState / Snapshot: versioned committed state with per-key history
//! - LedgerConfig: `agriledger.toml` settings
//!
//! Used by the contract crates' tests and by embedders that want to run
//! contracts without a network.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod ledger;
pub mod transaction;
pub mod validation;
pub mod world;

pub use config::{LedgerConfig, CONFIG_FILE_NAME};
pub use error::{LedgerError, LedgerResult};
pub use ledger::{CommitReceipt, LedgerMetrics, MemoryLedger};
pub use transaction::{Fault, TxContext, TxHeader, WriteOp, WriteSet};
pub use validation::{validate_read_set, ReadConflict};
pub use world::{Committed, Snapshot, WorldState};
