//! Contract scenario suite
//!
//! Drives all four contracts end-to-end through the reference ledger.
//!
//! ## Modules
//!
//! - **scenarios**: the canonical walkthroughs, one per contract behaviour
//! - **boundaries**: exact-balance, empty-ledger and idempotence edges
//! - **history**: commit-log projection across contracts
//! - **determinism**: identical proposals stage identical write sets
//! - **iterators**: every handler releases its iterators
//! - **isolation**: snapshot reads and read-set conflicts
//! - **invariants**: property tests over random transaction sequences
//! - **config**: ledger configuration from `agriledger.toml`
//!
//! ```bash
//! cargo test --test contract_scenarios
//! ```

#[path = "../common/mod.rs"]
mod common;

mod determinism;
mod history;
mod invariants;
mod isolation;
mod iterators;
mod scenarios;
