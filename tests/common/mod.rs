//! Shared test utilities for the integration suites.
//!
//! Import from a suite's `main.rs` with
//! `#[path = "../common/mod.rs"] mod common;`.

#![allow(dead_code)]

use std::sync::Once;

use agriledger::ledger::{LedgerConfig, MemoryLedger};
use agriledger::{Contract, Output};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use agriledger::data_storage::DataStorageContract;
pub use agriledger::defi::DefiContract;
pub use agriledger::monitoring::MonitoringContract;
pub use agriledger::supply_chain::SupplyChainContract;

static INIT_TRACING: Once = Once::new();

/// Install a `fmt` subscriber once per test binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

/// Fresh ledger with the default configuration
pub fn ledger() -> MemoryLedger {
    init_tracing();
    MemoryLedger::new()
}

/// Fresh ledger with history disabled
pub fn ledger_without_history() -> MemoryLedger {
    init_tracing();
    MemoryLedger::with_config(LedgerConfig {
        history_enabled: false,
        ..LedgerConfig::default()
    })
    .unwrap()
}

/// Invoke and commit, panicking on failure
pub fn submit<C: Contract + ?Sized>(ledger: &MemoryLedger, contract: &C, function: &str, args: &[&str]) -> Output {
    ledger
        .invoke(contract, function, args)
        .unwrap_or_else(|e| panic!("{}({:?}) failed: {}", function, args, e))
}

/// Evaluate and decode a JSON payload
pub fn read<C, T>(ledger: &MemoryLedger, contract: &C, function: &str, args: &[&str]) -> T
where
    C: Contract + ?Sized,
    T: serde::de::DeserializeOwned,
{
    ledger
        .query(contract, function, args)
        .unwrap_or_else(|e| panic!("{}({:?}) failed: {}", function, args, e))
        .decode()
        .unwrap()
}

/// Error message of a failed invocation; asserts nothing was committed
pub fn reject<C: Contract + ?Sized>(ledger: &MemoryLedger, contract: &C, function: &str, args: &[&str]) -> String {
    let height = ledger.height();
    let err = ledger
        .invoke(contract, function, args)
        .expect_err("invocation should fail");
    assert_eq!(ledger.height(), height, "failed {} must not commit", function);
    err.to_string()
}
