//! AgriLedger - deterministic agricultural smart contracts
//!
//! Four independent contracts over a versioned key-value ledger, each a
//! stateless value driven through the [`LedgerStub`] interface:
//!
//! | Contract | Entity | Crate |
//! |----------|--------|-------|
//! | `data-storage` | opaque crop data blobs | [`data_storage`] |
//! | `defi` | farmer crop balances + plantings | [`defi`] |
//! | `monitoring` | crop yield measurements | [`monitoring`] |
//! | `supply-chain` | crop custody and provenance | [`supply_chain`] |
//!
//! # Quick Start
//!
//! ```
//! use agriledger::{defi::CropBalance, ledger::MemoryLedger, Output};
//!
//! let ledger = MemoryLedger::new();
//! let defi = agriledger::contract("defi").unwrap();
//!
//! ledger.invoke(defi, "InitLedger", &[]).unwrap();
//! ledger.invoke(defi, "DistributeCrops", &["Farmer1", "Farmer2", "400"]).unwrap();
//!
//! let balance: CropBalance = ledger
//!     .query(defi, "GetCropBalance", &["Farmer1"])
//!     .unwrap()
//!     .decode()
//!     .unwrap();
//! assert_eq!(balance.crop_amount, 600.0);
//! # let _ = Output::Unit;
//! ```
//!
//! # Architecture
//!
//! Contracts only see the [`LedgerStub`] trait. The in-memory
//! [`ledger::MemoryLedger`] implements it for tests and embedding; a
//! production host provides its own implementation.

pub use agri_core::*;

/// In-memory reference ledger
pub use agri_ledger as ledger;

/// Raw crop record contract
pub use agri_data_storage as data_storage;
/// Farmer crop balance contract
pub use agri_defi as defi;
/// Yield monitoring contract
pub use agri_monitoring as monitoring;
/// Crop custody contract
pub use agri_supply_chain as supply_chain;

use agri_data_storage::DataStorageContract;
use agri_defi::DefiContract;
use agri_monitoring::MonitoringContract;
use agri_supply_chain::SupplyChainContract;

static DATA_STORAGE: DataStorageContract = DataStorageContract;
static DEFI: DefiContract = DefiContract;
static MONITORING: MonitoringContract = MonitoringContract;
static SUPPLY_CHAIN: SupplyChainContract = SupplyChainContract;

/// Every deployable contract, in name order
pub fn contracts() -> [&'static dyn Contract; 4] {
    [&DATA_STORAGE, &DEFI, &MONITORING, &SUPPLY_CHAIN]
}

/// Look up a contract by its deployed name
pub fn contract(name: &str) -> Option<&'static dyn Contract> {
    contracts().into_iter().find(|c| c.name() == name)
}
