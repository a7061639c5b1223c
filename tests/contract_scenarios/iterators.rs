//! Every handler releases its iterators, on success and on failure.

use agriledger::ledger::{Fault, MemoryLedger};
use agriledger::{Contract, LedgerStub};

use crate::common::*;

fn seeded<C: Contract + ?Sized>(contract: &C, init: &str) -> MemoryLedger {
    let ledger = ledger();
    submit(&ledger, contract, init, &[]);
    ledger
}

fn farm() -> MemoryLedger {
    seeded(&DataStorageContract, "InitFarm")
}

fn bank() -> MemoryLedger {
    let ledger = seeded(&DefiContract, "InitLedger");
    submit(&ledger, &DefiContract, "PlantCrops", &["Farmer1", "1"]);
    ledger
}

fn field() -> MemoryLedger {
    seeded(&MonitoringContract, "InitLedger")
}

fn chain() -> MemoryLedger {
    seeded(&SupplyChainContract, "InitLedger")
}

fn run_counting<C: Contract + ?Sized>(
    ledger: &MemoryLedger,
    contract: &C,
    function: &str,
    args: &[&str],
    fault: Option<Fault>,
) -> bool {
    let mut tx = ledger.begin();
    if let Some(fault) = fault {
        tx.inject(fault);
    }
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    let ok = contract.invoke(&mut tx, function, &args).is_ok();
    assert_eq!(tx.open_iterators(), 0, "{} leaked an iterator", function);
    assert_eq!(tx.tx_id(), tx.header().tx_id);
    ok
}

#[test]
fn scans_release_on_success() {
    assert!(run_counting(&farm(), &DataStorageContract, "GetAllCrops", &[], None));
    assert!(run_counting(&farm(), &DataStorageContract, "GetCropHistory", &["Crop1"], None));
    assert!(run_counting(&bank(), &DefiContract, "GetAllCropBalances", &[], None));
    assert!(run_counting(&bank(), &DefiContract, "GetPlantingInfo", &["Farmer1"], None));
    assert!(run_counting(&field(), &MonitoringContract, "GetAllCropRecords", &[], None));
    assert!(run_counting(&chain(), &SupplyChainContract, "GetCropHistory", &["C001"], None));
}

#[test]
fn scans_release_on_mid_scan_failure() {
    let fault = || Some(Fault::Scan { after: 1 });
    assert!(!run_counting(&farm(), &DataStorageContract, "GetAllCrops", &[], fault()));
    assert!(!run_counting(&field(), &MonitoringContract, "GetAllCropRecords", &[], fault()));
    assert!(!run_counting(&chain(), &SupplyChainContract, "GetAllCrops", &[], fault()));
}

#[test]
fn composite_scan_releases_on_failure() {
    let ledger = bank();
    assert!(!run_counting(
        &ledger,
        &DefiContract,
        "GetPlantingInfo",
        &["Farmer1"],
        Some(Fault::Scan { after: 0 })
    ));
}

#[test]
fn history_releases_on_decode_failure() {
    let ledger = farm();
    // Crop1's latest commit does not decode as a crop record.
    ledger
        .transaction(|tx| {
            tx.put("Crop1", br#"{"farmer":"x"}"#.to_vec())?;
            Ok(())
        })
        .unwrap();
    assert_eq!(ledger.history_len("Crop1"), 2);
    assert!(!run_counting(&ledger, &DataStorageContract, "GetCropHistory", &["Crop1"], None));
    assert!(!run_counting(&ledger, &DataStorageContract, "GetAllCrops", &[], None));
}

#[test]
fn point_operations_never_open_iterators() {
    let ledger = farm();
    assert!(run_counting(&ledger, &DataStorageContract, "PlantCrop", &["Crop9", "x"], None));
    assert!(!run_counting(&ledger, &DataStorageContract, "PlantCrop", &["Crop1", "x"], None));
    assert!(!run_counting(
        &bank(),
        &DefiContract,
        "HarvestCrops",
        &["Farmer1", "1"],
        Some(Fault::Write { key: "Farmer1".into() })
    ));
}
