//! Snapshot reads and read-set conflicts between contract transactions

use agriledger::defi::CropBalance;
use agriledger::ledger::LedgerError;
use agriledger::Contract;

use crate::common::*;

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn concurrent_debits_of_one_balance_conflict() {
    let ledger = ledger();
    submit(&ledger, &DefiContract, "InitLedger", &[]);

    // Both proposals read Farmer2 at the same snapshot.
    let mut t1 = ledger.begin();
    let mut t2 = ledger.begin();
    DefiContract
        .invoke(&mut t1, "DistributeCrops", &args(&["Farmer2", "Farmer1", "300"]))
        .unwrap();
    DefiContract
        .invoke(&mut t2, "DiscardSpoiledCrops", &args(&["Farmer2", "300"]))
        .unwrap();

    ledger.commit(t1).unwrap();
    let err = ledger.commit(t2).unwrap_err();
    assert!(matches!(err, LedgerError::MvccConflict { ref key, .. } if key == "Farmer2"));

    let f2: CropBalance = read(&ledger, &DefiContract, "GetCropBalance", &["Farmer2"]);
    assert_eq!(f2.crop_amount, 200.0);
}

#[test]
fn stale_reads_are_rejected_at_commit() {
    let ledger = ledger();
    submit(&ledger, &SupplyChainContract, "InitLedger", &[]);

    let mut reader = ledger.begin();
    SupplyChainContract
        .invoke(&mut reader, "TransferCrop", &args(&["C001", "Mill"]))
        .unwrap();
    submit(&ledger, &SupplyChainContract, "TransferCrop", &["C001", "Port"]);

    assert!(ledger.commit(reader).is_err());
    let crop: agriledger::supply_chain::Crop =
        read(&ledger, &SupplyChainContract, "ReadCrop", &["C001"]);
    assert_eq!(crop.current_owner, "Port");
}

#[test]
fn disjoint_keys_commit_in_any_order() {
    let ledger = ledger();
    submit(&ledger, &DataStorageContract, "InitFarm", &[]);

    let mut t1 = ledger.begin();
    let mut t2 = ledger.begin();
    DataStorageContract
        .invoke(&mut t1, "UpdateCrop", &args(&["Crop1", "a"]))
        .unwrap();
    DataStorageContract
        .invoke(&mut t2, "UpdateCrop", &args(&["Crop2", "b"]))
        .unwrap();
    ledger.commit(t2).unwrap();
    ledger.commit(t1).unwrap();
    assert_eq!(ledger.height(), 3);
}

#[test]
fn writes_are_invisible_inside_the_transaction() {
    let ledger = ledger();
    let mut tx = ledger.begin();
    DataStorageContract
        .invoke(&mut tx, "PlantCrop", &args(&["X", "d"]))
        .unwrap();
    let exists = DataStorageContract
        .invoke(&mut tx, "CropExists", &args(&["X"]))
        .unwrap();
    assert_eq!(exists.as_bool(), Some(false));
    ledger.commit(tx).unwrap();
    assert_eq!(
        ledger.query(&DataStorageContract, "CropExists", &["X"]).unwrap().as_bool(),
        Some(true)
    );
}

#[test]
fn ledger_is_shareable_across_threads() {
    let ledger = ledger();
    submit(&ledger, &DefiContract, "InitLedger", &[]);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let ledger = ledger.clone();
            std::thread::spawn(move || {
                let farmer = format!("Worker{}", i);
                ledger
                    .invoke(&DefiContract, "HarvestCrops", &[farmer.as_str(), "10"])
                    .is_ok()
            })
        })
        .collect();
    let committed = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(committed, 4);
    let balances: Vec<CropBalance> = read(&ledger, &DefiContract, "GetAllCropBalances", &[]);
    assert_eq!(balances.len(), 6);
    assert_eq!(ledger.metrics().total_committed, 5);
}
