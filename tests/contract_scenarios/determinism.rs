//! Endorsement determinism: the same proposal against the same snapshot
//! stages byte-identical write sets.

use agriledger::ledger::{MemoryLedger, TxHeader, WriteOp};
use agriledger::Contract;

use crate::common::*;

fn endorse_twice<C: Contract + ?Sized>(ledger: &MemoryLedger, contract: &C, function: &str, args: &[&str]) {
    let header: TxHeader = ledger.header_at(42);
    let (out_a, writes_a) = ledger.simulate(header.clone(), contract, function, args).unwrap();
    let (out_b, writes_b) = ledger.simulate(header, contract, function, args).unwrap();
    assert_eq!(out_a, out_b, "{}", function);
    assert_eq!(writes_a, writes_b, "{}", function);
    assert_eq!(writes_a.digest(), writes_b.digest(), "{}", function);
}

#[test]
fn every_mutation_is_deterministic() {
    let ledger = ledger();
    submit(&ledger, &DataStorageContract, "InitFarm", &[]);
    submit(&ledger, &DefiContract, "InitLedger", &[]);
    submit(&ledger, &MonitoringContract, "InitLedger", &[]);
    submit(&ledger, &SupplyChainContract, "InitLedger", &[]);

    endorse_twice(&ledger, &DataStorageContract, "InitFarm", &[]);
    endorse_twice(&ledger, &DataStorageContract, "PlantCrop", &["Crop3", "data"]);
    endorse_twice(&ledger, &DataStorageContract, "UpdateCrop", &["Crop1", "data"]);
    endorse_twice(&ledger, &DataStorageContract, "RemoveCrop", &["Crop2"]);
    endorse_twice(&ledger, &DefiContract, "HarvestCrops", &["Farmer3", "7"]);
    endorse_twice(&ledger, &DefiContract, "DistributeCrops", &["Farmer1", "Farmer2", "1"]);
    endorse_twice(&ledger, &DefiContract, "DiscardSpoiledCrops", &["Farmer1", "1"]);
    endorse_twice(&ledger, &DefiContract, "PlantCrops", &["Farmer1", "1"]);
    endorse_twice(&ledger, &DefiContract, "HarvestPlantedCrops", &["Farmer1", "1"]);
    endorse_twice(&ledger, &MonitoringContract, "AddCropRecord", &["Crop3", "Oat", "1"]);
    endorse_twice(&ledger, &MonitoringContract, "UpdateCropRecord", &["Crop1", "Oat", "1"]);
    endorse_twice(&ledger, &MonitoringContract, "DeleteCropRecord", &["Crop1"]);
    endorse_twice(&ledger, &SupplyChainContract, "RegisterCrop", &["C9", "Rye", "F", "O", "L"]);
    endorse_twice(&ledger, &SupplyChainContract, "TransferCrop", &["C001", "Mill"]);
}

#[test]
fn independent_ledgers_agree() {
    let a = ledger();
    let b = MemoryLedger::new();
    for l in [&a, &b] {
        submit(l, &DefiContract, "InitLedger", &[]);
        submit(l, &DefiContract, "PlantCrops", &["Farmer2", "50"]);
    }
    let header = a.header_at(2);
    assert_eq!(header, b.header_at(2));
    let (_, wa) = a.simulate(header.clone(), &DefiContract, "PlantCrops", &["Farmer1", "5"]).unwrap();
    let (_, wb) = b.simulate(header, &DefiContract, "PlantCrops", &["Farmer1", "5"]).unwrap();
    assert_eq!(wa.digest(), wb.digest());
    for key in a.committed_keys() {
        assert_eq!(a.get_committed(&key), b.get_committed(&key));
    }
}

#[test]
fn record_timestamp_comes_from_header() {
    let ledger = ledger();
    let header = ledger.header_at(7);
    let (_, writes) = ledger
        .simulate(header, &DataStorageContract, "PlantCrop", &["X", "d"])
        .unwrap();
    match writes.get("X") {
        Some(WriteOp::Put(bytes)) => {
            let text = String::from_utf8(bytes.clone()).unwrap();
            assert_eq!(
                text,
                r#"{"id":"X","data":"d","timestamp":"2024-01-01T00:00:14.000000000Z"}"#
            );
        }
        other => panic!("expected a put, got {:?}", other),
    }
}

#[test]
fn planting_key_uses_composite_layout() {
    let ledger = ledger();
    submit(&ledger, &DefiContract, "InitLedger", &[]);
    let (_, writes) = ledger
        .simulate(ledger.header_at(1), &DefiContract, "PlantCrops", &["Farmer1", "10"])
        .unwrap();
    let keys: Vec<&String> = writes.iter().map(|(k, _)| k).collect();
    assert_eq!(keys.len(), 2);
    assert_eq!(
        keys[0],
        "\u{0}Planting\u{0}Farmer1\u{0}2024-01-01T00:00:02.000000000Z\u{0}"
    );
    assert_eq!(keys[1], "Farmer1");
}
