//! Canonical walkthroughs

use agriledger::data_storage::CropRecord as StoredCrop;
use agriledger::defi::{CropBalance, PlantingInfo};
use agriledger::monitoring::CropRecord as YieldRecord;
use agriledger::supply_chain::Crop;
use agriledger::HistoryEntry;

use crate::common::*;

#[test]
fn data_storage_init_then_harvest() {
    let ledger = ledger();
    submit(&ledger, &DataStorageContract, "InitFarm", &[]);

    let crop: StoredCrop = read(&ledger, &DataStorageContract, "HarvestCrop", &["Crop1"]);
    assert_eq!(crop.id, "Crop1");
    assert_eq!(crop.data, "Initial Crop Data 1");
    assert_eq!(crop.timestamp, "2024-01-01T00:00:00.000000000Z");
}

#[test]
fn data_storage_plant_twice_fails() {
    let ledger = ledger();
    submit(&ledger, &DataStorageContract, "PlantCrop", &["X", "d"]);
    let message = reject(&ledger, &DataStorageContract, "PlantCrop", &["X", "d"]);
    assert_eq!(message, "the crop record X already exists");
}

#[test]
fn defi_distribute() {
    let ledger = ledger();
    submit(&ledger, &DefiContract, "InitLedger", &[]);
    submit(&ledger, &DefiContract, "DistributeCrops", &["Farmer1", "Farmer2", "400"]);

    let f1: CropBalance = read(&ledger, &DefiContract, "GetCropBalance", &["Farmer1"]);
    let f2: CropBalance = read(&ledger, &DefiContract, "GetCropBalance", &["Farmer2"]);
    assert_eq!(f1.crop_amount, 600.0);
    assert_eq!(f2.crop_amount, 900.0);
    assert_eq!(f1.timestamp, f2.timestamp);
}

#[test]
fn defi_plant() {
    let ledger = ledger();
    submit(&ledger, &DefiContract, "InitLedger", &[]);
    submit(&ledger, &DefiContract, "PlantCrops", &["Farmer1", "100"]);

    let f1: CropBalance = read(&ledger, &DefiContract, "GetCropBalance", &["Farmer1"]);
    assert_eq!(f1.crop_amount, 900.0);

    let plantings: Vec<PlantingInfo> = read(&ledger, &DefiContract, "GetPlantingInfo", &["Farmer1"]);
    assert_eq!(plantings.len(), 1);
    assert_eq!(plantings[0].farmer, "Farmer1");
    assert_eq!(plantings[0].planted_amount, 100.0);
    assert_eq!(plantings[0].yield_amount, 0.0);
    assert_eq!(plantings[0].timestamp, f1.timestamp);
}

#[test]
fn monitoring_add_update_history() {
    let ledger = ledger();
    submit(&ledger, &MonitoringContract, "AddCropRecord", &["C", "Rice", "42.0"]);
    submit(&ledger, &MonitoringContract, "UpdateCropRecord", &["C", "Rice", "50.0"]);

    let history: Vec<HistoryEntry<YieldRecord>> =
        read(&ledger, &MonitoringContract, "GetCropRecordHistory", &["C"]);
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|h| !h.is_delete));
    assert_eq!(history[0].record.yield_amount, 42.0);
    assert_eq!(history[1].record.yield_amount, 50.0);
    assert!(history[0].timestamp < history[1].timestamp);
    assert_ne!(history[0].tx_id, history[1].tx_id);
}

#[test]
fn supply_chain_register_transfer_read() {
    let ledger = ledger();
    submit(&ledger, &SupplyChainContract, "RegisterCrop", &["C1", "Rice", "F1", "O1", "L1"]);
    submit(&ledger, &SupplyChainContract, "TransferCrop", &["C1", "O2"]);

    let crop: Crop = read(&ledger, &SupplyChainContract, "ReadCrop", &["C1"]);
    assert_eq!(crop.current_owner, "O2");
    assert_eq!(crop.farmer, "F1");
}
