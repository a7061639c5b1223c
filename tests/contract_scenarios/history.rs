//! History projection across contracts

use agriledger::data_storage::CropRecord as StoredCrop;
use agriledger::defi::CropBalance;
use agriledger::supply_chain::Crop;
use agriledger::HistoryEntry;

use crate::common::*;

#[test]
fn write_then_delete_yields_tombstone() {
    let ledger = ledger();
    submit(&ledger, &DataStorageContract, "PlantCrop", &["X", "d"]);
    submit(&ledger, &DataStorageContract, "RemoveCrop", &["X"]);

    let history: Vec<HistoryEntry<StoredCrop>> =
        read(&ledger, &DataStorageContract, "GetCropHistory", &["X"]);
    assert_eq!(history.len(), 2);
    assert!(!history[0].is_delete);
    assert_eq!(history[0].record.data, "d");
    assert!(history[1].is_delete);
    assert_eq!(
        history[1].record,
        StoredCrop {
            id: "X".into(),
            data: String::new(),
            timestamp: String::new(),
        }
    );
}

#[test]
fn deleted_then_recreated_key_keeps_full_log() {
    let ledger = ledger();
    submit(&ledger, &MonitoringContract, "AddCropRecord", &["C", "Rice", "1"]);
    submit(&ledger, &MonitoringContract, "DeleteCropRecord", &["C"]);
    submit(&ledger, &MonitoringContract, "AddCropRecord", &["C", "Oat", "2"]);

    let history: Vec<HistoryEntry<agriledger::monitoring::CropRecord>> =
        read(&ledger, &MonitoringContract, "GetCropRecordHistory", &["C"]);
    let flags: Vec<bool> = history.iter().map(|h| h.is_delete).collect();
    assert_eq!(flags, vec![false, true, false]);
    assert_eq!(history[2].record.crop_type, "Oat");
}

#[test]
fn history_length_counts_writing_transactions() {
    let ledger = ledger();
    submit(&ledger, &DefiContract, "InitLedger", &[]);
    submit(&ledger, &DefiContract, "HarvestCrops", &["Farmer1", "5"]);
    submit(&ledger, &DefiContract, "DistributeCrops", &["Farmer2", "Farmer1", "5"]);
    let _ = ledger.invoke(&DefiContract, "DiscardSpoiledCrops", &["Farmer1", "99999"]);
    submit(&ledger, &DefiContract, "PlantCrops", &["Farmer2", "1"]);

    let f1: Vec<HistoryEntry<CropBalance>> = read(&ledger, &DefiContract, "GetCropHistory", &["Farmer1"]);
    let f2: Vec<HistoryEntry<CropBalance>> = read(&ledger, &DefiContract, "GetCropHistory", &["Farmer2"]);
    assert_eq!(f1.len(), 3);
    assert_eq!(f2.len(), 3);
    assert_eq!(ledger.history_len("Farmer1"), 3);

    let amounts: Vec<f64> = f1.iter().map(|h| h.record.crop_amount).collect();
    assert_eq!(amounts, vec![1000.0, 1005.0, 1010.0]);
}

#[test]
fn history_timestamps_are_commit_instants() {
    let ledger = ledger();
    submit(&ledger, &SupplyChainContract, "InitLedger", &[]);
    submit(&ledger, &SupplyChainContract, "TransferCrop", &["C002", "Silo"]);

    let trail: Vec<HistoryEntry<Crop>> = read(&ledger, &SupplyChainContract, "GetCropHistory", &["C002"]);
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[0].timestamp.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    assert_eq!(trail[1].timestamp.to_rfc3339(), "2024-01-01T00:00:02+00:00");
    assert_eq!(trail[1].tx_id, ledger.header_at(1).tx_id);
}

#[test]
fn history_of_unknown_key_is_empty() {
    let ledger = ledger();
    let history: Vec<HistoryEntry<Crop>> = read(&ledger, &SupplyChainContract, "GetCropHistory", &["none"]);
    assert!(history.is_empty());
}

#[test]
fn history_unavailable_without_history_database() {
    let ledger = ledger_without_history();
    submit(&ledger, &DataStorageContract, "InitFarm", &[]);
    let err = ledger
        .query(&DataStorageContract, "GetCropHistory", &["Crop1"])
        .unwrap_err();
    assert!(err.to_string().contains("history is disabled"));
}
