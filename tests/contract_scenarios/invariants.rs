//! Property tests over random transaction sequences
//!
//! A simple model tracks which ids exist and how many committed writes each
//! received; the ledger must agree with it after every sequence.

use std::collections::BTreeMap;

use agriledger::ledger::MemoryLedger;
use agriledger::{data_storage, monitoring, Record};
use proptest::prelude::*;

use crate::common::*;

#[derive(Debug, Clone)]
enum Op {
    Create(usize, u8),
    Update(usize, u8),
    Delete(usize),
}

const IDS: [&str; 4] = ["Crop1", "Crop2", "Crop3", "Crop4"];

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..IDS.len(), any::<u8>()).prop_map(|(i, v)| Op::Create(i, v)),
        (0..IDS.len(), any::<u8>()).prop_map(|(i, v)| Op::Update(i, v)),
        (0..IDS.len()).prop_map(Op::Delete),
    ]
}

#[derive(Default)]
struct Model {
    present: BTreeMap<&'static str, bool>,
    writes: BTreeMap<&'static str, usize>,
}

impl Model {
    /// Whether `op` should commit, updating the model if so
    fn apply(&mut self, op: &Op) -> bool {
        let (id, must_exist) = match op {
            Op::Create(i, _) => (IDS[*i], false),
            Op::Update(i, _) => (IDS[*i], true),
            Op::Delete(i) => (IDS[*i], true),
        };
        let exists = self.present.get(id).copied().unwrap_or(false);
        if exists != must_exist {
            return false;
        }
        self.present.insert(id, !matches!(op, Op::Delete(_)));
        *self.writes.entry(id).or_default() += 1;
        true
    }
}

fn check_against_model<R: Record>(ledger: &MemoryLedger, model: &Model) {
    for id in IDS {
        let present = model.present.get(id).copied().unwrap_or(false);
        match ledger.get_committed(id) {
            Some(bytes) => {
                assert!(present, "{} committed but deleted in model", id);
                let record: R = agriledger::codec::decode(id, &bytes).unwrap();
                assert_eq!(record.key(), id);
            }
            None => assert!(!present, "{} missing from ledger", id),
        }
        assert_eq!(
            ledger.history_len(id),
            model.writes.get(id).copied().unwrap_or(0),
            "history of {}",
            id
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn data_storage_matches_model(ops in prop::collection::vec(op_strategy(), 1..24)) {
        let ledger = MemoryLedger::new();
        let mut model = Model::default();
        for op in &ops {
            let expected = model.apply(op);
            let result = match op {
                Op::Create(i, v) => ledger.invoke(&DataStorageContract, "PlantCrop", &[IDS[*i], &v.to_string()]),
                Op::Update(i, v) => ledger.invoke(&DataStorageContract, "UpdateCrop", &[IDS[*i], &v.to_string()]),
                Op::Delete(i) => ledger.invoke(&DataStorageContract, "RemoveCrop", &[IDS[*i]]),
            };
            prop_assert_eq!(result.is_ok(), expected, "{:?}", op);
        }
        check_against_model::<data_storage::CropRecord>(&ledger, &model);
    }

    #[test]
    fn monitoring_matches_model(ops in prop::collection::vec(op_strategy(), 1..24)) {
        let ledger = MemoryLedger::new();
        let mut model = Model::default();
        for op in &ops {
            let expected = model.apply(op);
            let result = match op {
                Op::Create(i, v) => ledger.invoke(&MonitoringContract, "AddCropRecord", &[IDS[*i], "Barley", &v.to_string()]),
                Op::Update(i, v) => ledger.invoke(&MonitoringContract, "UpdateCropRecord", &[IDS[*i], "Rye", &v.to_string()]),
                Op::Delete(i) => ledger.invoke(&MonitoringContract, "DeleteCropRecord", &[IDS[*i]]),
            };
            prop_assert_eq!(result.is_ok(), expected, "{:?}", op);
        }
        check_against_model::<monitoring::CropRecord>(&ledger, &model);
    }

    #[test]
    fn height_counts_only_writing_commits(ops in prop::collection::vec(op_strategy(), 1..24)) {
        let ledger = MemoryLedger::new();
        let mut model = Model::default();
        let mut writes = 0u64;
        for op in &ops {
            if model.apply(op) {
                writes += 1;
            }
            let _ = match op {
                Op::Create(i, v) => ledger.invoke(&DataStorageContract, "PlantCrop", &[IDS[*i], &v.to_string()]),
                Op::Update(i, v) => ledger.invoke(&DataStorageContract, "UpdateCrop", &[IDS[*i], &v.to_string()]),
                Op::Delete(i) => ledger.invoke(&DataStorageContract, "RemoveCrop", &[IDS[*i]]),
            };
            let _ = ledger.invoke(&DataStorageContract, "CropExists", &[IDS[0]]);
        }
        prop_assert_eq!(ledger.height(), writes);
        let metrics = ledger.metrics();
        prop_assert_eq!(metrics.total_started, metrics.total_committed + metrics.total_aborted);
    }
}
