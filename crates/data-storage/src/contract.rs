//! Data-storage handlers
//!
//! Each method is one transaction. Mutations stamp the record with the
//! transaction timestamp; reads never write.

use agri_core::history::{project_history, HistoryEntry};
use agri_core::{state, ContractError, LedgerStub, Result};
use tracing::debug;

use crate::record::CropRecord;

/// Deployed name of the contract
pub const CONTRACT_NAME: &str = "data-storage";

const SEED: [(&str, &str); 2] = [
    ("Crop1", "Initial Crop Data 1"),
    ("Crop2", "Initial Crop Data 2"),
];

fn what(id: &str) -> String {
    format!("the crop record {}", id)
}

/// Raw crop record contract
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataStorageContract;

impl DataStorageContract {
    /// Seed `Crop1` and `Crop2`. Overwrites existing seeds.
    pub fn init_farm(&self, stub: &mut dyn LedgerStub) -> Result<()> {
        let timestamp = state::tx_stamp(stub)?;
        for (id, data) in SEED {
            state::write(
                stub,
                &CropRecord {
                    id: id.to_string(),
                    data: data.to_string(),
                    timestamp: timestamp.clone(),
                },
            )?;
        }
        debug!(target: "agri::contract", contract = CONTRACT_NAME, seeded = SEED.len(), "Farm initialised");
        Ok(())
    }

    /// Create a record. Fails if `id` is taken.
    pub fn plant_crop(&self, stub: &mut dyn LedgerStub, id: &str, data: &str) -> Result<()> {
        if self.crop_exists(stub, id)? {
            return Err(ContractError::already_exists(what(id)));
        }
        self.put(stub, id, data)?;
        debug!(target: "agri::contract", contract = CONTRACT_NAME, id, "Crop planted");
        Ok(())
    }

    /// Replace the data of an existing record.
    pub fn update_crop(&self, stub: &mut dyn LedgerStub, id: &str, data: &str) -> Result<()> {
        if !self.crop_exists(stub, id)? {
            return Err(ContractError::not_found(what(id)));
        }
        self.put(stub, id, data)?;
        debug!(target: "agri::contract", contract = CONTRACT_NAME, id, "Crop updated");
        Ok(())
    }

    /// Read one record
    pub fn harvest_crop(&self, stub: &dyn LedgerStub, id: &str) -> Result<CropRecord> {
        state::read(stub, id)?.ok_or_else(|| ContractError::not_found(what(id)))
    }

    /// Every record, in key order
    pub fn get_all_crops(&self, stub: &dyn LedgerStub) -> Result<Vec<CropRecord>> {
        state::scan_all(stub)
    }

    /// Commit history of `id`, oldest first
    pub fn get_crop_history(
        &self,
        stub: &dyn LedgerStub,
        id: &str,
    ) -> Result<Vec<HistoryEntry<CropRecord>>> {
        project_history(stub, id)
    }

    /// Delete an existing record
    pub fn remove_crop(&self, stub: &mut dyn LedgerStub, id: &str) -> Result<()> {
        if !self.crop_exists(stub, id)? {
            return Err(ContractError::not_found(what(id)));
        }
        state::remove(stub, id)?;
        debug!(target: "agri::contract", contract = CONTRACT_NAME, id, "Crop removed");
        Ok(())
    }

    /// Whether a record is stored under `id`
    pub fn crop_exists(&self, stub: &dyn LedgerStub, id: &str) -> Result<bool> {
        state::exists(stub, id)
    }

    fn put(&self, stub: &mut dyn LedgerStub, id: &str, data: &str) -> Result<()> {
        let record = CropRecord {
            id: id.to_string(),
            data: data.to_string(),
            timestamp: state::tx_stamp(stub)?,
        };
        state::write(stub, &record)
    }
}
