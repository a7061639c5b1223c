//! Monitoring handlers

use agri_core::history::{project_history, HistoryEntry};
use agri_core::{state, ContractError, LedgerStub, Result};
use tracing::debug;

use crate::record::CropRecord;

/// Deployed name of the contract
pub const CONTRACT_NAME: &str = "monitoring";

const SEED: [(&str, &str, f64); 2] = [("Crop1", "Wheat", 150.5), ("Crop2", "Corn", 200.2)];

fn what(id: &str) -> String {
    format!("the crop record {}", id)
}

/// Crop yield monitoring contract
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitoringContract;

impl MonitoringContract {
    /// Seed `Crop1 (Wheat, 150.5)` and `Crop2 (Corn, 200.2)`.
    pub fn init_ledger(&self, stub: &mut dyn LedgerStub) -> Result<()> {
        for (id, crop_type, yield_amount) in SEED {
            self.put(stub, id, crop_type, yield_amount)?;
        }
        debug!(target: "agri::contract", contract = CONTRACT_NAME, seeded = SEED.len(), "Ledger initialised");
        Ok(())
    }

    /// Create a measurement. Fails if `id` is taken.
    pub fn add_crop_record(
        &self,
        stub: &mut dyn LedgerStub,
        id: &str,
        crop_type: &str,
        yield_amount: f64,
    ) -> Result<()> {
        if self.crop_record_exists(stub, id)? {
            return Err(ContractError::already_exists(what(id)));
        }
        self.put(stub, id, crop_type, yield_amount)?;
        debug!(target: "agri::contract", contract = CONTRACT_NAME, id, crop_type, yield_amount, "Crop record added");
        Ok(())
    }

    /// Replace the crop type and yield of an existing measurement.
    pub fn update_crop_record(
        &self,
        stub: &mut dyn LedgerStub,
        id: &str,
        crop_type: &str,
        yield_amount: f64,
    ) -> Result<()> {
        if !self.crop_record_exists(stub, id)? {
            return Err(ContractError::not_found(what(id)));
        }
        self.put(stub, id, crop_type, yield_amount)?;
        debug!(target: "agri::contract", contract = CONTRACT_NAME, id, crop_type, yield_amount, "Crop record updated");
        Ok(())
    }

    /// Read one measurement
    pub fn get_crop_record(&self, stub: &dyn LedgerStub, id: &str) -> Result<CropRecord> {
        state::read(stub, id)?.ok_or_else(|| ContractError::not_found(what(id)))
    }

    /// Every measurement, in key order
    pub fn get_all_crop_records(&self, stub: &dyn LedgerStub) -> Result<Vec<CropRecord>> {
        state::scan_all(stub)
    }

    /// Commit history of `id`, newest last
    pub fn get_crop_record_history(
        &self,
        stub: &dyn LedgerStub,
        id: &str,
    ) -> Result<Vec<HistoryEntry<CropRecord>>> {
        project_history(stub, id)
    }

    /// Whether `id` is committed at the snapshot
    pub fn crop_record_exists(&self, stub: &dyn LedgerStub, id: &str) -> Result<bool> {
        state::exists(stub, id)
    }

    /// Delete an existing measurement
    pub fn delete_crop_record(&self, stub: &mut dyn LedgerStub, id: &str) -> Result<()> {
        if !self.crop_record_exists(stub, id)? {
            return Err(ContractError::not_found(what(id)));
        }
        state::remove(stub, id)?;
        debug!(target: "agri::contract", contract = CONTRACT_NAME, id, "Crop record deleted");
        Ok(())
    }

    fn put(&self, stub: &mut dyn LedgerStub, id: &str, crop_type: &str, yield_amount: f64) -> Result<()> {
        let record = CropRecord {
            id: id.to_string(),
            crop_type: crop_type.to_string(),
            yield_amount,
            timestamp: state::tx_stamp(stub)?,
        };
        state::write(stub, &record)
    }
}
