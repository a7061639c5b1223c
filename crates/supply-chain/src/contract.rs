//! Supply-chain handlers
//!
//! A crop is registered once by its grower and then changes hands through
//! [`SupplyChainContract::transfer_crop`]. The history of a crop id is its
//! provenance trail.

use agri_core::history::{project_history, HistoryEntry};
use agri_core::{state, ContractError, LedgerStub, Result};
use tracing::debug;

use crate::record::Crop;

/// Deployed name of the contract
pub const CONTRACT_NAME: &str = "supply-chain";

const SEED: [(&str, &str, &str, &str, &str); 2] = [
    ("C001", "Wheat", "Farmer1", "Owner1", "Field1"),
    ("C002", "Corn", "Farmer2", "Owner2", "Field2"),
];

fn what(crop_id: &str) -> String {
    format!("the crop {}", crop_id)
}

/// Crop custody contract
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupplyChainContract;

impl SupplyChainContract {
    /// Seed `C001` and `C002`. Overwrites existing seeds.
    pub fn init_ledger(&self, stub: &mut dyn LedgerStub) -> Result<()> {
        let timestamp = state::tx_stamp(stub)?;
        for (crop_id, name, farmer, owner, location) in SEED {
            state::write(
                stub,
                &Crop {
                    crop_id: crop_id.to_string(),
                    name: name.to_string(),
                    farmer: farmer.to_string(),
                    current_owner: owner.to_string(),
                    field_location: location.to_string(),
                    timestamp: timestamp.clone(),
                },
            )?;
        }
        debug!(target: "agri::contract", contract = CONTRACT_NAME, seeded = SEED.len(), "Ledger initialised");
        Ok(())
    }

    /// Register a new crop. Fails if `crop_id` is taken.
    pub fn register_crop(
        &self,
        stub: &mut dyn LedgerStub,
        crop_id: &str,
        name: &str,
        farmer: &str,
        current_owner: &str,
        field_location: &str,
    ) -> Result<()> {
        if self.crop_exists(stub, crop_id)? {
            return Err(ContractError::already_exists(what(crop_id)));
        }
        let crop = Crop {
            crop_id: crop_id.to_string(),
            name: name.to_string(),
            farmer: farmer.to_string(),
            current_owner: current_owner.to_string(),
            field_location: field_location.to_string(),
            timestamp: state::tx_stamp(stub)?,
        };
        state::write(stub, &crop)?;
        debug!(target: "agri::contract", contract = CONTRACT_NAME, crop_id, farmer, "Crop registered");
        Ok(())
    }

    /// Read one crop
    pub fn read_crop(&self, stub: &dyn LedgerStub, crop_id: &str) -> Result<Crop> {
        state::read(stub, crop_id)?.ok_or_else(|| ContractError::not_found(what(crop_id)))
    }

    /// Hand the crop to `new_owner`. Nothing but owner and timestamp changes.
    pub fn transfer_crop(&self, stub: &mut dyn LedgerStub, crop_id: &str, new_owner: &str) -> Result<()> {
        let mut crop = self.read_crop(stub, crop_id)?;
        let previous = std::mem::replace(&mut crop.current_owner, new_owner.to_string());
        crop.timestamp = state::tx_stamp(stub)?;
        state::write(stub, &crop)?;
        debug!(
            target: "agri::contract",
            contract = CONTRACT_NAME,
            crop_id,
            from = %previous,
            to = new_owner,
            "Crop transferred"
        );
        Ok(())
    }

    /// Whether `crop_id` is registered
    pub fn crop_exists(&self, stub: &dyn LedgerStub, crop_id: &str) -> Result<bool> {
        state::exists(stub, crop_id)
    }

    /// Every registered crop, in key order
    pub fn get_all_crops(&self, stub: &dyn LedgerStub) -> Result<Vec<Crop>> {
        state::scan_all(stub)
    }

    /// Provenance trail of `crop_id`, oldest first
    pub fn get_crop_history(&self, stub: &dyn LedgerStub, crop_id: &str) -> Result<Vec<HistoryEntry<Crop>>> {
        project_history(stub, crop_id)
    }
}
