//! Defi handlers
//!
//! Balances live under the farmer's name; plantings under the composite key
//! `(Planting, [farmer, txTimestamp])`, so a prefix scan on `[farmer]` lists
//! one farmer's plantings in chronological order.
//!
//! Every mutation goes through [`debit`], which refuses any result below
//! zero, so `cropAmount >= 0` holds for every committed balance.

use agri_core::history::{project_history, HistoryEntry};
use agri_core::{state, ContractError, LedgerStub, Result};
use tracing::debug;

use crate::record::{CropBalance, PlantingInfo, PLANTING_OBJECT_TYPE};

/// Deployed name of the contract
pub const CONTRACT_NAME: &str = "defi";

const SEED: [(&str, f64); 2] = [("Farmer1", 1000.0), ("Farmer2", 500.0)];

fn what(farmer: &str) -> String {
    format!("the crop balance for {}", farmer)
}

/// Balance left after taking `amount` from `balance` for `purpose`.
///
/// A negative `amount` is a credit.
fn debit(balance: &CropBalance, amount: f64, purpose: &str) -> Result<f64> {
    let remaining = balance.crop_amount - amount;
    if balance.crop_amount < amount || remaining < 0.0 || !remaining.is_finite() {
        return Err(ContractError::InsufficientBalance {
            farmer: balance.farmer.clone(),
            purpose: purpose.to_string(),
            requested: amount,
            available: balance.crop_amount,
        });
    }
    Ok(remaining)
}

fn require_finite(name: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(ContractError::invalid_argument(format!(
            "{} must be finite, got {}",
            name, amount
        )));
    }
    Ok(())
}

/// Farmer crop balance contract
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefiContract;

impl DefiContract {
    /// Seed `Farmer1: 1000` and `Farmer2: 500`. Overwrites existing seeds.
    pub fn init_ledger(&self, stub: &mut dyn LedgerStub) -> Result<()> {
        let timestamp = state::tx_stamp(stub)?;
        for (farmer, amount) in SEED {
            state::write(
                stub,
                &CropBalance {
                    farmer: farmer.to_string(),
                    crop_amount: amount,
                    timestamp: timestamp.clone(),
                },
            )?;
        }
        debug!(target: "agri::contract", contract = CONTRACT_NAME, seeded = SEED.len(), "Ledger initialised");
        Ok(())
    }

    /// Credit `amount`, creating the balance at zero if absent.
    pub fn harvest_crops(&self, stub: &mut dyn LedgerStub, farmer: &str, amount: f64) -> Result<()> {
        require_finite("amount", amount)?;
        let mut balance = match self.get_crop_balance(stub, farmer) {
            Ok(balance) => balance,
            Err(e) if e.is_not_found() => CropBalance::empty(farmer),
            Err(e) => return Err(e),
        };
        balance.crop_amount = debit(&balance, -amount, "")?;
        self.store(stub, balance)?;
        debug!(target: "agri::contract", contract = CONTRACT_NAME, farmer, amount, "Crops harvested");
        Ok(())
    }

    /// Move `amount` from `from` to `to`, creating `to` at zero if absent.
    pub fn distribute_crops(
        &self,
        stub: &mut dyn LedgerStub,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<()> {
        require_finite("amount", amount)?;
        let mut sender = self.get_crop_balance(stub, from)?;
        let sender_left = debit(&sender, amount, "")?;

        if from == to {
            // Reads come from the snapshot, so two puts would collapse into
            // the credit alone. A self-transfer only restamps.
            self.store(stub, sender)?;
            return Ok(());
        }

        let mut receiver = match self.get_crop_balance(stub, to) {
            Ok(balance) => balance,
            Err(e) if e.is_not_found() => CropBalance::empty(to),
            Err(e) => return Err(e),
        };
        let receiver_total = debit(&receiver, -amount, "")?;

        sender.crop_amount = sender_left;
        receiver.crop_amount = receiver_total;
        self.store(stub, sender)?;
        self.store(stub, receiver)?;
        debug!(target: "agri::contract", contract = CONTRACT_NAME, from, to, amount, "Crops distributed");
        Ok(())
    }

    /// Remove `amount` of spoiled crops from an existing balance.
    pub fn discard_spoiled_crops(
        &self,
        stub: &mut dyn LedgerStub,
        farmer: &str,
        amount: f64,
    ) -> Result<()> {
        require_finite("amount", amount)?;
        let mut balance = self.get_crop_balance(stub, farmer)?;
        balance.crop_amount = debit(&balance, amount, "discard")?;
        self.store(stub, balance)?;
        debug!(target: "agri::contract", contract = CONTRACT_NAME, farmer, amount, "Spoiled crops discarded");
        Ok(())
    }

    /// Take `amount` from the balance and record a planting.
    pub fn plant_crops(&self, stub: &mut dyn LedgerStub, farmer: &str, amount: f64) -> Result<()> {
        require_finite("amount", amount)?;
        if amount <= 0.0 {
            return Err(ContractError::invalid_argument(format!(
                "planted amount must be positive, got {}",
                amount
            )));
        }
        let mut balance = self.get_crop_balance(stub, farmer)?;
        balance.crop_amount = debit(&balance, amount, "plant")?;

        let timestamp = state::tx_stamp(stub)?;
        let key = state::composite_key(PLANTING_OBJECT_TYPE, &[farmer, timestamp.as_str()])?;
        let planting = PlantingInfo {
            farmer: farmer.to_string(),
            planted_amount: amount,
            yield_amount: 0.0,
            timestamp,
        };

        self.store(stub, balance)?;
        state::write_at(stub, &key, &planting)?;
        debug!(target: "agri::contract", contract = CONTRACT_NAME, farmer, amount, "Crops planted");
        Ok(())
    }

    /// Credit `amount` of harvested crops to an existing balance.
    ///
    /// The credit is not attributed to any planting; `PlantingInfo.yield`
    /// is left untouched.
    pub fn harvest_planted_crops(
        &self,
        stub: &mut dyn LedgerStub,
        farmer: &str,
        amount: f64,
    ) -> Result<()> {
        require_finite("amount", amount)?;
        let mut balance = self.get_crop_balance(stub, farmer)?;
        balance.crop_amount = debit(&balance, -amount, "")?;
        self.store(stub, balance)?;
        debug!(target: "agri::contract", contract = CONTRACT_NAME, farmer, amount, "Planted crops harvested");
        Ok(())
    }

    /// Read one balance
    pub fn get_crop_balance(&self, stub: &dyn LedgerStub, farmer: &str) -> Result<CropBalance> {
        state::read(stub, farmer)?.ok_or_else(|| ContractError::not_found(what(farmer)))
    }

    /// Every balance, in key order. Plantings are not listed.
    pub fn get_all_crop_balances(&self, stub: &dyn LedgerStub) -> Result<Vec<CropBalance>> {
        state::scan_all(stub)
    }

    /// Commit history of a farmer's balance, oldest first
    pub fn get_crop_history(
        &self,
        stub: &dyn LedgerStub,
        farmer: &str,
    ) -> Result<Vec<HistoryEntry<CropBalance>>> {
        project_history(stub, farmer)
    }

    /// A farmer's plantings, oldest first
    pub fn get_planting_info(&self, stub: &dyn LedgerStub, farmer: &str) -> Result<Vec<PlantingInfo>> {
        state::scan_composite(stub, PLANTING_OBJECT_TYPE, &[farmer])
    }

    fn store(&self, stub: &mut dyn LedgerStub, mut balance: CropBalance) -> Result<()> {
        balance.timestamp = state::tx_stamp(stub)?;
        state::write(stub, &balance)
    }
}
