//! Transaction dispatch
//!
//! Maps a transaction name plus positional string arguments onto a typed
//! [`Command`], then onto the matching handler.

use agri_core::args::{expect_arity, unknown_function};
use agri_core::{Contract, LedgerStub, Output, Result};

use crate::contract::{DataStorageContract, CONTRACT_NAME};

/// Transaction names accepted by the contract
pub const FUNCTIONS: &[&str] = &[
    "InitFarm",
    "PlantCrop",
    "UpdateCrop",
    "HarvestCrop",
    "GetAllCrops",
    "GetCropHistory",
    "RemoveCrop",
    "CropExists",
];

/// A parsed data-storage transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Seed the two demo records
    InitFarm,
    /// Create a record
    PlantCrop { id: String, data: String },
    /// Replace a record's data
    UpdateCrop { id: String, data: String },
    /// Read one record
    HarvestCrop { id: String },
    /// Read every record
    GetAllCrops,
    /// Commit history of one record
    GetCropHistory { id: String },
    /// Delete a record
    RemoveCrop { id: String },
    /// Existence check
    CropExists { id: String },
}

impl Command {
    /// Parse `function(args)`.
    pub fn parse(function: &str, args: &[String]) -> Result<Self> {
        let arity = match function {
            "InitFarm" | "GetAllCrops" => 0,
            "HarvestCrop" | "GetCropHistory" | "RemoveCrop" | "CropExists" => 1,
            "PlantCrop" | "UpdateCrop" => 2,
            _ => return Err(unknown_function(CONTRACT_NAME, function)),
        };
        expect_arity(function, args, arity)?;

        let id = || args[0].clone();
        Ok(match function {
            "InitFarm" => Command::InitFarm,
            "GetAllCrops" => Command::GetAllCrops,
            "HarvestCrop" => Command::HarvestCrop { id: id() },
            "GetCropHistory" => Command::GetCropHistory { id: id() },
            "RemoveCrop" => Command::RemoveCrop { id: id() },
            "CropExists" => Command::CropExists { id: id() },
            "PlantCrop" => Command::PlantCrop {
                id: id(),
                data: args[1].clone(),
            },
            _ => Command::UpdateCrop {
                id: id(),
                data: args[1].clone(),
            },
        })
    }

    /// Transaction name of this command
    pub fn name(&self) -> &'static str {
        match self {
            Command::InitFarm => "InitFarm",
            Command::PlantCrop { .. } => "PlantCrop",
            Command::UpdateCrop { .. } => "UpdateCrop",
            Command::HarvestCrop { .. } => "HarvestCrop",
            Command::GetAllCrops => "GetAllCrops",
            Command::GetCropHistory { .. } => "GetCropHistory",
            Command::RemoveCrop { .. } => "RemoveCrop",
            Command::CropExists { .. } => "CropExists",
        }
    }

    /// Whether the command never stages writes
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Command::HarvestCrop { .. }
                | Command::GetAllCrops
                | Command::GetCropHistory { .. }
                | Command::CropExists { .. }
        )
    }
}

impl DataStorageContract {
    /// Run a parsed command
    pub fn execute(&self, stub: &mut dyn LedgerStub, cmd: Command) -> Result<Output> {
        match cmd {
            Command::InitFarm => self.init_farm(stub).map(|_| Output::Unit),
            Command::PlantCrop { id, data } => self.plant_crop(stub, &id, &data).map(|_| Output::Unit),
            Command::UpdateCrop { id, data } => {
                self.update_crop(stub, &id, &data).map(|_| Output::Unit)
            }
            Command::HarvestCrop { id } => Output::json(&self.harvest_crop(stub, &id)?),
            Command::GetAllCrops => Output::json(&self.get_all_crops(stub)?),
            Command::GetCropHistory { id } => Output::json(&self.get_crop_history(stub, &id)?),
            Command::RemoveCrop { id } => self.remove_crop(stub, &id).map(|_| Output::Unit),
            Command::CropExists { id } => self.crop_exists(stub, &id).map(Output::Bool),
        }
    }
}

impl Contract for DataStorageContract {
    fn name(&self) -> &'static str {
        CONTRACT_NAME
    }

    fn functions(&self) -> &'static [&'static str] {
        FUNCTIONS
    }

    fn invoke(&self, stub: &mut dyn LedgerStub, function: &str, args: &[String]) -> Result<Output> {
        let cmd = Command::parse(function, args)?;
        self.execute(stub, cmd)
    }
}
