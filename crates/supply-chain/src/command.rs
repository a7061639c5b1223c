//! Transaction dispatch for the supply-chain contract

use agri_core::args::{expect_arity, unknown_function};
use agri_core::{Contract, LedgerStub, Output, Result};

use crate::contract::{SupplyChainContract, CONTRACT_NAME};

/// Transaction names accepted by the contract
pub const FUNCTIONS: &[&str] = &[
    "InitLedger",
    "RegisterCrop",
    "ReadCrop",
    "TransferCrop",
    "CropExists",
    "GetAllCrops",
    "GetCropHistory",
];

/// A parsed supply-chain transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    InitLedger,
    RegisterCrop {
        crop_id: String,
        name: String,
        farmer: String,
        current_owner: String,
        field_location: String,
    },
    ReadCrop { crop_id: String },
    TransferCrop { crop_id: String, new_owner: String },
    CropExists { crop_id: String },
    GetAllCrops,
    GetCropHistory { crop_id: String },
}

impl Command {
    /// Parse `function(args)`.
    pub fn parse(function: &str, args: &[String]) -> Result<Self> {
        let arity = match function {
            "InitLedger" | "GetAllCrops" => 0,
            "ReadCrop" | "CropExists" | "GetCropHistory" => 1,
            "TransferCrop" => 2,
            "RegisterCrop" => 5,
            _ => return Err(unknown_function(CONTRACT_NAME, function)),
        };
        expect_arity(function, args, arity)?;

        let arg = |i: usize| args[i].clone();
        Ok(match function {
            "InitLedger" => Command::InitLedger,
            "GetAllCrops" => Command::GetAllCrops,
            "ReadCrop" => Command::ReadCrop { crop_id: arg(0) },
            "CropExists" => Command::CropExists { crop_id: arg(0) },
            "GetCropHistory" => Command::GetCropHistory { crop_id: arg(0) },
            "TransferCrop" => Command::TransferCrop {
                crop_id: arg(0),
                new_owner: arg(1),
            },
            _ => Command::RegisterCrop {
                crop_id: arg(0),
                name: arg(1),
                farmer: arg(2),
                current_owner: arg(3),
                field_location: arg(4),
            },
        })
    }

    /// Transaction name of this command
    pub fn name(&self) -> &'static str {
        match self {
            Command::InitLedger => "InitLedger",
            Command::RegisterCrop { .. } => "RegisterCrop",
            Command::ReadCrop { .. } => "ReadCrop",
            Command::TransferCrop { .. } => "TransferCrop",
            Command::CropExists { .. } => "CropExists",
            Command::GetAllCrops => "GetAllCrops",
            Command::GetCropHistory { .. } => "GetCropHistory",
        }
    }
}

impl SupplyChainContract {
    /// Run a parsed command
    pub fn execute(&self, stub: &mut dyn LedgerStub, cmd: Command) -> Result<Output> {
        match cmd {
            Command::InitLedger => self.init_ledger(stub).map(|_| Output::Unit),
            Command::RegisterCrop {
                crop_id,
                name,
                farmer,
                current_owner,
                field_location,
            } => self
                .register_crop(stub, &crop_id, &name, &farmer, &current_owner, &field_location)
                .map(|_| Output::Unit),
            Command::ReadCrop { crop_id } => Output::json(&self.read_crop(stub, &crop_id)?),
            Command::TransferCrop { crop_id, new_owner } => self
                .transfer_crop(stub, &crop_id, &new_owner)
                .map(|_| Output::Unit),
            Command::CropExists { crop_id } => self.crop_exists(stub, &crop_id).map(Output::Bool),
            Command::GetAllCrops => Output::json(&self.get_all_crops(stub)?),
            Command::GetCropHistory { crop_id } => Output::json(&self.get_crop_history(stub, &crop_id)?),
        }
    }
}

impl Contract for SupplyChainContract {
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
