//! Transaction dispatch for the monitoring contract

use agri_core::args::{expect_arity, parse_real, unknown_function};
use agri_core::{Contract, LedgerStub, Output, Result};

use crate::contract::{MonitoringContract, CONTRACT_NAME};

/// Transaction names accepted by the contract
pub const FUNCTIONS: &[&str] = &[
    "InitLedger",
    "AddCropRecord",
    "UpdateCropRecord",
    "GetCropRecord",
    "GetAllCropRecords",
    "GetCropRecordHistory",
    "CropRecordExists",
    "DeleteCropRecord",
];

/// A parsed monitoring transaction
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    InitLedger,
    AddCropRecord { id: String, crop_type: String, yield_amount: f64 },
    UpdateCropRecord { id: String, crop_type: String, yield_amount: f64 },
    GetCropRecord { id: String },
    GetAllCropRecords,
    GetCropRecordHistory { id: String },
    CropRecordExists { id: String },
    DeleteCropRecord { id: String },
}

impl Command {
    /// Parse `function(args)`; `yield` is a decimal string.
    pub fn parse(function: &str, args: &[String]) -> Result<Self> {
        match function {
            "InitLedger" => {
                expect_arity(function, args, 0)?;
                Ok(Command::InitLedger)
            }
            "GetAllCropRecords" => {
                expect_arity(function, args, 0)?;
                Ok(Command::GetAllCropRecords)
            }
            "AddCropRecord" | "UpdateCropRecord" => {
                expect_arity(function, args, 3)?;
                let id = args[0].clone();
                let crop_type = args[1].clone();
                let yield_amount = parse_real("yield", &args[2])?;
                Ok(if function == "AddCropRecord" {
                    Command::AddCropRecord { id, crop_type, yield_amount }
                } else {
                    Command::UpdateCropRecord { id, crop_type, yield_amount }
                })
            }
            "GetCropRecord" | "GetCropRecordHistory" | "CropRecordExists" | "DeleteCropRecord" => {
                expect_arity(function, args, 1)?;
                let id = args[0].clone();
                Ok(match function {
                    "GetCropRecord" => Command::GetCropRecord { id },
                    "GetCropRecordHistory" => Command::GetCropRecordHistory { id },
                    "CropRecordExists" => Command::CropRecordExists { id },
                    _ => Command::DeleteCropRecord { id },
                })
            }
            _ => Err(unknown_function(CONTRACT_NAME, function)),
        }
    }

    /// Transaction name of this command
    pub fn name(&self) -> &'static str {
        match self {
            Command::InitLedger => "InitLedger",
            Command::AddCropRecord { .. } => "AddCropRecord",
            Command::UpdateCropRecord { .. } => "UpdateCropRecord",
            Command::GetCropRecord { .. } => "GetCropRecord",
            Command::GetAllCropRecords => "GetAllCropRecords",
            Command::GetCropRecordHistory { .. } => "GetCropRecordHistory",
            Command::CropRecordExists { .. } => "CropRecordExists",
            Command::DeleteCropRecord { .. } => "DeleteCropRecord",
        }
    }
}

impl MonitoringContract {
    /// Run a parsed command
    pub fn execute(&self, stub: &mut dyn LedgerStub, cmd: Command) -> Result<Output> {
        match cmd {
            Command::InitLedger => self.init_ledger(stub).map(|_| Output::Unit),
            Command::AddCropRecord { id, crop_type, yield_amount } => self
                .add_crop_record(stub, &id, &crop_type, yield_amount)
                .map(|_| Output::Unit),
            Command::UpdateCropRecord { id, crop_type, yield_amount } => self
                .update_crop_record(stub, &id, &crop_type, yield_amount)
                .map(|_| Output::Unit),
            Command::GetCropRecord { id } => Output::json(&self.get_crop_record(stub, &id)?),
            Command::GetAllCropRecords => Output::json(&self.get_all_crop_records(stub)?),
            Command::GetCropRecordHistory { id } => {
                Output::json(&self.get_crop_record_history(stub, &id)?)
            }
            Command::CropRecordExists { id } => self.crop_record_exists(stub, &id).map(Output::Bool),
            Command::DeleteCropRecord { id } => self.delete_crop_record(stub, &id).map(|_| Output::Unit),
        }
    }
}

impl Contract for MonitoringContract {
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
