//! Transaction dispatch for the defi contract

use agri_core::args::{expect_arity, parse_real, unknown_function};
use agri_core::{Contract, LedgerStub, Output, Result};

use crate::contract::{DefiContract, CONTRACT_NAME};

/// Transaction names accepted by the contract
pub const FUNCTIONS: &[&str] = &[
    "InitLedger",
    "HarvestCrops",
    "DistributeCrops",
    "DiscardSpoiledCrops",
    "PlantCrops",
    "HarvestPlantedCrops",
    "GetCropBalance",
    "GetAllCropBalances",
    "GetCropHistory",
    "GetPlantingInfo",
];

/// A parsed defi transaction. Amounts are already parsed and finite.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    InitLedger,
    HarvestCrops { farmer: String, amount: f64 },
    DistributeCrops { from: String, to: String, amount: f64 },
    DiscardSpoiledCrops { farmer: String, amount: f64 },
    PlantCrops { farmer: String, amount: f64 },
    HarvestPlantedCrops { farmer: String, amount: f64 },
    GetCropBalance { farmer: String },
    GetAllCropBalances,
    GetCropHistory { farmer: String },
    GetPlantingInfo { farmer: String },
}

impl Command {
    /// Parse `function(args)`. Amounts are decimal strings.
    pub fn parse(function: &str, args: &[String]) -> Result<Self> {
        let arity = match function {
            "InitLedger" | "GetAllCropBalances" => 0,
            "GetCropBalance" | "GetCropHistory" | "GetPlantingInfo" => 1,
            "HarvestCrops" | "DiscardSpoiledCrops" | "PlantCrops" | "HarvestPlantedCrops" => 2,
            "DistributeCrops" => 3,
            _ => return Err(unknown_function(CONTRACT_NAME, function)),
        };
        expect_arity(function, args, arity)?;

        let farmer = || args[0].clone();
        let cmd = match function {
            "InitLedger" => Command::InitLedger,
            "GetAllCropBalances" => Command::GetAllCropBalances,
            "GetCropBalance" => Command::GetCropBalance { farmer: farmer() },
            "GetCropHistory" => Command::GetCropHistory { farmer: farmer() },
            "GetPlantingInfo" => Command::GetPlantingInfo { farmer: farmer() },
            "DistributeCrops" => Command::DistributeCrops {
                from: farmer(),
                to: args[1].clone(),
                amount: parse_real("amount", &args[2])?,
            },
            _ => {
                let amount = parse_real("amount", &args[1])?;
                match function {
                    "HarvestCrops" => Command::HarvestCrops { farmer: farmer(), amount },
                    "DiscardSpoiledCrops" => Command::DiscardSpoiledCrops { farmer: farmer(), amount },
                    "PlantCrops" => Command::PlantCrops { farmer: farmer(), amount },
                    _ => Command::HarvestPlantedCrops { farmer: farmer(), amount },
                }
            }
        };
        Ok(cmd)
    }

    /// Transaction name of this command
    pub fn name(&self) -> &'static str {
        match self {
            Command::InitLedger => "InitLedger",
            Command::HarvestCrops { .. } => "HarvestCrops",
            Command::DistributeCrops { .. } => "DistributeCrops",
            Command::DiscardSpoiledCrops { .. } => "DiscardSpoiledCrops",
            Command::PlantCrops { .. } => "PlantCrops",
            Command::HarvestPlantedCrops { .. } => "HarvestPlantedCrops",
            Command::GetCropBalance { .. } => "GetCropBalance",
            Command::GetAllCropBalances => "GetAllCropBalances",
            Command::GetCropHistory { .. } => "GetCropHistory",
            Command::GetPlantingInfo { .. } => "GetPlantingInfo",
        }
    }

    /// Whether the command never stages writes
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Command::GetCropBalance { .. }
                | Command::GetAllCropBalances
                | Command::GetCropHistory { .. }
                | Command::GetPlantingInfo { .. }
        )
    }
}

impl DefiContract {
    /// Run a parsed command
    pub fn execute(&self, stub: &mut dyn LedgerStub, cmd: Command) -> Result<Output> {
        match cmd {
            Command::InitLedger => self.init_ledger(stub).map(|_| Output::Unit),
            Command::HarvestCrops { farmer, amount } => {
                self.harvest_crops(stub, &farmer, amount).map(|_| Output::Unit)
            }
            Command::DistributeCrops { from, to, amount } => self
                .distribute_crops(stub, &from, &to, amount)
                .map(|_| Output::Unit),
            Command::DiscardSpoiledCrops { farmer, amount } => self
                .discard_spoiled_crops(stub, &farmer, amount)
                .map(|_| Output::Unit),
            Command::PlantCrops { farmer, amount } => {
                self.plant_crops(stub, &farmer, amount).map(|_| Output::Unit)
            }
            Command::HarvestPlantedCrops { farmer, amount } => self
                .harvest_planted_crops(stub, &farmer, amount)
                .map(|_| Output::Unit),
            Command::GetCropBalance { farmer } => Output::json(&self.get_crop_balance(stub, &farmer)?),
            Command::GetAllCropBalances => Output::json(&self.get_all_crop_balances(stub)?),
            Command::GetCropHistory { farmer } => {
                Output::json(&self.get_crop_history(stub, &farmer)?)
            }
            Command::GetPlantingInfo { farmer } => {
                Output::json(&self.get_planting_info(stub, &farmer)?)
            }
        }
    }
}

impl Contract for DefiContract {
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
