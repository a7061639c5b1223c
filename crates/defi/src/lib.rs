//! Defi contract
//!
//! Tracks farmer crop balances and planting events:
//! `InitLedger`, `HarvestCrops`, `DistributeCrops`, `DiscardSpoiledCrops`,
//! `PlantCrops`, `HarvestPlantedCrops`, `GetCropBalance`,
//! `GetAllCropBalances`, `GetCropHistory`, `GetPlantingInfo`.
//!
//! No committed balance is ever negative.

#![warn(clippy::all)]

pub mod command;
pub mod contract;
pub mod record;

pub use command::{Command, FUNCTIONS};
pub use contract::{DefiContract, CONTRACT_NAME};
pub use record::{CropBalance, PlantingInfo, PLANTING_OBJECT_TYPE};
