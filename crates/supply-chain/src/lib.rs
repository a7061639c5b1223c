//! Supply-chain contract
//!
//! Crop registration and custody transfer with a provenance trail:
//! `InitLedger`, `RegisterCrop`, `ReadCrop`, `TransferCrop`, `CropExists`,
//! `GetAllCrops`, `GetCropHistory`.

#![warn(clippy::all)]

pub mod command;
pub mod contract;
pub mod record;

pub use command::{Command, FUNCTIONS};
pub use contract::{SupplyChainContract, CONTRACT_NAME};
pub use record::Crop;
