//! Data-storage contract
//!
//! Stores caller-supplied crop data blobs keyed by crop id:
//! `InitFarm`, `PlantCrop`, `UpdateCrop`, `HarvestCrop`, `GetAllCrops`,
//! `GetCropHistory`, `RemoveCrop`, `CropExists`.

#![warn(clippy::all)]

pub mod command;
pub mod contract;
pub mod record;

pub use command::{Command, FUNCTIONS};
pub use contract::{DataStorageContract, CONTRACT_NAME};
pub use record::CropRecord;
