//! Monitoring contract
//!
//! Yield measurements per crop: `InitLedger`, `AddCropRecord`,
//! `UpdateCropRecord`, `GetCropRecord`, `GetAllCropRecords`,
//! `GetCropRecordHistory`, `CropRecordExists`, `DeleteCropRecord`.

#![warn(clippy::all)]

pub mod command;
pub mod contract;
pub mod record;

pub use command::{Command, FUNCTIONS};
pub use contract::{MonitoringContract, CONTRACT_NAME};
pub use record::CropRecord;
