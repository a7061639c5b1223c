//! Balance and planting schemas

use agri_core::Record;
use serde::{Deserialize, Serialize};

/// Object type of planting composite keys
pub const PLANTING_OBJECT_TYPE: &str = "Planting";

/// A farmer's crop balance
///
/// `crop_amount` is never negative in committed state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropBalance {
    /// Primary key
    pub farmer: String,
    /// Crops held
    pub crop_amount: f64,
    /// RFC 3339 timestamp of the last mutation
    pub timestamp: String,
}

impl CropBalance {
    /// A zero balance, used when a farmer is first credited
    pub fn empty(farmer: &str) -> Self {
        Self::placeholder(farmer)
    }
}

impl Record for CropBalance {
    const KEY_FIELD: &'static str = "farmer";

    fn key(&self) -> &str {
        &self.farmer
    }

    fn placeholder(key: &str) -> Self {
        CropBalance {
            farmer: key.to_string(),
            ..Default::default()
        }
    }
}

/// One planting event. Stored under `(Planting, [farmer, timestamp])`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantingInfo {
    /// Farmer who planted
    pub farmer: String,
    /// Crops taken from the balance
    pub planted_amount: f64,
    /// Harvested yield attributed to this planting
    #[serde(rename = "yield")]
    pub yield_amount: f64,
    /// RFC 3339 timestamp of the planting transaction
    pub timestamp: String,
}
