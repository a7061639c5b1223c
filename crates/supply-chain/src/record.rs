//! Crop custody schema

use agri_core::Record;
use serde::{Deserialize, Serialize};

/// A registered crop and its current custodian.
///
/// `farmer` is fixed at registration; only `current_owner` and `timestamp`
/// change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    /// Primary key
    #[serde(rename = "cropID")]
    pub crop_id: String,
    /// Crop name (e.g. `Wheat`)
    pub name: String,
    /// Grower, immutable
    pub farmer: String,
    /// Current custodian
    pub current_owner: String,
    /// Where the crop was grown
    pub field_location: String,
    /// RFC 3339 timestamp of the last mutation
    pub timestamp: String,
}

impl Record for Crop {
    const KEY_FIELD: &'static str = "cropID";

    fn key(&self) -> &str {
        &self.crop_id
    }

    fn placeholder(key: &str) -> Self {
        Crop {
            crop_id: key.to_string(),
            ..Default::default()
        }
    }
}
