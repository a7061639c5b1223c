//! Crop yield schema

use agri_core::Record;
use serde::{Deserialize, Serialize};

/// A yield measurement for one crop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecord {
    /// Primary key
    pub id: String,
    /// Crop variety (e.g. `Wheat`)
    pub crop_type: String,
    /// Measured yield
    #[serde(rename = "yield")]
    pub yield_amount: f64,
    /// RFC 3339 timestamp of the last mutation
    pub timestamp: String,
}

impl Record for CropRecord {
    const KEY_FIELD: &'static str = "id";

    fn key(&self) -> &str {
        &self.id
    }

    fn placeholder(key: &str) -> Self {
        CropRecord {
            id: key.to_string(),
            ..Default::default()
        }
    }
}
