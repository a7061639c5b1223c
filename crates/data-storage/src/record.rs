//! Crop record schema

use agri_core::Record;
use serde::{Deserialize, Serialize};

/// An opaque crop data blob keyed by crop id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRecord {
    /// Primary key
    pub id: String,
    /// Caller-supplied payload, stored verbatim
    pub data: String,
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
