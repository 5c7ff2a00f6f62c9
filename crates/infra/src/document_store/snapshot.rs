use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockroom_inventory::AdjustmentDocument;
use stockroom_products::{Product, Unit};
use stockroom_purchasing::ImportDocument;
use stockroom_sales::ExportDocument;

/// Full export of the store's collections, as exchanged in JSON files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub imports: Vec<ImportDocument>,
    #[serde(default)]
    pub exports: Vec<ExportDocument>,
    #[serde(default)]
    pub adjustments: Vec<AdjustmentDocument>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
