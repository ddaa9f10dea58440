//! Catalog records and catalog file loading.
//!
//! A catalog file is a JSON array of store records using the camelCase keys
//! of the browser data (`foodType`, `priceBucket`, `distanceMi`, ...).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single store listing. Read-only from the filter engine's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    #[serde(default)]
    pub dietary: Vec<String>,
    pub food_type: String,
    pub price_bucket: String,
    pub distance_mi: f64,
    pub pickup_day: String,
    pub pickup_window: String,

    // Presentation fields; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_left: Option<u32>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Record {
    pub fn has_dietary_tag(&self, tag: &str) -> bool {
        self.dietary.iter().any(|t| t == tag)
    }
}

pub fn parse_catalog(raw: &str) -> Result<Vec<Record>> {
    Ok(serde_json::from_str(raw)?)
}

pub fn load_catalog(path: &Path) -> Result<Vec<Record>> {
    let raw = fs::read_to_string(path).map_err(|source| Error::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_catalog(&raw)?;
    tracing::debug!(
        path = %path.display(),
        records = records.len(),
        "loaded catalog"
    );
    Ok(records)
}
