//! Flat key-value configuration for the risk model.
//!
//! The on-disk format is a small JSON object with up to four keys
//! (`coeff_kind`, `coeff_vector`, `discount_kind`, `discount_vector`);
//! absent keys leave the corresponding half of the model unconfigured.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Serialized form of a [`crate::risk::RiskModel`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskModelConfig {
    /// Coefficient kind tag: `uniform`, `linear` or `custom`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coeff_kind: Option<String>,
    /// Base coefficient vector for the `custom` coefficient kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coeff_vector: Option<Vec<f64>>,
    /// Discount kind tag: `sigmoid` or `custom`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_kind: Option<String>,
    /// Discount parameter vector: `(scale, shift)` for `sigmoid`,
    /// a per-day lookup table for `custom`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_vector: Option<Vec<f64>>,
}

impl RiskModelConfig {
    /// Load a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save the configuration to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
