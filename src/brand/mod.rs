//! Brand configuration table
//!
//! A brand file is a JSON object keyed by brand identifier:
//!
//! ```json
//! {
//!   "contoso": {
//!     "name": "Contoso Grill",
//!     "tone": "warm",
//!     "style": "casual",
//!     "key_phrases": ["Welcome back!"],
//!     "values": ["quality"]
//!   }
//! }
//! ```
//!
//! Keys keep the order they appear in the file.

use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub mod registry;

/// Textual attributes of a single brand
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    /// Display name (e.g., "Contoso Grill")
    pub name: String,

    /// Voice of the brand
    pub tone: String,

    /// Conversational style
    pub style: String,

    /// Phrases the agent should work into responses
    pub key_phrases: Vec<String>,

    /// Brand values
    pub values: Vec<String>,
}

/// Brand key -> config, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandTable {
    brands: IndexMap<String, BrandConfig>,
}

impl BrandTable {
    /// Load a table, substituting an empty one on any failure
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(table) => {
                log::info!("Loaded {} brand config(s) from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                log::error!("Error loading brand configs: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load a table, reporting why it could not be read
    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read brand file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse brand file: {}", path.display()))
    }

    /// Parse a table from JSON text
    pub fn parse(content: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(content)?;
        Ok(table)
    }

    pub fn get(&self, key: &str) -> Option<&BrandConfig> {
        self.brands.get(key)
    }

    /// Iterate brands in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BrandConfig)> {
        self.brands.iter().map(|(key, config)| (key.as_str(), config))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.brands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}

impl FromIterator<(String, BrandConfig)> for BrandTable {
    fn from_iter<I: IntoIterator<Item = (String, BrandConfig)>>(iter: I) -> Self {
        Self {
            brands: iter.into_iter().collect(),
        }
    }
}
