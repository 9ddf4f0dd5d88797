//! Brand registry: the loaded table plus the current brand selection

use std::path::{Path, PathBuf};

use super::{BrandConfig, BrandTable};

/// Environment variable holding the initial brand key
pub const DEFAULT_BRAND_ENV: &str = "RESTAURANT_BRAND";

/// Brand key used when the environment does not name one
pub const DEFAULT_BRAND_KEY: &str = "contoso";

/// Name reported when no known brand is selected
pub const FALLBACK_BRAND_NAME: &str = "Restaurant";

/// Answers brand queries against a table loaded once at startup
#[derive(Debug, Clone)]
pub struct BrandRegistry {
    config_path: PathBuf,
    table: BrandTable,
    current_brand: String,
}

impl BrandRegistry {
    /// Load the table at `path` with `current_brand` selected
    pub fn load_with_brand<P: AsRef<Path>>(path: P, current_brand: impl Into<String>) -> Self {
        let config_path = path.as_ref().to_path_buf();
        let mut registry = Self::new(BrandTable::load(&config_path), current_brand);
        registry.config_path = config_path;
        registry
    }

    /// Build a registry around an already loaded table
    pub fn new(table: BrandTable, current_brand: impl Into<String>) -> Self {
        Self {
            config_path: PathBuf::new(),
            table,
            current_brand: current_brand.into(),
        }
    }

    /// Personality instructions for the current brand, empty when none is selected
    pub fn get_brand_personality(&self) -> String {
        let Some(config) = self.current_config() else {
            return String::new();
        };

        format!(
            "BRAND PERSONALITY FOR {}:\n\
             - Tone: {}\n\
             - Style: {}\n\
             - Key Phrases: {}\n\
             - Values: {}\n\
             \n\
             Apply this personality consistently in all responses while maintaining professionalism.\n",
            config.name,
            config.tone,
            config.style,
            config.key_phrases.join(", "),
            config.values.join(", "),
        )
    }

    pub fn get_brand_name(&self) -> String {
        self.current_config()
            .map(|config| config.name.clone())
            .unwrap_or_else(|| FALLBACK_BRAND_NAME.to_string())
    }

    /// Switch the current brand. The outcome is reported only in the returned text.
    pub fn set_brand(&mut self, brand_key: &str) -> String {
        match self.table.get(brand_key) {
            Some(config) => {
                log::debug!("Current brand: {} -> {}", self.current_brand, brand_key);
                let message = format!("Brand set to {}", config.name);
                self.current_brand = brand_key.to_string();
                message
            }
            None => {
                log::warn!("Brand '{}' not found in {}", brand_key, self.config_path.display());
                format!("Brand '{}' not found in configuration", brand_key)
            }
        }
    }

    pub fn list_brands(&self) -> String {
        if self.is_empty() {
            return "No brand configurations available".to_string();
        }

        let brands: Vec<String> = self
            .table
            .iter()
            .map(|(key, config)| format!("- {}: {}", key, config.name))
            .collect();
        format!("Available brands:\n{}", brands.join("\n"))
    }

    pub fn get_current_brand_key(&self) -> &str {
        &self.current_brand
    }

    /// Config for `brand_key`, or for the current brand when no key is given
    pub fn get_brand_config(&self, brand_key: Option<&str>) -> Option<&BrandConfig> {
        let key = brand_key.filter(|k| !k.is_empty()).unwrap_or(&self.current_brand);
        self.table.get(key)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Brand keys in file order
    pub fn brand_keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn current_config(&self) -> Option<&BrandConfig> {
        if self.current_brand.is_empty() {
            return None;
        }
        self.table.get(&self.current_brand)
    }
}
