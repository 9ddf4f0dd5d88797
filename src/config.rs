use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::brand::registry::{DEFAULT_BRAND_ENV, DEFAULT_BRAND_KEY};

/// Main brandkit configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub brands: BrandsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BrandsConfig {
    /// Brand table JSON file
    pub path: PathBuf,
    /// Environment variable naming the initial brand
    pub env_var: String,
    /// Initial brand when the environment variable is unset
    pub default_key: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

impl Default for BrandsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("brand_configs.json"),
            env_var: DEFAULT_BRAND_ENV.to_string(),
            default_key: DEFAULT_BRAND_KEY.to_string(),
        }
    }
}

impl BrandsConfig {
    /// Brand file path with ~ and env vars expanded
    pub fn resolved_path(&self) -> PathBuf {
        Config::expand_path(&self.path)
    }

    /// Initial brand key from the configured env var, else the default key
    pub fn initial_brand(&self) -> String {
        std::env::var(&self.env_var).unwrap_or_else(|_| self.default_key.clone())
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        if let Ok(env_path) = std::env::var("BRANDKIT_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from BRANDKIT_CONFIG: {}", e);
                    }
                }
            }
        }

        if let Ok(dir) = std::env::var("BRANDKIT_DIR") {
            let path = PathBuf::from(dir).join("brandkit.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from BRANDKIT_DIR: {}", e);
                    }
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("brandkit").join("brandkit.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        let local_config = PathBuf::from("brandkit.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Directory for brandkit state (logs)
    pub fn brandkit_dir() -> PathBuf {
        std::env::var("BRANDKIT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("brandkit"))
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    /// Look up a dotted config key for `config get`
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "log_level" | "log-level" => Some(self.log_level.as_filter().to_string()),
            "brands.path" => Some(self.brands.path.display().to_string()),
            "brands.env_var" => Some(self.brands.env_var.clone()),
            "brands.default_key" => Some(self.brands.default_key.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.brands.path, PathBuf::from("brand_configs.json"));
        assert_eq!(config.brands.env_var, "RESTAURANT_BRAND");
        assert_eq!(config.brands.default_key, "contoso");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("brands:\n  path: /srv/brands.json\n").unwrap();
        assert_eq!(config.brands.path, PathBuf::from("/srv/brands.json"));
        assert_eq!(config.brands.default_key, "contoso");
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("brandkit.yaml");
        fs::write(&path, "log_level: debug\nbrands:\n  default_key: fabrikam\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.brands.default_key, "fabrikam");
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("missing.yaml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_initial_brand_falls_back_to_default_key() {
        let brands = BrandsConfig {
            env_var: "BRANDKIT_TEST_UNSET_BRAND_VAR".to_string(),
            default_key: "fabrikam".to_string(),
            ..Default::default()
        };
        assert_eq!(brands.initial_brand(), "fabrikam");
    }

    #[test]
    fn test_initial_brand_from_env() {
        // SAFETY: Test runs single-threaded, env var is test-specific
        unsafe {
            std::env::set_var("BRANDKIT_TEST_BRAND", "northwind");
        }
        let brands = BrandsConfig {
            env_var: "BRANDKIT_TEST_BRAND".to_string(),
            ..Default::default()
        };
        assert_eq!(brands.initial_brand(), "northwind");
        unsafe {
            std::env::remove_var("BRANDKIT_TEST_BRAND");
        }
    }

    #[test]
    fn test_expand_path_no_expansion() {
        let path = PathBuf::from("/usr/local/share/brands.json");
        assert_eq!(Config::expand_path(&path), path);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(&PathBuf::from("~/brands.json"));
        assert!(!expanded.to_string_lossy().contains('~'));
        assert!(expanded.to_string_lossy().ends_with("brands.json"));
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let config = Config::default();
        assert_eq!(config.get("log-level").as_deref(), Some("info"));
        assert_eq!(config.get("brands.env_var").as_deref(), Some("RESTAURANT_BRAND"));
        assert!(config.get("brands.color").is_none());
    }
}
