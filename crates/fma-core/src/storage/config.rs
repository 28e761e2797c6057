use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::kernel::error::{Error, Result};
use crate::storage::error::StorageSystemError;
use crate::storage::provider::StorageProvider;

/// Supported configuration and document file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Parse a format name as given on a command line or in settings
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            #[cfg(feature = "toml-config")]
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
    }
}

/// String-keyed bag of values, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigData {
    #[serde(flatten)]
    values: IndexMap<String, serde_json::Value>,
}

impl ConfigData {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a configuration value, `None` when absent or of another shape
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Get a configuration value with default
    pub fn get_or<T: for<'de> Deserialize<'de>>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Raw value of a key
    pub fn value(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Set a configuration value
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| StorageSystemError::SerializationError {
            format: "json".to_string(),
            source: Box::new(e),
        })?;
        self.values.insert(key.to_string(), json_value);
        Ok(())
    }

    /// Remove a configuration value
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.values.shift_remove(key)
    }

    /// Check if key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    /// Merge with another config, overriding existing values
    pub fn merge(&mut self, other: &ConfigData) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Serialize to string based on format
    pub fn serialize(&self, format: ConfigFormat) -> Result<String> {
        let serialized = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(&self).map_err(boxed),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(&self).map_err(boxed),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(&self).map_err(boxed),
        };
        serialized.map_err(|source| {
            StorageSystemError::SerializationError {
                format: format.extension().to_string(),
                source,
            }
            .into()
        })
    }

    /// Deserialize from string based on format
    pub fn deserialize(data: &str, format: ConfigFormat) -> Result<Self> {
        let parsed = match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(boxed),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(boxed),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(boxed),
        };
        parsed.map_err(|source| {
            StorageSystemError::DeserializationError {
                format: format.extension().to_string(),
                source,
            }
            .into()
        })
    }
}

fn boxed<E: std::error::Error + Send + Sync + 'static>(e: E) -> Box<dyn std::error::Error + Send + Sync + 'static> {
    Box::new(e)
}

/// Loads, saves and caches named configuration files under a base directory
#[derive(Debug)]
pub struct ConfigManager<P: StorageProvider + ?Sized> {
    provider: Arc<P>,
    config_path: PathBuf,
    default_format: ConfigFormat,
    cache: RefCell<HashMap<String, ConfigData>>,
}

impl<P: StorageProvider + ?Sized> ConfigManager<P> {
    pub fn new(provider: Arc<P>, config_path: PathBuf, default_format: ConfigFormat) -> Self {
        Self {
            provider,
            config_path,
            default_format,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn default_format(&self) -> ConfigFormat {
        self.default_format
    }

    /// Path of a named configuration; a bare name gets the default extension
    pub fn resolve_config_path(&self, name: &str) -> PathBuf {
        let file_name = if Path::new(name).extension().is_some() {
            name.to_string()
        } else {
            format!("{}.{}", name, self.default_format.extension())
        };
        self.config_path.join(file_name)
    }

    /// Load a configuration; a missing file yields an empty one
    pub fn load_config(&self, name: &str) -> Result<ConfigData> {
        if let Some(config) = self.cache.borrow().get(name) {
            return Ok(config.clone());
        }

        let path = self.resolve_config_path(name);
        let config = if self.provider.exists(&path) {
            let format = ConfigFormat::from_path(&path)
                .ok_or_else(|| StorageSystemError::UnsupportedConfigFormat(path.display().to_string()))?;
            let content = self.provider.read_to_string(&path)?;
            ConfigData::deserialize(&content, format)?
        } else {
            debug!("no configuration at {}, using defaults", path.display());
            ConfigData::new()
        };

        self.cache.borrow_mut().insert(name.to_string(), config.clone());
        Ok(config)
    }

    pub fn save_config(&self, name: &str, config: &ConfigData) -> Result<()> {
        let path = self.resolve_config_path(name);
        let format = ConfigFormat::from_path(&path).unwrap_or(self.default_format);
        let content = config.serialize(format)?;
        self.provider.write_string(&path, &content)?;
        self.cache.borrow_mut().insert(name.to_string(), config.clone());
        Ok(())
    }

    /// Invalidate the cache for a specific configuration
    pub fn invalidate_cache(&self, name: &str) {
        self.cache.borrow_mut().remove(name);
    }

    /// Clear the entire configuration cache
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }
}

/// Load a configuration from an explicit file, format chosen by extension
pub fn load_config_file<P: StorageProvider + ?Sized>(provider: &P, path: &Path) -> Result<ConfigData> {
    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| Error::from(StorageSystemError::UnsupportedConfigFormat(path.display().to_string())))?;
    let content = provider.read_to_string(path)?;
    ConfigData::deserialize(&content, format)
}
