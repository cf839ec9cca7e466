//! Configuration loading
//!
//! Settings files may be TOML, JSON or YAML; the format is picked from the
//! file extension. Loaded values are merged over defaults so a file only
//! needs to name the keys it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Load configuration from file (auto-detects format)
pub fn load_config<T>(path: &Path) -> crate::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, &config_format(path))
}

/// Load a partial configuration as a JSON value, keeping only the keys present
fn load_config_value(path: &Path) -> crate::Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, &config_format(path))
}

fn config_format(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn parse_config<T>(content: &str, extension: &str) -> crate::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    match extension {
        "toml" => {
            let toml_value: toml::Value = toml::from_str(content)
                .map_err(|e| crate::UtilError::Config(format!("TOML parse error: {}", e)))?;
            T::deserialize(toml_value)
                .map_err(|e| crate::UtilError::Config(format!("TOML deserialization error: {}", e)))
        }
        "json" => serde_json::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("JSON parse error: {}", e))),
        "yml" | "yaml" => serde_yaml::from_str(content)
            .map_err(|e| crate::UtilError::Config(format!("YAML parse error: {}", e))),
        _ => Err(crate::UtilError::Config(format!(
            "Unsupported config format: {}",
            extension
        ))),
    }
}

/// Merge two JSON values (second overrides first)
fn merge_json_values(base: &mut serde_json::Value, override_value: serde_json::Value) {
    match (base, override_value) {
        (serde_json::Value::Object(base_obj), serde_json::Value::Object(override_obj)) => {
            for (key, value) in override_obj {
                match base_obj.get_mut(&key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_obj.insert(key, value);
                    }
                }
            }
        }
        (base_value, override_value) => {
            *base_value = override_value;
        }
    }
}

/// Merge two configurations (second overrides first)
pub fn merge_configs<T>(base: &mut T, override_config: T) -> crate::Result<()>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let override_value = serde_json::to_value(override_config)
        .map_err(|e| crate::UtilError::Serialization(format!("Override serialization error: {}", e)))?;
    merge_value_into(base, override_value)
}

fn merge_value_into<T>(base: &mut T, override_value: serde_json::Value) -> crate::Result<()>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let mut base_value = serde_json::to_value(&*base)
        .map_err(|e| crate::UtilError::Serialization(format!("Base serialization error: {}", e)))?;

    merge_json_values(&mut base_value, override_value);

    *base = serde_json::from_value(base_value)
        .map_err(|e| crate::UtilError::Serialization(format!("Result deserialization error: {}", e)))?;

    Ok(())
}

/// Configuration builder for fluent API
#[derive(Debug)]
pub struct ConfigBuilder<T> {
    config: T,
}

impl<T> ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    /// Create new config builder with defaults
    pub fn new() -> Self {
        Self {
            config: T::default(),
        }
    }

    /// Load a file and merge the keys it sets over the current values
    pub fn load_file(mut self, path: &Path) -> crate::Result<Self> {
        let file_value = load_config_value(path)?;
        merge_value_into(&mut self.config, file_value)?;
        Ok(self)
    }

    /// Load a file if one was given
    pub fn load_optional_file(self, path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(path) => self.load_file(path),
            None => Ok(self),
        }
    }

    /// Apply an in-code adjustment, typically command-line overrides
    pub fn with(mut self, adjust: impl FnOnce(&mut T)) -> Self {
        adjust(&mut self.config);
        self
    }

    /// Build final config
    pub fn build(self) -> T {
        self.config
    }
}

impl<T> Default for ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    fn default() -> Self {
        Self::new()
    }
}
