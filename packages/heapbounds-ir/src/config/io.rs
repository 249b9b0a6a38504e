//! Configuration I/O (YAML)
//!
//! ```yaml
//! version: 1
//! preset: balanced
//! overrides:
//!   max_fixpoint_iterations: 128
//!   straddle_policy: report_may_overflow
//! ```

use super::bounds_config::BoundsConfig;
use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current schema version
pub const CONFIG_VERSION: u32 = 1;

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: u32,

    /// Base preset
    pub preset: String,

    /// Field overrides on top of the preset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<serde_yaml::Value>,
}

impl BoundsConfig {
    /// Parse a v1 YAML document. Fields missing from `overrides` keep the
    /// preset's values.
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        if export.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: export.version,
                supported: CONFIG_VERSION,
            });
        }

        let preset: Preset = export.preset.parse()?;

        let config = match export.overrides {
            Some(overrides) => merge_overrides(BoundsConfig::from_preset(preset), overrides)?,
            None => BoundsConfig::from_preset(preset),
        };

        config.validate()?;
        Ok(config)
    }

    /// Load a v1 YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Serialize as a v1 document (preset `custom`, every field explicit)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: CONFIG_VERSION,
            preset: Preset::Custom.to_string(),
            overrides: Some(serde_yaml::to_value(self)?),
        };
        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}

/// Overlay `overrides` onto the serialized base config, field by field
fn merge_overrides(base: BoundsConfig, overrides: serde_yaml::Value) -> ConfigResult<BoundsConfig> {
    let mut merged = serde_yaml::to_value(&base)?;
    overlay(&mut merged, overrides);
    Ok(serde_yaml::from_value(merged)?)
}

fn overlay(target: &mut serde_yaml::Value, patch: serde_yaml::Value) {
    match (target, patch) {
        (serde_yaml::Value::Mapping(target), serde_yaml::Value::Mapping(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) => overlay(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}
