//! Configuration errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Numeric field outside its accepted range
    #[error("{field} = {value} is outside {min}..={max} ({hint})")]
    OutOfRange {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
        hint: &'static str,
    },

    /// Field value rejected for a non-numeric reason
    #[error("{config}.{field}: {reason}")]
    InvalidField {
        config: &'static str,
        field: String,
        reason: String,
    },

    #[error("config schema version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("unknown preset '{0}' (expected fast, balanced, thorough or custom)")]
    UnknownPreset(String),

    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub fn out_of_range(
        field: &'static str,
        value: usize,
        range: std::ops::RangeInclusive<usize>,
        hint: &'static str,
    ) -> Self {
        Self::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
            hint,
        }
    }
}
