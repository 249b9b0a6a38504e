//! Analysis presets
//!
//! | preset   | fixpoint cap | branch narrowing | parallel |
//! |----------|--------------|------------------|----------|
//! | fast     | 16           | off              | no       |
//! | balanced | 64           | on               | yes      |
//! | thorough | 256          | on               | yes      |
//! | custom   | 64           | on               | yes      |

use super::error::ConfigError;
use crate::shared::constants::fixpoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CI gate: bounded work per function
    Fast,

    #[default]
    Balanced,

    /// Loops with long constant trip counts still converge without widening
    Thorough,

    /// Balanced defaults, meant to be overridden field by field
    Custom,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Fast, Preset::Balanced, Preset::Thorough, Preset::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
            Self::Custom => "custom",
        }
    }

    /// Per-block entry-state changes before widening
    pub fn max_fixpoint_iterations(&self) -> usize {
        match self {
            Self::Fast => fixpoint::FAST_MAX_ITERATIONS,
            Self::Balanced | Self::Custom => fixpoint::DEFAULT_MAX_ITERATIONS,
            Self::Thorough => fixpoint::THOROUGH_MAX_ITERATIONS,
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    /// Case-insensitive preset name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
