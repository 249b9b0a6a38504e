//! Configuration System
//!
//! Two levels:
//! - Preset: `BoundsConfig::from_preset(Preset::Fast)`
//! - Override: builder setters or a versioned YAML document
//!
//! # Examples
//!
//! ```rust,ignore
//! use heapbounds_ir::config::{BoundsConfig, Preset};
//!
//! let config = BoundsConfig::from_preset(Preset::Thorough)
//!     .straddle_policy(StraddlePolicy::ReportMayOverflow);
//!
//! let config = BoundsConfig::from_yaml("bounds.yaml")?;
//! ```

pub mod bounds_config;
pub mod error;
pub mod io;
pub mod preset;
pub mod validation;

// Re-exports
pub use bounds_config::{BoundsConfig, ParallelConfig};
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigExportV1, CONFIG_VERSION};
pub use preset::Preset;
pub use validation::Validatable;
