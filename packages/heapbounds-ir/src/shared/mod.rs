//! Shared module - Common types used across features
//!
//! The function IR consumed by the analysis, source spans and tuning
//! constants. No analysis logic lives here.

pub mod constants;
pub mod models;

// Re-exports for convenience
pub use models::*;
