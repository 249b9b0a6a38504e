//! Error types for heapbounds-ir
//!
//! Provides unified error handling across the crate.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for analysis operations
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The function's control-flow graph is malformed
    #[error("Invalid CFG: {0}")]
    InvalidCfg(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Report serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Worker pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl AnalysisError {
    /// Create an invalid CFG error
    pub fn invalid_cfg(msg: impl Into<String>) -> Self {
        AnalysisError::InvalidCfg(msg.into())
    }
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
