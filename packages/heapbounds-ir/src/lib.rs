/*
 * Heapbounds IR - Heap Buffer Index Bounds Analysis
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Function IR (CFG, statements, expressions), Span, constants
 * - features/    : bounds_analysis (domain → ports → infrastructure → application)
 * - config/      : Presets, builders, YAML schema v1
 * - errors       : Crate error type
 *
 * Performance:
 * - Functions are independent: Rayon work-stealing over functions
 * - Per-function worklist in reverse post-order
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Transfer helpers take the full block context
#![allow(clippy::derivable_impls)] // Manual impl for documentation
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and constants
pub mod shared;

/// Feature modules (vertical slices)
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// Re-exports for convenience
pub use config::{BoundsConfig, ConfigError, ParallelConfig, Preset};
pub use errors::{AnalysisError, Result};
pub use features::bounds_analysis::{
    AnalysisStats, BoundsAnalysisService, Finding, FunctionReport, ProgramReport,
    StraddlePolicy, SymbolicValue, Verdict,
};
pub use shared::models::{
    BasicBlock, ComparisonOp, Condition, Expr, Function, Span, Statement, Terminator,
};
