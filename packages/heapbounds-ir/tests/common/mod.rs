//! Common test utilities for heapbounds-ir
//!
//! Annotated fixture parsing and IR builders shared by the integration
//! tests.

#![allow(dead_code)]

mod annotations;
mod builders;

// Re-export all utilities
pub use annotations::*;
pub use builders::*;
