//! Shared models
//!
//! - `Span`: source location of statements and findings
//! - `cfg`: per-function control-flow graph with structured statements

pub mod cfg;
mod span;

pub use cfg::{
    BasicBlock, BlockId, ComparisonOp, Condition, Expr, Function, Statement, Terminator, VarId,
};
pub use span::Span;
