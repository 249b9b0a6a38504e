//! Access events, verdicts and findings

use super::allocation::PointerValue;
use super::symbolic_value::SymbolicValue;
use crate::shared::models::{Span, VarId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One `base[index]` expression, evaluated under the state at its program point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEvent {
    /// Function the access belongs to
    pub function: String,
    pub base: VarId,
    /// Resolved base pointer, `None` when `base` holds no pointer
    pub pointer: Option<PointerValue>,
    pub index: SymbolicValue,
    pub span: Span,
}

impl AccessEvent {
    /// Tracked buffer size, `None` when the base is not a tracked buffer
    pub fn buffer_size(&self) -> Option<SymbolicValue> {
        self.pointer.as_ref().and_then(PointerValue::size)
    }
}

/// Classification of one access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Every feasible index is valid for every feasible size
    InBounds,
    /// Every feasible index is invalid for every feasible size
    OutOfBounds,
    /// Size or index not determined, or the index range straddles the bound
    Indeterminate,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::InBounds => write!(f, "in-bounds"),
            Verdict::OutOfBounds => write!(f, "out-of-bounds"),
            Verdict::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// Access event paired with its verdict, before reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedAccess {
    pub event: AccessEvent,
    pub verdict: Verdict,
}

/// Reportable finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub verdict: Verdict,
    pub span: Span,
    pub function: String,
    pub base: VarId,
    /// Index value the verdict was computed from
    pub index: SymbolicValue,
    /// Buffer size the verdict was computed from
    pub size: SymbolicValue,
}

impl Finding {
    pub fn line(&self) -> u32 {
        self.span.start_line
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}[{}] against size {} in `{}`",
            self.span, self.verdict, self.base, self.index, self.size, self.function
        )
    }
}
