//! Bounds Analysis Domain - value objects shared by every layer
//!
//! - `SymbolicValue` : integer abstraction (constant / range / unknown)
//! - `AllocationRecord`, `PointerValue` : heap buffers and their sizes
//! - `VariableState` : variable → value at one program point
//! - `AccessEvent`, `Verdict`, `Finding` : classification output

pub mod allocation;
pub mod finding;
pub mod symbolic_value;
pub mod variable_state;

pub use allocation::{AbstractValue, AllocationRecord, AllocationSite, PointerValue};
pub use finding::{AccessEvent, ClassifiedAccess, Finding, Verdict};
pub use symbolic_value::{Bound, SymbolicValue};
pub use variable_state::VariableState;

use serde::{Deserialize, Serialize};

/// How to classify an index range that is partly valid and partly invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StraddlePolicy {
    /// Straddling ranges are `Indeterminate` (never reported)
    #[default]
    Indeterminate,
    /// Straddling ranges are `OutOfBounds` when some feasible index is
    /// negative or exceeds the largest feasible size
    ReportMayOverflow,
}

impl StraddlePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indeterminate => "indeterminate",
            Self::ReportMayOverflow => "report_may_overflow",
        }
    }
}
