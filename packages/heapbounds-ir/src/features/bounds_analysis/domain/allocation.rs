//! Allocation records and pointer values
//!
//! A pointer produced by an allocator call is bound to a `PointerValue::Buffer`
//! carrying the size observed at the allocation site. The size is a snapshot:
//! later writes to the variable that fed the allocator do not resize the
//! buffer.
//!
//! ```text
//! size = 100;
//! buf  = malloc(size);   ← buf ↦ Buffer { sites: {entry#1}, size: 100 }
//! size = 300;            ← buf unchanged
//! q    = buf;            ← q ↦ same binding
//! buf  = get_buffer();   ← buf ↦ Untracked
//! ```

use super::symbolic_value::SymbolicValue;
use crate::shared::models::{BlockId, Span, VarId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Program point of an allocation call
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AllocationSite {
    pub block: BlockId,
    /// Statement index inside the block
    pub statement: usize,
    pub span: Span,
}

impl AllocationSite {
    pub fn new(block: impl Into<BlockId>, statement: usize, span: Span) -> Self {
        Self {
            block: block.into(),
            statement,
            span,
        }
    }
}

impl fmt::Display for AllocationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.block, self.statement, self.span)
    }
}

/// Size observed for one allocation site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub site: AllocationSite,
    /// Pointer variable the allocation was bound to
    pub pointer: VarId,
    /// Requested size (`Unknown` for opaque sizes)
    pub size: SymbolicValue,
}

impl AllocationRecord {
    /// Accesses against an unknown-size record are never classified
    pub fn is_size_known(&self) -> bool {
        !self.size.is_unknown()
    }
}

/// What a pointer variable refers to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerValue {
    /// Heap buffer from one of `sites`, with `size` covering all of them
    Buffer {
        sites: BTreeSet<AllocationSite>,
        size: SymbolicValue,
    },
    /// Pointer from a non-tracked source
    Untracked,
}

impl PointerValue {
    pub fn buffer(site: AllocationSite, size: SymbolicValue) -> Self {
        let mut sites = BTreeSet::new();
        sites.insert(site);
        PointerValue::Buffer { sites, size }
    }

    /// Tracked size, `None` for untracked pointers
    pub fn size(&self) -> Option<SymbolicValue> {
        match self {
            PointerValue::Buffer { size, .. } => Some(*size),
            PointerValue::Untracked => None,
        }
    }

    pub fn join(&self, other: &PointerValue) -> PointerValue {
        match (self, other) {
            (
                PointerValue::Buffer { sites: s1, size: z1 },
                PointerValue::Buffer { sites: s2, size: z2 },
            ) => PointerValue::Buffer {
                sites: s1.union(s2).cloned().collect(),
                size: z1.join(z2),
            },
            _ => PointerValue::Untracked,
        }
    }
}

/// Value bound to a variable in a `VariableState`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbstractValue {
    Scalar(SymbolicValue),
    Pointer(PointerValue),
}

impl AbstractValue {
    /// Top of the combined lattice
    pub fn top() -> Self {
        AbstractValue::Scalar(SymbolicValue::Unknown)
    }

    /// Top element of the same kind (scalar stays scalar, pointer stays pointer)
    pub fn widened(&self) -> Self {
        match self {
            AbstractValue::Scalar(_) => AbstractValue::Scalar(SymbolicValue::Unknown),
            AbstractValue::Pointer(_) => AbstractValue::Pointer(PointerValue::Untracked),
        }
    }

    /// Integer view: pointers have no integer value
    pub fn as_scalar(&self) -> SymbolicValue {
        match self {
            AbstractValue::Scalar(v) => *v,
            AbstractValue::Pointer(_) => SymbolicValue::Unknown,
        }
    }

    pub fn as_pointer(&self) -> Option<&PointerValue> {
        match self {
            AbstractValue::Pointer(p) => Some(p),
            AbstractValue::Scalar(_) => None,
        }
    }

    /// Pointwise join. Mixing a scalar with a pointer is top.
    pub fn join(&self, other: &AbstractValue) -> AbstractValue {
        match (self, other) {
            (AbstractValue::Scalar(a), AbstractValue::Scalar(b)) => AbstractValue::Scalar(a.join(b)),
            (AbstractValue::Pointer(a), AbstractValue::Pointer(b)) => {
                AbstractValue::Pointer(a.join(b))
            }
            _ => AbstractValue::top(),
        }
    }
}

impl fmt::Display for AbstractValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractValue::Scalar(v) => write!(f, "{}", v),
            AbstractValue::Pointer(PointerValue::Buffer { size, .. }) => {
                write!(f, "buffer(size={})", size)
            }
            AbstractValue::Pointer(PointerValue::Untracked) => write!(f, "pointer(?)"),
        }
    }
}
