//! Allocation Tracker
//!
//! Binds pointer variables to the buffers allocated for them and keeps the
//! list of allocation records seen while transferring statements.

use crate::features::bounds_analysis::domain::{
    AbstractValue, AllocationRecord, AllocationSite, PointerValue, SymbolicValue, VariableState,
};
use crate::shared::models::{Expr, VarId};
use tracing::debug;

/// How an allocator call's arguments map to the requested size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeArgs {
    /// `malloc(n)`
    Single(usize),
    /// `calloc(n, m)`: `n * m`
    Product(usize, usize),
}

impl SizeArgs {
    /// Size argument layout for a known allocator name. Custom allocators
    /// take the size as their first argument.
    pub fn for_callee(callee: &str) -> Self {
        match callee {
            "calloc" => SizeArgs::Product(0, 1),
            "realloc" | "aligned_alloc" => SizeArgs::Single(1),
            _ => SizeArgs::Single(0),
        }
    }

    /// Requested size, given the evaluated call arguments. Missing arguments
    /// make the size `Unknown`.
    pub fn size(&self, args: &[SymbolicValue]) -> SymbolicValue {
        match *self {
            SizeArgs::Single(i) => args.get(i).copied().unwrap_or(SymbolicValue::Unknown),
            SizeArgs::Product(i, j) => match (args.get(i), args.get(j)) {
                (Some(n), Some(m)) => n.multiply(m),
                _ => SymbolicValue::Unknown,
            },
        }
    }
}

/// Allocation Tracker
#[derive(Debug, Default)]
pub struct AllocationTracker {
    records: Vec<AllocationRecord>,
}

impl AllocationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `pointer` to a fresh buffer of `size` allocated at `site`.
    ///
    /// Unknown sizes are still recorded; accesses against them are never
    /// classified.
    pub fn record_allocation(
        &mut self,
        state: &mut VariableState,
        pointer: &str,
        size: SymbolicValue,
        site: AllocationSite,
    ) -> AllocationRecord {
        debug!(pointer, %size, site = %site, "allocation");

        state.bind(
            pointer,
            AbstractValue::Pointer(PointerValue::buffer(site.clone(), size)),
        );

        let record = AllocationRecord {
            site,
            pointer: pointer.to_string(),
            size,
        };
        self.records.push(record.clone());
        record
    }

    /// `target = source`: `target` refers to the same buffer(s)
    pub fn bind_pointer_copy(&self, state: &mut VariableState, target: &str, source: &str) {
        let value = match state.pointer(source) {
            Some(pointer) => pointer.clone(),
            None => PointerValue::Untracked,
        };
        state.bind(target, AbstractValue::Pointer(value));
    }

    /// `pointer` was reassigned from a source with no tracked allocation
    pub fn invalidate(&self, state: &mut VariableState, pointer: &str) {
        state.bind(pointer, AbstractValue::Pointer(PointerValue::Untracked));
    }

    /// Records in creation order
    pub fn records(&self) -> &[AllocationRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<AllocationRecord> {
        self.records
    }
}

/// Pointer variable named by `expr` when it is a bare variable read of a
/// pointer in `state`
pub fn pointer_source<'a>(expr: &'a Expr, state: &VariableState) -> Option<&'a VarId> {
    match expr {
        Expr::Var { name } if state.pointer(name).is_some() => Some(name),
        _ => None,
    }
}
