//! Dataflow Propagator
//!
//! Forward worklist analysis (Kildall) over one function's CFG.
//!
//! ```text
//! 1. worklist = reachable blocks in reverse post-order
//! 2. pop the block with the lowest RPO position
//!      in  = ⊔ edge(pred, out[pred])       for reached preds
//!      in  = in[block] ⊔ in                 (monotone accumulation)
//!      if in unchanged: skip
//!      if block is a loop header and changes(block) > cap:
//!          widen the variables that changed
//!      out = transfer(block, in)
//!      if out changed: push successors
//! 3. replay every reached block once from its fixed-point entry state,
//!    emitting access events and allocation records
//! ```
//!
//! `edge(pred, out)` narrows the branch variable on conditional edges and
//! drops edges whose condition cannot hold.

use super::allocation_tracker::{pointer_source, AllocationTracker, SizeArgs};
use super::cfg_order::{CfgOrder, EdgeKind};
use crate::config::BoundsConfig;
use crate::features::bounds_analysis::domain::{
    AbstractValue, AccessEvent, AllocationRecord, AllocationSite, Bound, SymbolicValue,
    VariableState,
};
use crate::shared::models::{
    BasicBlock, BlockId, ComparisonOp, Expr, Function, Span, Statement, Terminator,
};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

/// Fixed-point states and the events observed under them
#[derive(Debug, Clone, Default)]
pub struct DataflowResult {
    /// Entry state per reached block
    pub entry_states: FxHashMap<BlockId, VariableState>,

    /// Exit state per reached block (before edge narrowing)
    pub exit_states: FxHashMap<BlockId, VariableState>,

    /// Block transfers performed before the fixed point
    pub iterations: usize,

    /// Loop headers whose changing variables were forced to top, in the
    /// order the cap was first hit
    pub widened_blocks: Vec<BlockId>,

    /// Allocations in reached blocks, in RPO / statement order
    pub allocations: Vec<AllocationRecord>,

    /// Accesses in reached blocks, in RPO / statement order
    pub accesses: Vec<AccessEvent>,
}

impl DataflowResult {
    pub fn entry_state(&self, block: &str) -> Option<&VariableState> {
        self.entry_states.get(block)
    }

    pub fn exit_state(&self, block: &str) -> Option<&VariableState> {
        self.exit_states.get(block)
    }

    /// Reached with at least one feasible incoming edge
    pub fn is_reached(&self, block: &str) -> bool {
        self.entry_states.contains_key(block)
    }
}

/// Forward propagator for one function
pub struct DataflowPropagator<'a> {
    function: &'a Function,
    order: &'a CfgOrder,
    config: &'a BoundsConfig,
}

impl<'a> DataflowPropagator<'a> {
    pub fn new(function: &'a Function, order: &'a CfgOrder, config: &'a BoundsConfig) -> Self {
        Self {
            function,
            order,
            config,
        }
    }

    /// Run to the fixed point, then replay once to collect events
    pub fn run(&self) -> DataflowResult {
        let rpo = self.order.reverse_post_order();
        let cap = self.config.max_fixpoint_iterations;

        let mut entry_states: FxHashMap<BlockId, VariableState> = FxHashMap::default();
        let mut exit_states: FxHashMap<BlockId, VariableState> = FxHashMap::default();
        let mut changes: FxHashMap<BlockId, usize> = FxHashMap::default();
        let mut widened_blocks: Vec<BlockId> = Vec::new();
        let mut worklist: BTreeSet<usize> = (0..rpo.len()).collect();
        let mut iterations = 0;

        debug!(
            function = %self.function.name,
            blocks = rpo.len(),
            "propagating"
        );

        while let Some(position) = worklist.pop_first() {
            let block_id = &rpo[position];
            let Some(block) = self.block(block_id) else {
                continue;
            };
            let Some(incoming) = self.incoming_state(block_id, &exit_states) else {
                // No feasible incoming edge yet
                continue;
            };

            let entry = match entry_states.get(block_id) {
                None => incoming,
                Some(old) => {
                    let mut joined = old.join(&incoming);
                    if &joined == old {
                        continue;
                    }

                    // Only loop headers count toward the cap
                    if self.order.is_loop_header(block_id) {
                        let count = changes.entry(block_id.clone()).or_insert(0);
                        *count += 1;
                        if *count > cap {
                            let changed = old.changed_variables(&joined);
                            warn!(
                                function = %self.function.name,
                                block = %block_id,
                                cap,
                                variables = ?changed,
                                "iteration cap reached, forcing variables to unknown"
                            );
                            joined.widen(&changed);
                            if !widened_blocks.contains(block_id) {
                                widened_blocks.push(block_id.clone());
                            }
                        }
                    }
                    joined
                }
            };

            iterations += 1;
            let exit = self.transfer_block(block, &entry, &mut AllocationTracker::new(), None);
            trace!(block = %block_id, entry = %entry, exit = %exit, "transfer");
            entry_states.insert(block_id.clone(), entry);

            if exit_states.get(block_id) != Some(&exit) {
                exit_states.insert(block_id.clone(), exit);
                for succ in self.order.successors(block_id) {
                    if let Some(p) = self.order.rpo_position(succ) {
                        worklist.insert(p);
                    }
                }
            }
        }

        // Replay under the fixed point
        let mut tracker = AllocationTracker::new();
        let mut accesses = Vec::new();
        for block_id in rpo {
            if let (Some(block), Some(entry)) = (self.block(block_id), entry_states.get(block_id)) {
                self.transfer_block(block, entry, &mut tracker, Some(&mut accesses));
            }
        }

        debug!(
            function = %self.function.name,
            iterations,
            reached = entry_states.len(),
            accesses = accesses.len(),
            widened = widened_blocks.len(),
            "fixed point reached"
        );

        DataflowResult {
            entry_states,
            exit_states,
            iterations,
            widened_blocks,
            allocations: tracker.into_records(),
            accesses,
        }
    }

    /// One more propagation step over `result` leaves every state unchanged
    pub fn is_stable(&self, result: &DataflowResult) -> bool {
        for block_id in self.order.reverse_post_order() {
            let (Some(block), Some(entry)) = (self.block(block_id), result.entry_states.get(block_id))
            else {
                continue;
            };

            if let Some(incoming) = self.incoming_state(block_id, &result.exit_states) {
                if &entry.join(&incoming) != entry {
                    return false;
                }
            }

            let exit = self.transfer_block(block, entry, &mut AllocationTracker::new(), None);
            if result.exit_states.get(block_id) != Some(&exit) {
                return false;
            }
        }
        true
    }

    /// Integer value of `expr` under `state`
    pub fn evaluate(&self, expr: &Expr, state: &VariableState) -> SymbolicValue {
        match expr {
            Expr::Const { value } => SymbolicValue::constant(*value),
            Expr::Var { name } => state.scalar(name),
            Expr::Add { lhs, rhs } => self.evaluate(lhs, state).add(&self.evaluate(rhs, state)),
            Expr::Sub { lhs, rhs } => self
                .evaluate(lhs, state)
                .subtract(&self.evaluate(rhs, state)),
            Expr::Select { then, otherwise } => self
                .evaluate(then, state)
                .join(&self.evaluate(otherwise, state)),
            Expr::Call { callee, .. } => {
                trace!(callee = %callee, "opaque call");
                SymbolicValue::Unknown
            }
            Expr::Unmodeled { text } => {
                trace!(expr = %text, "unmodeled expression");
                SymbolicValue::Unknown
            }
        }
    }

    /// Value of `expr` including pointers (variable reads, selects)
    fn evaluate_value(&self, expr: &Expr, state: &VariableState) -> AbstractValue {
        match expr {
            Expr::Var { name } => state.get(name).cloned().unwrap_or_else(AbstractValue::top),
            Expr::Select { then, otherwise } => self
                .evaluate_value(then, state)
                .join(&self.evaluate_value(otherwise, state)),
            _ => AbstractValue::Scalar(self.evaluate(expr, state)),
        }
    }

    fn transfer_block(
        &self,
        block: &BasicBlock,
        entry: &VariableState,
        tracker: &mut AllocationTracker,
        mut events: Option<&mut Vec<AccessEvent>>,
    ) -> VariableState {
        let mut state = entry.clone();

        for (idx, statement) in block.statements.iter().enumerate() {
            match statement {
                Statement::Assign {
                    target,
                    value,
                    span,
                } => self.assign(&mut state, tracker, block, idx, target, value, *span),
                Statement::Access { base, index, span } => {
                    if let Some(events) = events.as_deref_mut() {
                        events.push(AccessEvent {
                            function: self.function.name.clone(),
                            base: base.clone(),
                            pointer: state.pointer(base).cloned(),
                            index: self.evaluate(index, &state),
                            span: *span,
                        });
                    }
                }
                // Side effects of bare calls are not modeled
                Statement::Eval { .. } => {}
            }
        }

        state
    }

    fn assign(
        &self,
        state: &mut VariableState,
        tracker: &mut AllocationTracker,
        block: &BasicBlock,
        idx: usize,
        target: &str,
        value: &Expr,
        span: Span,
    ) {
        if let Expr::Call { callee, args } = value {
            if self.config.is_allocator(callee) {
                let args: Vec<SymbolicValue> =
                    args.iter().map(|arg| self.evaluate(arg, state)).collect();
                let size = SizeArgs::for_callee(callee).size(&args);
                let site = AllocationSite::new(block.id.clone(), idx, span);
                tracker.record_allocation(state, target, size, site);
                return;
            }
        }

        if let Some(source) = pointer_source(value, state) {
            tracker.bind_pointer_copy(state, target, source);
            return;
        }

        match self.evaluate_value(value, state) {
            pointer @ AbstractValue::Pointer(_) => state.bind(target, pointer),
            AbstractValue::Scalar(_) if state.pointer(target).is_some() => {
                tracker.invalidate(state, target)
            }
            AbstractValue::Scalar(v) => state.bind_scalar(target, v),
        }
    }

    /// Join of the feasible incoming edge states. `None` when no feasible
    /// edge comes from a reached predecessor (and the block is not the entry).
    fn incoming_state(
        &self,
        block_id: &str,
        exit_states: &FxHashMap<BlockId, VariableState>,
    ) -> Option<VariableState> {
        let mut acc = (block_id == self.function.entry).then(VariableState::new);

        for (pred, kind) in self.order.incoming(block_id) {
            let (Some(exit), Some(pred_block)) = (exit_states.get(pred), self.block(pred)) else {
                continue;
            };
            if let Some(edge) = self.edge_state(pred_block, kind, exit) {
                acc = Some(match acc {
                    Some(state) => state.join(&edge),
                    None => edge,
                });
            }
        }

        acc
    }

    /// State carried along one edge; `None` when the edge is infeasible
    fn edge_state(
        &self,
        pred: &BasicBlock,
        kind: EdgeKind,
        exit: &VariableState,
    ) -> Option<VariableState> {
        if !self.config.branch_narrowing {
            return Some(exit.clone());
        }
        let Terminator::Branch {
            condition: Some(condition),
            ..
        } = &pred.terminator
        else {
            return Some(exit.clone());
        };

        let op = match kind {
            EdgeKind::TrueBranch => condition.op,
            EdgeKind::FalseBranch => condition.op.negate(),
            EdgeKind::Jump => return Some(exit.clone()),
        };
        let value = self.evaluate(&condition.value, exit);
        narrow(exit, &condition.var, op, value)
    }

    fn block(&self, id: &str) -> Option<&'a BasicBlock> {
        self.order
            .slot(id)
            .and_then(|slot| self.function.blocks.get(slot))
    }
}

/// Restrict scalar `var` to the values satisfying `var <op> value`.
///
/// Returns `None` when no value can satisfy the comparison. Unknown values
/// (on either side) and pointers are left unchanged.
pub fn narrow(
    state: &VariableState,
    var: &str,
    op: ComparisonOp,
    value: SymbolicValue,
) -> Option<VariableState> {
    let Some(AbstractValue::Scalar(current)) = state.get(var) else {
        return Some(state.clone());
    };
    let Some((lo, hi)) = value.bounds() else {
        return Some(state.clone());
    };
    if current.is_unknown() {
        return Some(state.clone());
    }

    let constraint = match op {
        ComparisonOp::Lt => {
            // x < i64::MIN
            let upper = hi.predecessor();
            if upper == Bound::NegInf {
                return None;
            }
            SymbolicValue::range(Bound::NegInf, upper)
        }
        ComparisonOp::Le => SymbolicValue::range(Bound::NegInf, hi),
        ComparisonOp::Gt => {
            // x > i64::MAX
            let lower = lo.checked_add(Bound::Finite(1)).unwrap_or(lo);
            if lower == Bound::PosInf {
                return None;
            }
            SymbolicValue::range(lower, Bound::PosInf)
        }
        ComparisonOp::Ge => SymbolicValue::range(lo, Bound::PosInf),
        ComparisonOp::Eq => Some(value),
        ComparisonOp::Neq => {
            // Only `c != c` is decidable on intervals
            return match (current.as_constant(), value.as_constant()) {
                (Some(a), Some(b)) if a == b => None,
                _ => Some(state.clone()),
            };
        }
    };
    let Some(constraint) = constraint else {
        return Some(state.clone());
    };

    let narrowed = current.meet(&constraint)?;
    let mut state = state.clone();
    state.bind_scalar(var, narrowed);
    Some(state)
}
