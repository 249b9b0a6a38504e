//! Bounds Analysis Infrastructure - Port Implementations
//!
//! - `cfg_order`: block graph + reverse post-order (petgraph)
//! - `allocation_tracker`: allocator calls → tracked buffers
//! - `dataflow_propagator`: worklist fixed point over the CFG
//! - `bounds_checker`: `AccessCheckerPort` adapter
//! - `finding_reporter`: `FindingSinkPort` adapter

pub mod allocation_tracker;
pub mod bounds_checker;
pub mod cfg_order;
pub mod dataflow_propagator;
pub mod finding_reporter;

pub use allocation_tracker::{AllocationTracker, SizeArgs};
pub use bounds_checker::BoundsChecker;
pub use cfg_order::{CfgOrder, EdgeKind};
pub use dataflow_propagator::{narrow, DataflowPropagator, DataflowResult};
pub use finding_reporter::{sort_findings, to_json, FindingReporter, FindingSummary};
