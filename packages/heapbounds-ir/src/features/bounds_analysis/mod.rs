//! Bounds Analysis - heap buffer index checking (Hexagonal Architecture)
//!
//! Flags `buf[i]` accesses on heap buffers whose index is provably outside
//! the allocated size.
//!
//! ## Hexagonal Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ Application     BoundsAnalysisService                           │
//! │                   ▲ uses                                        │
//! │ Domain          SymbolicValue, AllocationRecord, VariableState, │
//! │                 AccessEvent, Verdict, Finding                   │
//! │                   ▲ defines                                     │
//! │ Ports           AccessCheckerPort, FindingSinkPort              │
//! │                   ▲ implements                                  │
//! │ Infrastructure  CfgOrder, AllocationTracker, DataflowPropagator,│
//! │                 BoundsChecker, FindingReporter                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! Function ─▶ CfgOrder ─▶ DataflowPropagator ─▶ AccessEvent ─▶ BoundsChecker ─▶ FindingReporter
//!                          (AllocationTracker)
//! ```
//!
//! ## Verdicts
//!
//! | size        | index       | verdict        |
//! |-------------|-------------|----------------|
//! | `100`       | `99`        | InBounds       |
//! | `100`       | `100`       | OutOfBounds    |
//! | `[100,200]` | `[99,299]`  | Indeterminate (straddles; `ReportMayOverflow` → OutOfBounds) |
//! | `⊤`         | any         | Indeterminate  |
//!
//! Indeterminate verdicts are never reported.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{AnalysisStats, BoundsAnalysisService, FunctionReport, ProgramReport};
pub use domain::{
    AbstractValue, AccessEvent, AllocationRecord, AllocationSite, Bound, ClassifiedAccess,
    Finding, PointerValue, StraddlePolicy, SymbolicValue, VariableState, Verdict,
};
pub use infrastructure::{
    AllocationTracker, BoundsChecker, CfgOrder, DataflowPropagator, DataflowResult,
    FindingReporter, FindingSummary,
};
pub use ports::{AccessCheckerPort, FindingSinkPort};
