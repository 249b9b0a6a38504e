//! Bounds Analysis Ports - Interface Layer (Hexagonal Architecture)
//!
//! The application service classifies accesses and collects findings through
//! these traits; `infrastructure` provides the default adapters
//! (`BoundsChecker`, `FindingReporter`).
//!
//! ## Usage
//! ```rust,ignore
//! use heapbounds_ir::features::bounds_analysis::ports::{AccessCheckerPort, FindingSinkPort};
//!
//! fn check<C: AccessCheckerPort, S: FindingSinkPort>(checker: &C, sink: &mut S, events: Vec<AccessEvent>) {
//!     for event in events {
//!         let verdict = checker.classify(&event);
//!         sink.accept(ClassifiedAccess { event, verdict });
//!     }
//! }
//! ```

use super::domain::{AccessEvent, ClassifiedAccess, Finding, Verdict};

// ═══════════════════════════════════════════════════════════════════════════
// Primary Ports
// ═══════════════════════════════════════════════════════════════════════════

/// Access Checker Port - decides one access
///
/// # Implementors
/// - `BoundsChecker`
pub trait AccessCheckerPort: Send + Sync {
    /// Verdict for a single access event
    fn classify(&self, event: &AccessEvent) -> Verdict;

    /// Checker name for debugging and logging
    fn name(&self) -> &'static str;
}

// ═══════════════════════════════════════════════════════════════════════════
// Secondary Ports
// ═══════════════════════════════════════════════════════════════════════════

/// Finding Sink Port - turns classified accesses into reportable findings
///
/// # Implementors
/// - `FindingReporter`
pub trait FindingSinkPort: Send {
    /// Accept one classified access. Sinks decide which verdicts are kept.
    fn accept(&mut self, access: ClassifiedAccess);

    /// Drain the kept findings in report order
    fn finish(&mut self) -> Vec<Finding>;
}
