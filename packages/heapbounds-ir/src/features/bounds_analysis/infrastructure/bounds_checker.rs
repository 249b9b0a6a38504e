//! Bounds Checker
//!
//! Classifies one access `buf[I]` against the tracked size `S`:
//!
//! ```text
//!   S ∈ [Smin, Smax],  I ∈ [Imin, Imax]
//!
//!   InBounds      Imin ≥ 0  ∧  Imax ≤ Smin − 1     valid for every feasible size
//!   OutOfBounds   Imax < 0  ∨  Imin > Smax − 1     invalid for every feasible size
//!   otherwise     straddling → StraddlePolicy
//! ```
//!
//! Untracked pointers, unknown sizes and unknown indices are always
//! `Indeterminate`.

use crate::features::bounds_analysis::domain::{
    AccessEvent, Bound, StraddlePolicy, SymbolicValue, Verdict,
};
use crate::features::bounds_analysis::ports::AccessCheckerPort;

/// Interval bounds checker
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsChecker {
    policy: StraddlePolicy,
}

impl BoundsChecker {
    pub fn new(policy: StraddlePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> StraddlePolicy {
        self.policy
    }

    /// Verdict for index `index` into a buffer of `size`
    pub fn classify_index(&self, size: SymbolicValue, index: SymbolicValue) -> Verdict {
        let (Some((size_min, size_max)), Some((index_min, index_max))) =
            (size.bounds(), index.bounds())
        else {
            return Verdict::Indeterminate;
        };

        let zero = Bound::Finite(0);
        let last_always_valid = size_min.predecessor();
        let last_ever_valid = size_max.predecessor();

        if index_min >= zero && index_max <= last_always_valid {
            return Verdict::InBounds;
        }
        if index_max < zero || index_min > last_ever_valid {
            return Verdict::OutOfBounds;
        }

        match self.policy {
            StraddlePolicy::Indeterminate => Verdict::Indeterminate,
            StraddlePolicy::ReportMayOverflow
                if index_max > last_ever_valid || index_min < zero =>
            {
                Verdict::OutOfBounds
            }
            StraddlePolicy::ReportMayOverflow => Verdict::Indeterminate,
        }
    }
}

impl AccessCheckerPort for BoundsChecker {
    fn classify(&self, event: &AccessEvent) -> Verdict {
        match event.buffer_size() {
            Some(size) => self.classify_index(size, event.index),
            None => Verdict::Indeterminate,
        }
    }

    fn name(&self) -> &'static str {
        "BoundsChecker"
    }
}
