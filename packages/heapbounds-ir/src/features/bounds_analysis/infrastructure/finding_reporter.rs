//! Finding Reporter
//!
//! Keeps `OutOfBounds` (and, on request, `InBounds`) verdicts and orders them
//! by source position. `Indeterminate` verdicts are counted but never
//! reported.

use crate::config::BoundsConfig;
use crate::errors::Result;
use crate::features::bounds_analysis::domain::{ClassifiedAccess, Finding, SymbolicValue, Verdict};
use crate::features::bounds_analysis::ports::FindingSinkPort;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified accesses per verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingSummary {
    pub in_bounds: usize,
    pub out_of_bounds: usize,
    pub indeterminate: usize,
}

impl FindingSummary {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::InBounds => self.in_bounds += 1,
            Verdict::OutOfBounds => self.out_of_bounds += 1,
            Verdict::Indeterminate => self.indeterminate += 1,
        }
    }

    pub fn merge(&mut self, other: &FindingSummary) {
        self.in_bounds += other.in_bounds;
        self.out_of_bounds += other.out_of_bounds;
        self.indeterminate += other.indeterminate;
    }

    pub fn total(&self) -> usize {
        self.in_bounds + self.out_of_bounds + self.indeterminate
    }
}

impl fmt::Display for FindingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} accesses: {} out-of-bounds, {} in-bounds, {} indeterminate",
            self.total(),
            self.out_of_bounds,
            self.in_bounds,
            self.indeterminate
        )
    }
}

/// Finding Reporter
#[derive(Debug, Default)]
pub struct FindingReporter {
    report_in_bounds: bool,
    pending: Vec<Finding>,
    summary: FindingSummary,
}

impl FindingReporter {
    pub fn new(report_in_bounds: bool) -> Self {
        Self {
            report_in_bounds,
            ..Self::default()
        }
    }

    pub fn from_config(config: &BoundsConfig) -> Self {
        Self::new(config.report_in_bounds)
    }

    /// Counts of everything accepted so far, including dropped verdicts
    pub fn summary(&self) -> FindingSummary {
        self.summary
    }

    fn keeps(&self, verdict: Verdict) -> bool {
        match verdict {
            Verdict::OutOfBounds => true,
            Verdict::InBounds => self.report_in_bounds,
            Verdict::Indeterminate => false,
        }
    }
}

impl FindingSinkPort for FindingReporter {
    fn accept(&mut self, access: ClassifiedAccess) {
        self.summary.record(access.verdict);
        if !self.keeps(access.verdict) {
            return;
        }

        let ClassifiedAccess { event, verdict } = access;
        let size = event.buffer_size().unwrap_or(SymbolicValue::Unknown);
        self.pending.push(Finding {
            verdict,
            span: event.span,
            function: event.function,
            base: event.base,
            index: event.index,
            size,
        });
    }

    fn finish(&mut self) -> Vec<Finding> {
        let mut findings = std::mem::take(&mut self.pending);
        sort_findings(&mut findings);
        findings
    }
}

/// Stable sort by source position. Findings at the same position keep their
/// incoming (function) order.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by_key(|finding| (finding.span.start_line, finding.span.start_col));
}

/// Structured finding list as pretty-printed JSON
pub fn to_json(findings: &[Finding]) -> Result<String> {
    Ok(serde_json::to_string_pretty(findings)?)
}
