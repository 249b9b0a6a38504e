//! Bounds Analysis Application Layer - Use Cases & Services
//!
//! Orchestrates CFG ordering, dataflow propagation, access classification and
//! reporting for one function, and runs many functions in parallel.
//!
//! ## Hexagonal Architecture
//! - **Application**: Orchestrates domain and ports (this module)
//! - **Domain**: Symbolic values, allocations, findings
//! - **Ports**: `AccessCheckerPort`, `FindingSinkPort`
//! - **Infrastructure**: Port implementations and the propagator

use super::domain::{AllocationRecord, ClassifiedAccess, Finding};
use super::infrastructure::{
    sort_findings, to_json, BoundsChecker, CfgOrder, DataflowPropagator, FindingReporter,
    FindingSummary,
};
use super::ports::{AccessCheckerPort, FindingSinkPort};
use crate::config::{BoundsConfig, Validatable};
use crate::errors::{AnalysisError, Result};
use crate::shared::models::{BlockId, Function};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// Per-function propagation statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    /// Blocks in the function
    pub blocks: usize,

    /// Blocks reached with a feasible path from the entry
    pub reached_blocks: usize,

    /// Block transfers until the fixed point
    pub iterations: usize,

    /// Blocks where the iteration cap forced variables to unknown
    pub widened_blocks: Vec<BlockId>,
}

/// Result for one function
#[derive(Debug, Clone, Serialize)]
pub struct FunctionReport {
    pub function: String,

    /// Reported findings in source order
    pub findings: Vec<Finding>,

    /// Allocations seen in reached blocks
    pub allocations: Vec<AllocationRecord>,

    /// Verdict counts, including unreported ones
    pub summary: FindingSummary,

    pub stats: AnalysisStats,
}

/// Result for a set of functions
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProgramReport {
    /// Per-function reports in input order
    pub functions: Vec<FunctionReport>,

    /// All findings, by source position then function order
    pub findings: Vec<Finding>,

    pub summary: FindingSummary,
}

impl ProgramReport {
    fn from_functions(functions: Vec<FunctionReport>) -> Self {
        let mut summary = FindingSummary::default();
        let mut findings = Vec::new();
        for report in &functions {
            summary.merge(&report.summary);
            findings.extend(report.findings.iter().cloned());
        }
        sort_findings(&mut findings);

        Self {
            functions,
            findings,
            summary,
        }
    }

    /// Structured finding list as JSON
    pub fn findings_json(&self) -> Result<String> {
        to_json(&self.findings)
    }

    /// Whole report as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Bounds Analysis Service - Main Application Service
///
/// ## Example
/// ```rust,ignore
/// use heapbounds_ir::{BoundsAnalysisService, BoundsConfig};
///
/// let service = BoundsAnalysisService::new(BoundsConfig::default())?;
/// let report = service.analyze_program(&functions)?;
/// for finding in &report.findings {
///     println!("{}", finding);
/// }
/// ```
pub struct BoundsAnalysisService {
    /// Configuration
    config: BoundsConfig,

    /// Access classifier
    checker: Box<dyn AccessCheckerPort>,

    /// Dedicated pool when `parallel.worker_threads > 0`
    pool: Option<rayon::ThreadPool>,
}

impl BoundsAnalysisService {
    /// Create a service with the default `BoundsChecker`. Fails on an
    /// invalid configuration.
    pub fn new(config: BoundsConfig) -> Result<Self> {
        config.validate()?;

        let pool = if config.parallel.enabled && config.parallel.worker_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.parallel.worker_threads)
                .build()
                .map_err(|e| AnalysisError::ThreadPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            checker: Box::new(BoundsChecker::new(config.straddle_policy)),
            config,
            pool,
        })
    }

    /// Replace the access classifier (builder pattern)
    pub fn with_checker(mut self, checker: Box<dyn AccessCheckerPort>) -> Self {
        self.checker = checker;
        self
    }

    pub fn config(&self) -> &BoundsConfig {
        &self.config
    }

    /// Threads used for program analysis
    pub fn worker_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None if self.config.parallel.enabled => num_cpus::get(),
            None => 1,
        }
    }

    /// Validate the CFG, propagate, classify and report one function.
    ///
    /// Only structural CFG problems are errors; unmodeled code degrades to
    /// unknown values.
    pub fn analyze_function(&self, function: &Function) -> Result<FunctionReport> {
        let order = CfgOrder::build(function)?;
        let propagator = DataflowPropagator::new(function, &order, &self.config);
        let result = propagator.run();

        let stats = AnalysisStats {
            blocks: order.block_count(),
            reached_blocks: result.entry_states.len(),
            iterations: result.iterations,
            widened_blocks: result.widened_blocks,
        };

        let mut reporter = FindingReporter::from_config(&self.config);
        for event in result.accesses {
            let verdict = self.checker.classify(&event);
            reporter.accept(ClassifiedAccess { event, verdict });
        }
        let findings = reporter.finish();
        let summary = reporter.summary();

        debug!(
            function = %function.name,
            checker = self.checker.name(),
            findings = findings.len(),
            %summary,
            "function analyzed"
        );

        Ok(FunctionReport {
            function: function.name.clone(),
            findings,
            allocations: result.allocations,
            summary,
            stats,
        })
    }

    /// Analyze functions independently. Reports keep the input order whether
    /// or not the work ran in parallel; the first CFG error aborts.
    pub fn analyze_program(&self, functions: &[Function]) -> Result<ProgramReport> {
        let parallel = self.config.parallel.enabled
            && functions.len() >= self.config.parallel.min_functions.max(1);

        let reports: Vec<FunctionReport> = if parallel {
            let run = || {
                functions
                    .par_iter()
                    .map(|f| self.analyze_function(f))
                    .collect::<Result<Vec<_>>>()
            };
            match &self.pool {
                Some(pool) => pool.install(run)?,
                None => run()?,
            }
        } else {
            functions
                .iter()
                .map(|f| self.analyze_function(f))
                .collect::<Result<Vec<_>>>()?
        };

        let report = ProgramReport::from_functions(reports);
        info!(
            functions = functions.len(),
            parallel,
            threads = if parallel { self.worker_threads() } else { 1 },
            findings = report.findings.len(),
            summary = %report.summary,
            "program analyzed"
        );
        Ok(report)
    }
}
