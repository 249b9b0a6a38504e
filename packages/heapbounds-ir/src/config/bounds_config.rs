//! Bounds analysis configuration
//!
//! Every field has a preset-derived default, so YAML overrides only need to
//! name the fields they change.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::Validatable;
use crate::features::bounds_analysis::domain::StraddlePolicy;
use crate::shared::constants::{fixpoint, thread_pool};
use serde::{Deserialize, Serialize};

// ============================================================================
// Parallel Configuration
// ============================================================================

/// Parallel analysis over functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Analyze functions on the rayon pool
    pub enabled: bool,

    /// Dedicated pool size (0 = global rayon pool) (0..=1024)
    pub worker_threads: usize,

    /// Below this many functions the analysis stays sequential
    pub min_functions: usize,
}

impl ParallelConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                enabled: false,
                worker_threads: 0,
                min_functions: 1,
            },
            Preset::Balanced | Preset::Thorough | Preset::Custom => Self {
                enabled: true,
                worker_threads: 0,
                min_functions: 2,
            },
        }
    }

    /// Builder: Set enabled
    pub fn enabled(mut self, v: bool) -> Self {
        self.enabled = v;
        self
    }

    /// Builder: Set worker_threads
    pub fn worker_threads(mut self, v: usize) -> Self {
        self.worker_threads = v;
        self
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl Validatable for ParallelConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.worker_threads > thread_pool::MAX_WORKER_THREADS {
            return Err(ConfigError::out_of_range(
                "parallel.worker_threads",
                self.worker_threads,
                0..=thread_pool::MAX_WORKER_THREADS,
                "0 runs on the global rayon pool",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "ParallelConfig"
    }
}

// ============================================================================
// Bounds Analysis Configuration
// ============================================================================

/// Heap buffer bounds analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    /// Entry-state changes allowed per block before the variables that keep
    /// changing are forced to Unknown (1..=10000)
    pub max_fixpoint_iterations: usize,

    /// Classification of index ranges that straddle the buffer bound
    pub straddle_policy: StraddlePolicy,

    /// Also emit `InBounds` findings (test and debug tooling)
    pub report_in_bounds: bool,

    /// Narrow `x <op> c` on branch edges
    pub branch_narrowing: bool,

    /// Callee names treated as heap allocators
    pub allocators: Vec<String>,

    pub parallel: ParallelConfig,
}

impl BoundsConfig {
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            max_fixpoint_iterations: preset.max_fixpoint_iterations(),
            straddle_policy: StraddlePolicy::Indeterminate,
            report_in_bounds: false,
            branch_narrowing: preset != Preset::Fast,
            allocators: default_allocators(),
            parallel: ParallelConfig::from_preset(preset),
        }
    }

    /// Builder: Set max_fixpoint_iterations
    pub fn max_fixpoint_iterations(mut self, v: usize) -> Self {
        self.max_fixpoint_iterations = v;
        self
    }

    /// Builder: Set straddle_policy
    pub fn straddle_policy(mut self, v: StraddlePolicy) -> Self {
        self.straddle_policy = v;
        self
    }

    /// Builder: Set report_in_bounds
    pub fn report_in_bounds(mut self, v: bool) -> Self {
        self.report_in_bounds = v;
        self
    }

    /// Builder: Set branch_narrowing
    pub fn branch_narrowing(mut self, v: bool) -> Self {
        self.branch_narrowing = v;
        self
    }

    /// Builder: Set parallel
    pub fn parallel(mut self, v: ParallelConfig) -> Self {
        self.parallel = v;
        self
    }

    /// Builder: add an allocator callee name
    pub fn allocator(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.allocators.contains(&name) {
            self.allocators.push(name);
        }
        self
    }

    pub fn is_allocator(&self, callee: &str) -> bool {
        self.allocators.iter().any(|a| a == callee)
    }
}

fn default_allocators() -> Vec<String> {
    ["malloc", "calloc", "realloc", "aligned_alloc"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

impl Validatable for BoundsConfig {
    fn validate(&self) -> ConfigResult<()> {
        let iterations = 1..=fixpoint::MAX_ITERATIONS_LIMIT;
        if !iterations.contains(&self.max_fixpoint_iterations) {
            return Err(ConfigError::out_of_range(
                "max_fixpoint_iterations",
                self.max_fixpoint_iterations,
                iterations,
                "a block needs at least one change to reach its fixed point",
            ));
        }

        if let Some(empty) = self.allocators.iter().position(|a| a.trim().is_empty()) {
            return Err(ConfigError::InvalidField {
                config: self.config_name(),
                field: format!("allocators[{}]", empty),
                reason: "allocator names must be callee names like 'malloc'".to_string(),
            });
        }

        self.parallel.validate()
    }

    fn config_name(&self) -> &'static str {
        "BoundsConfig"
    }
}
