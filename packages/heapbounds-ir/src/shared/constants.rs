//! Centralized tuning constants
//!
//! Magic numbers used by presets and the analysis service live here.

/// Fixed-point iteration caps
pub mod fixpoint {
    /// Fast preset: loops lose precision quickly
    pub const FAST_MAX_ITERATIONS: usize = 16;

    /// Balanced preset
    pub const DEFAULT_MAX_ITERATIONS: usize = 64;

    /// Thorough preset
    pub const THOROUGH_MAX_ITERATIONS: usize = 256;

    /// Largest cap accepted by validation
    pub const MAX_ITERATIONS_LIMIT: usize = 10_000;
}

/// Thread pool configuration
pub mod thread_pool {
    /// Upper bound accepted for `parallel.worker_threads`
    pub const MAX_WORKER_THREADS: usize = 1024;
}
