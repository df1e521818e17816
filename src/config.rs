//! Parse configuration shared (read-only) by every job of a supervisor.
//!
//! ## Notes
//! - Values come from CLI flags; there is no configuration file.
//! - A [`ParseConfig`] is wrapped in an `Arc` once a supervisor owns it and is never mutated afterwards.

pub use kestrel_syntax::parser::DiagnosticPolicy;

/// Largest source file a job will read (100 MB).
pub const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Default cap on diagnostics kept per job.
pub const DEFAULT_MAX_DIAGNOSTICS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    /// Stop at the first diagnostic, or collect them and keep going.
    pub policy: DiagnosticPolicy,
    /// Diagnostics kept per job; `0` keeps all. Dropped diagnostics are counted in a note on the last one kept.
    pub max_diagnostics: usize,
    /// Jobs allowed to run at once. Always at least 1.
    pub max_parallel_jobs: usize,
    /// Sources larger than this fail with [`crate::jobs::JobFailure::TooLarge`].
    pub max_source_bytes: u64,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            policy: DiagnosticPolicy::FailFast,
            max_diagnostics: DEFAULT_MAX_DIAGNOSTICS,
            max_parallel_jobs: std::thread::available_parallelism().map_or(4, usize::from),
            max_source_bytes: MAX_SOURCE_SIZE,
        }
    }
}

impl ParseConfig {
    pub fn with_policy(mut self, policy: DiagnosticPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_diagnostics(mut self, max: usize) -> Self {
        self.max_diagnostics = max;
        self
    }

    pub fn with_max_parallel_jobs(mut self, jobs: usize) -> Self {
        self.max_parallel_jobs = jobs.max(1);
        self
    }

    pub fn with_max_source_bytes(mut self, bytes: u64) -> Self {
        self.max_source_bytes = bytes;
        self
    }
}
