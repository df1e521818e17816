//! Parse orchestration: one cancellable job per compilation unit, and a supervisor that runs many.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──run──▶ Running ──▶ Completed
//!   │              ├──────▶ Failed      (I/O failure, or an unrecovered diagnostic)
//!   └──────────────┴──────▶ Cancelled   (observed before start or between top-level productions)
//! ```
//!
//! ## Notes
//! - Jobs share nothing but the read-only [`crate::config::ParseConfig`]. Each owns its tokens, tree and
//!   diagnostics, and hands them out only through its [`JobOutcome`].
//! - Cancellation is cooperative: [`CancelToken::cancel`] sets a flag the job polls at its suspension points.
//!
//! ## Modules
//!
//! - `process` - [`ParseJob`], the unit of work
//! - `supervisor` - [`Supervisor`] and [`JobHandle`]: `submit`, `cancel`, `wait`

mod process;
mod supervisor;

pub use process::ParseJob;
pub use supervisor::{JobHandle, JobId, Supervisor};

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kestrel_syntax::ast::CompilationUnit;
use kestrel_syntax::diagnostics::CompileError;
use kestrel_syntax::parser::Interrupt;

// ============================================================================
// Source handles
// ============================================================================

/// Where a job reads its source from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceHandle {
    Path(PathBuf),
    /// In-memory source; `name` is only used in diagnostics.
    Inline { name: String, text: String },
}

impl SourceHandle {
    pub fn inline(name: impl Into<String>, text: impl Into<String>) -> Self {
        SourceHandle::Inline {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Display name used in diagnostics.
    pub fn name(&self) -> String {
        match self {
            SourceHandle::Path(path) => path.display().to_string(),
            SourceHandle::Inline { name, .. } => name.clone(),
        }
    }

    /// Read the whole source. This is the only blocking operation of a job.
    ///
    /// ## Errors
    /// [`JobFailure::Io`] if the file cannot be accessed or read, [`JobFailure::TooLarge`] if it exceeds
    /// `limit` bytes.
    pub fn read(&self, limit: u64) -> Result<String, JobFailure> {
        match self {
            SourceHandle::Inline { text, .. } => Ok(text.clone()),
            SourceHandle::Path(path) => {
                let io = |error| JobFailure::Io {
                    source_name: self.name(),
                    error,
                };
                let metadata = fs::metadata(path).map_err(io)?;
                if metadata.len() > limit {
                    return Err(JobFailure::TooLarge {
                        source_name: self.name(),
                        size: metadata.len(),
                        limit,
                    });
                }
                fs::read_to_string(path).map_err(io)
            }
        }
    }
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<PathBuf> for SourceHandle {
    fn from(path: PathBuf) -> Self {
        SourceHandle::Path(path)
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.is_interrupted()
    }
}

impl Interrupt for CancelToken {
    fn is_interrupted(&self) -> bool {
        self.is_cancelled()
    }
}

// ============================================================================
// States and outcomes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed | JobState::Cancelled)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Idle => "idle",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Why a job failed.
#[derive(Debug, thiserror::Error)]
pub enum JobFailure {
    #[error("cannot read '{source_name}': {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("source '{source_name}' is too large ({size} bytes, max {limit} bytes)")]
    TooLarge { source_name: String, size: u64, limit: u64 },

    /// Diagnostics that ended the job, in source order, with the text they point into.
    #[error("{} compile error(s)", .errors.len())]
    Compile { errors: Vec<CompileError>, text: Arc<str> },

    /// The worker running the job panicked or was torn down.
    #[error("job aborted: {0}")]
    Aborted(String),
}

/// Terminal result of a job.
#[derive(Debug)]
pub enum JobOutcome {
    /// The unit was parsed. Under accumulate policy `diagnostics` holds everything that was reported.
    /// `text` is the exact source the spans refer to.
    Completed {
        unit: CompilationUnit,
        diagnostics: Vec<CompileError>,
        text: Arc<str>,
    },
    Failed(JobFailure),
    Cancelled,
}

impl JobOutcome {
    pub fn state(&self) -> JobState {
        match self {
            JobOutcome::Completed { .. } => JobState::Completed,
            JobOutcome::Failed(_) => JobState::Failed,
            JobOutcome::Cancelled => JobState::Cancelled,
        }
    }

    /// Every diagnostic carried by the outcome.
    pub fn diagnostics(&self) -> &[CompileError] {
        match self {
            JobOutcome::Completed { diagnostics, .. } => diagnostics,
            JobOutcome::Failed(JobFailure::Compile { errors, .. }) => errors,
            _ => &[],
        }
    }

    /// The source text the job parsed, when it got that far.
    pub fn text(&self) -> Option<&str> {
        match self {
            JobOutcome::Completed { text, .. } | JobOutcome::Failed(JobFailure::Compile { text, .. }) => Some(text),
            _ => None,
        }
    }

    /// Completed with no diagnostics.
    pub fn is_clean(&self) -> bool {
        matches!(self, JobOutcome::Completed { diagnostics, .. } if diagnostics.is_empty())
    }

    pub fn unit(&self) -> Option<&CompilationUnit> {
        match self {
            JobOutcome::Completed { unit, .. } => Some(unit),
            _ => None,
        }
    }
}
