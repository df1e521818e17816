//! Concurrent job submission with a bound on parallelism.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Semaphore, watch};
use tokio::task::JoinHandle;

use super::{CancelToken, JobFailure, JobOutcome, JobState, ParseJob, SourceHandle};
use crate::config::ParseConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job#{}", self.0)
    }
}

/// Handle to a submitted job. Dropping it does not cancel the job.
pub struct JobHandle {
    id: JobId,
    source_name: String,
    cancel: CancelToken,
    state: watch::Receiver<JobState>,
    task: JoinHandle<JobOutcome>,
}

impl JobHandle {
    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Request cancellation. Idempotent; has no effect on a job that already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Latest published state.
    pub fn state(&self) -> JobState {
        *self.state.borrow()
    }

    /// A receiver that can be awaited for state changes.
    pub fn watch_state(&self) -> watch::Receiver<JobState> {
        self.state.clone()
    }

    /// Wait for the terminal outcome.
    pub async fn wait(self) -> JobOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => JobOutcome::Cancelled,
            Err(e) => JobOutcome::Failed(JobFailure::Aborted(e.to_string())),
        }
    }
}

impl fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobHandle")
            .field("id", &self.id)
            .field("source", &self.source_name)
            .field("state", &self.state())
            .finish()
    }
}

/// Runs parse jobs on the current tokio runtime, at most `max_parallel_jobs` at a time.
///
/// ## Notes
/// - Must be used from within a tokio runtime; `submit` spawns.
/// - A job waiting for a permit still observes cancellation: it finishes `Cancelled` without reading its source.
pub struct Supervisor {
    config: Arc<ParseConfig>,
    permits: Arc<Semaphore>,
    next_id: AtomicU64,
}

impl Supervisor {
    pub fn new(config: ParseConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_parallel_jobs.max(1)));
        Self {
            config: Arc::new(config),
            permits,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Start a job for `source`.
    #[tracing::instrument(skip_all, fields(source = %source))]
    pub fn submit(&self, source: SourceHandle) -> JobHandle {
        let id = JobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let source_name = source.name();
        let job = ParseJob::new(source, Arc::clone(&self.config));
        let cancel = job.cancel_token();
        let state = job.subscribe();
        let permits = Arc::clone(&self.permits);

        tracing::debug!(%id, "submitting job");
        let task = tokio::spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => return JobOutcome::Failed(JobFailure::Aborted(e.to_string())),
            };
            match tokio::task::spawn_blocking(move || job.run()).await {
                Ok(outcome) => outcome,
                Err(e) => JobOutcome::Failed(JobFailure::Aborted(e.to_string())),
            }
        });

        JobHandle {
            id,
            source_name,
            cancel,
            state,
            task,
        }
    }

    /// Request cancellation of a submitted job. Same as [`JobHandle::cancel`].
    pub fn cancel(&self, handle: &JobHandle) {
        tracing::debug!(id = %handle.id, "cancel requested");
        handle.cancel();
    }

    /// Wait for a submitted job. Same as [`JobHandle::wait`].
    pub async fn wait(&self, handle: JobHandle) -> JobOutcome {
        handle.wait().await
    }

    /// Submit every source and wait for all of them. Outcomes are returned in submission order.
    pub async fn run_all<I>(&self, sources: I) -> Vec<(String, JobOutcome)>
    where
        I: IntoIterator<Item = SourceHandle>,
    {
        let handles: Vec<JobHandle> = sources.into_iter().map(|s| self.submit(s)).collect();
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            let name = handle.source_name.clone();
            outcomes.push((name, handle.wait().await));
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_unique() {
        let supervisor = Supervisor::new(ParseConfig::default());
        let a = supervisor.submit(SourceHandle::inline("a", "int a;"));
        let b = supervisor.submit(SourceHandle::inline("b", "int b;"));
        assert_ne!(a.id(), b.id());
        assert!(a.wait().await.is_clean());
        assert!(b.wait().await.is_clean());
    }

    #[tokio::test]
    async fn test_queued_job_observes_cancel() {
        let supervisor = Supervisor::new(ParseConfig::default().with_max_parallel_jobs(1));
        let held = Arc::clone(&supervisor.permits).acquire_owned().await.unwrap();
        let handle = supervisor.submit(SourceHandle::inline("queued", "int x;"));
        supervisor.cancel(&handle);
        drop(held);
        assert!(matches!(supervisor.wait(handle).await, JobOutcome::Cancelled));
    }
}
