//! A single parse job: read, lex, parse and check one compilation unit.

use std::sync::Arc;

use kestrel_syntax::checks::check_unit;
use kestrel_syntax::diagnostics::CompileError;
use kestrel_syntax::lexer::{lex, lex_fail_fast};
use kestrel_syntax::parser::{Interrupt, ParseOutcome, Parser};
use tokio::sync::watch;

use super::{CancelToken, JobFailure, JobOutcome, JobState, SourceHandle};
use crate::config::{DiagnosticPolicy, ParseConfig};

/// One compilation unit's worth of front-end work.
///
/// `run` is synchronous and blocks on file I/O; the [`super::Supervisor`] runs it on tokio's blocking pool.
/// State changes are published on a `watch` channel so observers never touch the job itself.
pub struct ParseJob {
    source: SourceHandle,
    config: Arc<ParseConfig>,
    cancel: CancelToken,
    interrupt: Option<Arc<dyn Interrupt + Send>>,
    state: watch::Sender<JobState>,
}

impl ParseJob {
    pub fn new(source: SourceHandle, config: Arc<ParseConfig>) -> Self {
        let (state, _) = watch::channel(JobState::Idle);
        Self {
            source,
            config,
            cancel: CancelToken::new(),
            interrupt: None,
            state,
        }
    }

    /// Use an existing token instead of a fresh one.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// An extra stop signal (a deadline, a "source changed" flag) polled wherever the cancel token is.
    pub fn with_interrupt(mut self, interrupt: Arc<dyn Interrupt + Send>) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn source(&self) -> &SourceHandle {
        &self.source
    }

    /// Watch the job's state. The receiver sees `Idle` until `run` starts.
    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.state.subscribe()
    }

    /// Run the job to a terminal outcome.
    ///
    /// Cancellation is observed before reading, after reading, between top-level productions and before the
    /// semantic checks. A cancelled job never reports diagnostics.
    #[tracing::instrument(skip_all, fields(source = %self.source, policy = ?self.config.policy))]
    pub fn run(self) -> JobOutcome {
        let outcome = self.execute();
        tracing::debug!(state = %outcome.state(), diagnostics = outcome.diagnostics().len(), "job finished");
        self.state.send_replace(outcome.state());
        outcome
    }

    fn execute(&self) -> JobOutcome {
        if self.is_interrupted() {
            return JobOutcome::Cancelled;
        }
        self.state.send_replace(JobState::Running);

        let text: Arc<str> = match self.source.read(self.config.max_source_bytes) {
            Ok(text) => Arc::from(text),
            Err(failure) => return JobOutcome::Failed(failure),
        };
        if self.is_interrupted() {
            return JobOutcome::Cancelled;
        }

        let policy = self.config.policy;
        let lexed = match policy {
            DiagnosticPolicy::FailFast => lex_fail_fast(&text).map_err(|e| vec![e]),
            DiagnosticPolicy::Accumulate => lex(&text),
        };
        let tokens = match lexed {
            Ok(tokens) => tokens,
            Err(errors) => return self.failed(errors, text),
        };

        let parsed = Parser::new(&tokens)
            .with_policy(policy)
            .with_interrupt(self)
            .parse();
        let (unit, mut diagnostics) = match parsed {
            ParseOutcome::Complete { unit, diagnostics } => (unit, diagnostics),
            ParseOutcome::Failed(e) => return self.failed(vec![e], text),
            ParseOutcome::Interrupted => return JobOutcome::Cancelled,
        };
        if self.is_interrupted() {
            return JobOutcome::Cancelled;
        }

        let checked = check_unit(&unit, policy);
        match policy {
            DiagnosticPolicy::FailFast if !checked.is_empty() => return self.failed(checked, text),
            _ => diagnostics.extend(checked),
        }

        diagnostics.sort_by_key(|d| d.span.start);
        JobOutcome::Completed {
            unit,
            diagnostics: self.cap(diagnostics),
            text,
        }
    }

    fn failed(&self, errors: Vec<CompileError>, text: Arc<str>) -> JobOutcome {
        JobOutcome::Failed(JobFailure::Compile {
            errors: self.cap(errors),
            text,
        })
    }

    /// Keep at most `max_diagnostics`, noting how many were dropped on the last one kept.
    fn cap(&self, mut errors: Vec<CompileError>) -> Vec<CompileError> {
        let max = self.config.max_diagnostics;
        if max == 0 || errors.len() <= max {
            return errors;
        }
        let dropped = errors.len() - max;
        errors.truncate(max);
        if let Some(last) = errors.pop() {
            errors.push(last.with_note(format!("{dropped} more diagnostic(s) not shown")));
        }
        errors
    }
}

impl Interrupt for ParseJob {
    fn is_interrupted(&self) -> bool {
        self.cancel.is_cancelled() || self.interrupt.as_ref().is_some_and(|i| i.is_interrupted())
    }
}
