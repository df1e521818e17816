//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::IsTerminal;
use std::path::PathBuf;

use miette::{NamedSource, Report};

use crate::config::ParseConfig;
use crate::jobs::{JobFailure, JobOutcome, JobState, SourceHandle, Supervisor};
use kestrel_syntax::diagnostics::{self, CompileError};
use kestrel_syntax::{lexer, parser};

use super::{CliError, CliResult, ExitCode};

/// Read a source file through the same size-checked path the parse jobs use.
pub fn read_source(file_path: &str, limit: u64) -> CliResult<String> {
    SourceHandle::Path(PathBuf::from(file_path))
        .read(limit)
        .map_err(|failure| CliError::failure(format!("Error: {}", failure)))
}

/// Render diagnostics for one file.
///
/// Uses miette's graphical output when stderr is a terminal and `plain` is not set, and
/// [`diagnostics::format_error`] otherwise.
pub fn render_diagnostics(file_name: &str, source: &str, errors: &[CompileError], plain: bool) -> String {
    let fancy = !plain && std::io::stderr().is_terminal();
    let mut msg = String::new();
    for err in errors {
        if fancy {
            let report = Report::new(err.clone()).with_source_code(NamedSource::new(file_name, source.to_owned()));
            msg.push_str(&format!("{report:?}\n"));
        } else {
            msg.push_str(&diagnostics::format_error(file_name, source, err));
        }
    }
    msg
}

/// Tokenize and print tokens.
pub fn lex_file(file_path: &str, config: &ParseConfig, plain: bool) -> CliResult<ExitCode> {
    let source = read_source(file_path, config.max_source_bytes)?;
    let tokens = lexer::lex(&source)
        .map_err(|errs| CliError::failure(render_diagnostics(file_path, &source, &errs, plain).trim_end()))?;

    for tok in &tokens {
        println!("{:?}", tok);
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse and display the tree. Parse diagnostics are collected, not fail-fast.
pub fn parse_file(file_path: &str, config: &ParseConfig, plain: bool) -> CliResult<ExitCode> {
    let source = read_source(file_path, config.max_source_bytes)?;
    let tokens = lexer::lex(&source)
        .map_err(|errs| CliError::failure(render_diagnostics(file_path, &source, &errs, plain).trim_end()))?;

    match parser::parse(&tokens) {
        Ok(unit) => {
            println!("{:#?}", unit);
            Ok(ExitCode::SUCCESS)
        }
        Err(errs) => Err(CliError::failure(
            render_diagnostics(file_path, &source, &errs, plain).trim_end(),
        )),
    }
}

/// Run one job per file and report every outcome.
///
/// Ctrl-C cancels all outstanding jobs; the command then exits with [`ExitCode::CANCELLED`].
pub fn check_files(files: Vec<PathBuf>, config: ParseConfig, plain: bool) -> CliResult<ExitCode> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("Error starting runtime: {}", e)))?;

    let outcomes = runtime.block_on(async move {
        let supervisor = Supervisor::new(config);
        let handles: Vec<_> = files.into_iter().map(|f| supervisor.submit(SourceHandle::Path(f))).collect();

        let tokens: Vec<_> = handles.iter().map(|h| h.cancel_token()).collect();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!(jobs = tokens.len(), "interrupted, cancelling outstanding jobs");
                tokens.iter().for_each(|t| t.cancel());
            }
        });

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            let name = handle.source_name().to_string();
            outcomes.push((name, handle.wait().await));
        }
        interrupt.abort();
        outcomes
    });

    Ok(report(&outcomes, plain))
}

/// Print every outcome to stderr and pick the exit code.
fn report(outcomes: &[(String, JobOutcome)], plain: bool) -> ExitCode {
    let mut failed = false;
    let mut cancelled = false;

    for (name, outcome) in outcomes {
        if let JobOutcome::Completed { unit, .. } = outcome {
            tracing::debug!(file = %name, members = unit.members.len(), "checked");
        }
        match outcome.state() {
            JobState::Cancelled => cancelled = true,
            JobState::Failed => failed = true,
            _ => failed |= !outcome.diagnostics().is_empty(),
        }
        if let Some(text) = render_outcome(name, outcome, plain) {
            eprint!("{}", text);
        }
    }

    if cancelled {
        ExitCode::CANCELLED
    } else if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// What the user sees for one outcome; `None` for a clean run.
///
/// Diagnostics are rendered against the text the job parsed, never a fresh read of the file.
fn render_outcome(name: &str, outcome: &JobOutcome, plain: bool) -> Option<String> {
    match outcome {
        JobOutcome::Cancelled => Some(format!("{}: cancelled\n", name)),
        JobOutcome::Failed(failure @ (JobFailure::Io { .. } | JobFailure::TooLarge { .. } | JobFailure::Aborted(_))) => {
            Some(format!("error: {}\n", failure))
        }
        _ => match outcome.text() {
            Some(text) if !outcome.diagnostics().is_empty() => {
                Some(render_diagnostics(name, text, outcome.diagnostics(), plain))
            }
            _ => None,
        },
    }
}
