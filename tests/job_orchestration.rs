//! Integration tests for parse-job orchestration: submit, cancel, wait.

use std::path::PathBuf;
use std::sync::Arc;

use kestrel::ast::{Member, TypeNode};
use kestrel::config::{DiagnosticPolicy, ParseConfig};
use kestrel::jobs::{JobFailure, JobOutcome, JobState, ParseJob, SourceHandle, Supervisor};
use kestrel::parser::Interrupt;

fn accumulate() -> ParseConfig {
    ParseConfig::default().with_policy(DiagnosticPolicy::Accumulate)
}

fn field_names(outcome: &JobOutcome) -> Vec<String> {
    outcome
        .unit()
        .map(|unit| {
            unit.members
                .iter()
                .filter_map(|m| match &m.node {
                    Member::Field(f) => Some(f.name.node.clone()),
                    Member::Method(_) => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn unreadable_source_fails_with_io_error() {
    let supervisor = Supervisor::new(ParseConfig::default());
    let handle = supervisor.submit(SourceHandle::Path(PathBuf::from("/no/such/dir/Missing.kst")));
    let mut state = handle.watch_state();

    match handle.wait().await {
        JobOutcome::Failed(JobFailure::Io { source_name, error }) => {
            assert_eq!(source_name, "/no/such/dir/Missing.kst");
            assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected I/O failure, got {other:?}"),
    }
    assert_eq!(*state.borrow_and_update(), JobState::Failed);
}

#[tokio::test]
async fn concurrent_jobs_are_independent() {
    let supervisor = Supervisor::new(accumulate().with_max_parallel_jobs(2));
    let first = supervisor.submit(SourceHandle::inline("first.kst", "package a;\nint alpha;\nint alpha;"));
    let second = supervisor.submit(SourceHandle::inline("second.kst", "package b;\nString beta = \"b\";"));

    let (first, second) = tokio::join!(first.wait(), second.wait());

    assert_eq!(field_names(&first), vec!["alpha", "alpha"]);
    assert_eq!(first.diagnostics().len(), 1);
    assert_eq!(first.diagnostics()[0].message, "Duplicate field 'alpha'");

    assert!(second.is_clean());
    assert_eq!(field_names(&second), vec!["beta"]);
    let package = second.unit().and_then(|u| u.package.as_ref()).map(|p| p.node.to_string());
    assert_eq!(package.as_deref(), Some("b"));
}

#[tokio::test]
async fn run_all_preserves_submission_order() {
    let supervisor = Supervisor::new(ParseConfig::default().with_max_parallel_jobs(1));
    let sources = (0..5).map(|i| SourceHandle::inline(format!("unit{i}.kst"), format!("int f{i};")));
    let outcomes = supervisor.run_all(sources).await;

    let names: Vec<&str> = outcomes.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["unit0.kst", "unit1.kst", "unit2.kst", "unit3.kst", "unit4.kst"]);
    for (i, (_, outcome)) in outcomes.iter().enumerate() {
        assert_eq!(field_names(outcome), vec![format!("f{i}")]);
    }
}

#[tokio::test]
async fn cancel_is_idempotent_and_wins_before_start() {
    let job = ParseJob::new(SourceHandle::inline("c.kst", "int x;"), Arc::new(ParseConfig::default()));
    let token = job.cancel_token();
    token.cancel();
    token.cancel();
    assert!(token.is_interrupted());

    let outcome = tokio::task::spawn_blocking(move || job.run()).await.unwrap();
    assert!(matches!(outcome, JobOutcome::Cancelled));
    assert!(outcome.diagnostics().is_empty());
}

#[tokio::test]
async fn cancelling_a_finished_job_changes_nothing() {
    let supervisor = Supervisor::new(ParseConfig::default());
    let handle = supervisor.submit(SourceHandle::inline("done.kst", "int x;"));
    let mut state = handle.watch_state();
    state.wait_for(|s| s.is_terminal()).await.unwrap();

    handle.cancel();
    assert!(handle.wait().await.is_clean());
}

#[test]
fn fail_fast_and_accumulate_disagree_on_the_same_source() {
    let source = "int = 1;\nList<int> xs;\nint ok;";

    let fail_fast = ParseJob::new(SourceHandle::inline("p.kst", source), Arc::new(ParseConfig::default())).run();
    match fail_fast {
        JobOutcome::Failed(JobFailure::Compile { errors, .. }) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].as_illegal_token().map(|t| t.expected.as_str()), Some("identifier"));
        }
        other => panic!("expected compile failure, got {other:?}"),
    }

    let accumulated = ParseJob::new(SourceHandle::inline("p.kst", source), Arc::new(accumulate())).run();
    assert_eq!(accumulated.state(), JobState::Completed);
    let expected: Vec<_> = accumulated
        .diagnostics()
        .iter()
        .filter_map(|d| d.as_illegal_token())
        .map(|t| t.expected.clone())
        .collect();
    assert_eq!(expected, vec!["identifier", "reference type"]);
    assert_eq!(field_names(&accumulated), vec!["ok"]);
}

#[test]
fn lexical_errors_are_fatal_under_both_policies() {
    let source = "int # x;\nint @ y;";

    let fail_fast = ParseJob::new(SourceHandle::inline("l.kst", source), Arc::new(ParseConfig::default())).run();
    assert_eq!(fail_fast.diagnostics().len(), 1);
    assert_eq!(fail_fast.state(), JobState::Failed);

    let accumulated = ParseJob::new(SourceHandle::inline("l.kst", source), Arc::new(accumulate())).run();
    assert_eq!(accumulated.diagnostics().len(), 2);
    assert!(accumulated.diagnostics().iter().all(|d| d.is_lexical()));
    assert_eq!(accumulated.state(), JobState::Failed);
}

#[test]
fn parsed_tree_keeps_generic_field_types() {
    let outcome = ParseJob::new(
        SourceHandle::inline("g.kst", "java.util.Map<String, List<Integer>> index;"),
        Arc::new(ParseConfig::default()),
    )
    .run();
    let unit = outcome.unit().unwrap();
    let Member::Field(field) = &unit.members[0].node else {
        panic!("expected field");
    };
    assert!(matches!(field.ty.node, TypeNode::Parameterized(_)));
    assert_eq!(field.ty.node.to_string(), "java.util.Map<String, List<Integer>>");
}

#[test]
fn fixtures_match_their_directory() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    for (dir, expect_clean) in [("valid", true), ("invalid", false)] {
        let mut paths: Vec<_> = std::fs::read_dir(root.join(dir))
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|e| e == "kst"))
            .collect();
        paths.sort();
        assert!(!paths.is_empty(), "no fixtures in {dir}");
        for path in paths {
            let outcome = ParseJob::new(SourceHandle::Path(path.clone()), Arc::new(accumulate())).run();
            assert_eq!(
                outcome.is_clean(),
                expect_clean,
                "{}: {:?}",
                path.display(),
                outcome.diagnostics()
            );
        }
    }
}
