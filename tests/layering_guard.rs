//! Layering guardrails: the syntax crates stay synchronous and free of driver concerns.
//!
//! `kestrel_syntax` and `kestrel_core` must not pull in the async runtime, the CLI parser or a logging
//! subscriber; those belong to the root `kestrel` crate. This test scans their `[dependencies]` tables.

const DRIVER_ONLY: &[&str] = &["tokio", "clap", "tracing-subscriber"];

fn dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }
        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn syntax_crates_do_not_depend_on_driver_crates() {
    let manifests = [
        ("kestrel_syntax", include_str!("../crates/kestrel_syntax/Cargo.toml")),
        ("kestrel_core", include_str!("../crates/kestrel_core/Cargo.toml")),
    ];
    for (crate_name, manifest) in manifests {
        for dep in dependencies(manifest) {
            assert!(
                !DRIVER_ONLY.contains(&dep.as_str()),
                "`{dep}` must not appear in {crate_name} [dependencies]; it belongs to the root crate"
            );
        }
    }
}

#[test]
fn core_has_no_dependencies() {
    assert!(dependencies(include_str!("../crates/kestrel_core/Cargo.toml")).is_empty());
}
