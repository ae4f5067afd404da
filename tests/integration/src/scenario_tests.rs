//! End-to-end scenarios driven by YAML rules documents

use assert_fs::prelude::*;
use organize_core::config::Format;
use organize_core::{Executor, Registry, RunReport, parse_document};
use organize_test_utils::TestTree;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::path::Path;

fn run(yaml: &str, simulate: bool) -> RunReport {
    let document = parse_document(yaml, Format::Yaml).unwrap();
    let executor = Executor::from_document(&document, &Registry::with_builtins()).unwrap();
    assert!(
        executor.rejected().is_empty(),
        "rejected rules: {:?}",
        executor.rejected()
    );
    executor.execute(simulate).unwrap()
}

/// Single-quoted YAML scalar, safe for any path.
fn quoted(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', "''"))
}

#[test]
fn invoices_are_renamed_and_filed_by_year() {
    let tree = TestTree::with_files(&[
        "inbox/Invoice_2024-03.PDF",
        "inbox/Invoice_2023-11.pdf",
        "inbox/notes.txt",
    ]);
    let yaml = format!(
        r#"
rules:
  - name: invoices
    locations: {inbox}
    filters:
      - extension: pdf
      - regex: '^Invoice_(?P<year>\d{{4}})-(?P<month>\d{{2}})'
    actions:
      - rename: "{{regex.year}}-{{regex.month}}.pdf"
      - move: {archive}
"#,
        inbox = quoted(&tree.path("inbox")),
        archive = format!("'{}/{{regex.year}}/'", tree.path("archive").display()),
    );

    let report = run(&yaml, false);

    assert_eq!(report.matched(), 2);
    assert_eq!(report.failed(), 0);
    assert_eq!(
        tree.files(),
        vec![
            "archive/2023/2023-11.pdf",
            "archive/2024/2024-03.pdf",
            "inbox/notes.txt",
        ]
    );
    tree.assert_content("archive/2024/2024-03.pdf", "inbox/Invoice_2024-03.PDF");
}

#[test]
fn simulation_predicts_the_real_run() {
    let tree = TestTree::with_files(&["inbox/a.txt", "inbox/b.txt", "inbox/report.txt"]);
    let yaml = format!(
        r#"
rules:
  - locations: {inbox}
    filters:
      - name: {{ match: report }}
    actions:
      - move: archive/
  - locations: {inbox}
    actions:
      - rename: report.txt
"#,
        inbox = quoted(&tree.path("inbox")),
    );
    let before = tree.snapshot();

    let simulated = run(&yaml, true);
    assert_eq!(tree.snapshot(), before);

    let real = run(&yaml, false);
    let paths = |report: &RunReport| {
        report
            .outcomes
            .iter()
            .map(|o| o.path.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(paths(&simulated), paths(&real));
    assert_eq!(
        tree.files(),
        vec!["inbox/archive/report.txt", "inbox/report (1).txt", "inbox/report.txt"]
    );
}

#[test]
fn overwrite_moves_occupant_into_trash_dir() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("incoming/report.pdf").write_str("new").unwrap();
    temp.child("archive/report.pdf").write_str("old").unwrap();

    let yaml = format!(
        r#"
trash_dir: {bin}
rules:
  - locations: {incoming}
    actions:
      - move: {{ dest: {archive}, overwrite: true }}
"#,
        bin = quoted(&temp.path().join("bin")),
        incoming = quoted(&temp.path().join("incoming")),
        archive = quoted(&temp.path().join("archive")),
    );

    let report = run(&yaml, false);

    assert_eq!(report.failed(), 0);
    temp.child("archive/report.pdf")
        .assert(predicate::str::diff("new"));
    temp.child("bin/report.pdf").assert(predicate::str::diff("old"));
    temp.child("incoming/report.pdf")
        .assert(predicate::path::missing());
}

#[test]
fn copy_then_rename_keeps_backup() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("docs/thesis.md").write_str("draft").unwrap();

    let yaml = format!(
        r#"
rules:
  - locations: {docs}
    filters: [{{ extension: md }}]
    actions:
      - copy: ../backup/
      - rename: "{{path.stem}}-v1{{path.suffix}}"
"#,
        docs = quoted(&temp.path().join("docs")),
    );

    let report = run(&yaml, false);

    assert_eq!(
        report.outcomes[0].path.as_deref(),
        Some(temp.path().join("docs/thesis-v1.md").as_path())
    );
    temp.child("backup/thesis.md")
        .assert(predicate::str::diff("draft"));
    temp.child("docs/thesis-v1.md")
        .assert(predicate::path::exists());
    temp.child("docs/thesis.md").assert(predicate::path::missing());
}

#[test]
fn recursive_cleanup_skips_hidden_and_small_files() {
    let tree = TestTree::new();
    tree.write("cache/big.bin", &"x".repeat(2_000));
    tree.write("cache/nested/big.log", &"x".repeat(3_000));
    tree.write("cache/small.bin", "x");
    tree.write("cache/.keep/big.bin", &"x".repeat(2_000));

    let yaml = format!(
        r#"
rules:
  - locations:
      - path: {cache}
        recursive: true
        include_hidden: false
    filters:
      - size: "> 1 KB"
    actions:
      - echo: "{{path.name}} is {{size}} bytes"
      - delete
"#,
        cache = quoted(&tree.path("cache")),
    );

    let report = run(&yaml, false);

    assert_eq!(report.matched(), 2);
    assert_eq!(report.outcomes[0].actions[0], "echo \"big.bin is 2000 bytes\"");
    assert_eq!(
        tree.files(),
        vec!["cache/.keep/big.bin", "cache/small.bin"]
    );
}

#[test]
fn disabled_and_invalid_rules_do_not_run() {
    let tree = TestTree::with_files(&["a.txt"]);
    let yaml = format!(
        r#"
rules:
  - enabled: false
    locations: {root}
    actions: [delete]
  - name: broken
    locations: {root}
    actions: [{{ rename: "sub/{{path.name}}" }}]
"#,
        root = quoted(tree.root()),
    );
    let document = parse_document(&yaml, Format::Yaml).unwrap();
    let executor = Executor::from_document(&document, &Registry::with_builtins()).unwrap();

    let report = executor.execute(false).unwrap();

    assert_eq!(report.matched(), 0);
    assert_eq!(report.rejected_rules.len(), 1);
    assert_eq!(report.rejected_rules[0].rule, "broken");
    assert!(report.has_errors());
    tree.assert_exists("a.txt");
}
