//! Unit tests for missing-option reports and error rendering.

use std::io;

use camino::Utf8PathBuf;
use rstest::rstest;

use super::{MissingOptions, TmpPostgresError};

#[rstest]
fn context_prefixes_every_entry() {
    let missing = MissingOptions::single("stdin")
        .append(MissingOptions::single("stderr"))
        .with_context("process")
        .with_context("create");
    let options: Vec<&str> = missing.iter().map(|m| m.option()).collect();
    assert_eq!(options, vec!["create.process.stdin", "create.process.stderr"]);
}

#[rstest]
fn display_numbers_each_entry() {
    let missing = MissingOptions::single("logger").append(MissingOptions::single("data_directory"));
    assert_eq!(
        missing.to_string(),
        "1: missing required option `logger`\n2: missing required option `data_directory`"
    );
}

#[rstest]
fn incomplete_error_exposes_missing_options() {
    let err = TmpPostgresError::from(MissingOptions::single("logger"));
    let missing = err.missing_options().expect("incomplete error");
    assert!(missing.contains("logger"));
    assert!(err.to_string().starts_with("incomplete plan:"));
}

#[rstest]
fn rollback_error_mentions_both_failures() {
    let err = TmpPostgresError::Rollback {
        cause: Box::new(TmpPostgresError::FreePort(io::Error::other("no ports"))),
        rollback: Box::new(TmpPostgresError::RemoveDirectory {
            path: Utf8PathBuf::from("/tmp/tmp-postgres-socket1"),
            source: io::Error::other("busy"),
        }),
    };
    let rendered = err.to_string();
    assert!(rendered.contains("no ports"), "{rendered}");
    assert!(rendered.contains("/tmp/tmp-postgres-socket1"), "{rendered}");
    assert!(err.missing_options().is_none());
}

#[rstest]
fn reports_built_by_every_constructor_are_non_empty() {
    let single = MissingOptions::single("logger");
    assert!(!single.is_empty());
    let appended = single.clone().append(MissingOptions::single("data_directory"));
    assert_eq!(appended.len(), 2);
    assert!(!appended.is_empty());
    let tagged = single.with_context("postgres");
    assert_eq!(tagged.len(), 1);
    assert!(!tagged.is_empty());
}
