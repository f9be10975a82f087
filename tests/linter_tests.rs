#![allow(clippy::unwrap_used, clippy::expect_used)]

use apirouter::linter::{has_errors, lint_manifest, LintSeverity};
use apirouter::{Manifest, RouterConfig};

mod common;
use common::fixtures::{BROKEN_MANIFEST, USERS_MANIFEST};
use common::temp_files;

#[test]
fn test_users_manifest_has_no_errors() {
    let file = temp_files::create_temp_yaml(USERS_MANIFEST);
    let manifest = Manifest::load_unchecked(file.path()).unwrap();
    let issues = lint_manifest(&manifest, &RouterConfig::default());

    assert!(!has_errors(&issues), "unexpected errors: {issues:?}");
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn test_broken_manifest_reports_method_error() {
    let file = temp_files::create_temp_yaml(BROKEN_MANIFEST);
    let manifest = Manifest::load_unchecked(file.path()).unwrap();
    let issues = lint_manifest(&manifest, &RouterConfig::default());

    let errors: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, "unknown_property");
    assert_eq!(
        errors[0].location,
        "method:App\\Presenters\\UsersPresenter::actionDelete"
    );
    assert!(issues.iter().any(|i| i.kind == "undeclared_placeholder"));
}

#[test]
fn test_unknown_annotation_is_an_error_not_a_load_failure() {
    let yaml = "handlers:\n  - class: A\n    annotations:\n      route: { path: /a }\n      cached: 1\n    methods: [actionIndex]\n";
    let file = temp_files::create_temp_yaml(yaml);
    let manifest = Manifest::load_unchecked(file.path()).unwrap();

    let issues = lint_manifest(&manifest, &RouterConfig::default());
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, "metadata");

    let issues = lint_manifest(&manifest, &RouterConfig::with_ignored(["cached"]));
    assert!(issues.is_empty());
}
