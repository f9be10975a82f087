//! # Manifest Linter Module
//!
//! Collect-all diagnostics for a handler manifest.
//!
//! Resolution stops at the first invalid declaration. The linter instead
//! validates every class- and method-level declaration on its own and reports
//! all problems at once, along with a few warnings about declarations that are
//! valid but probably not what the author meant.
//!
//! ## Checks Performed
//!
//! 1. **Validation errors** - every [`SpecError`](crate::spec::SpecError) kind,
//!    reported under its snake_case name
//! 2. **Metadata errors** - unknown annotation names, malformed `route` values
//! 3. **Suppressed class routes** - every method overrides the class route, so
//!    the class route itself is never emitted
//! 4. **Ignored method routes** - method routes on a class without a class route
//! 5. **Disabled routes**
//! 6. **Undeclared placeholders** - `<name>` in a path with no parameter entry
//! 7. **Default tag colors** - tags declared without a color
//!
//! ## Usage
//!
//! ```rust,no_run
//! use apirouter::config::RouterConfig;
//! use apirouter::linter::{lint_manifest, print_lint_issues};
//! use apirouter::manifest::Manifest;
//! use std::path::Path;
//!
//! let manifest = Manifest::load_unchecked(Path::new("handlers.yaml"))?;
//! let issues = lint_manifest(&manifest, &RouterConfig::default());
//! print_lint_issues(&issues);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::config::RouterConfig;
use crate::manifest::{HandlerEntry, Manifest, MethodEntry};
use crate::resolver::{HandlerClass, MetadataError, MetadataSource};
use crate::spec::{
    known_properties, validate_method_spec, validate_spec, RouteSpec, SpecError, SpecKind,
    DEFAULT_TAG_COLOR, DESCRIPTOR_KEYS,
};
use std::fmt;


/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Error - resolution will fail
    Error,
    /// Warning - resolves, but likely not as intended
    Warning,
    /// Info - style suggestion
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintSeverity::Error => write!(f, "error"),
            LintSeverity::Warning => write!(f, "warning"),
            LintSeverity::Info => write!(f, "info"),
        }
    }
}

/// A lint issue found in a handler manifest
#[derive(Debug, Clone)]
pub struct LintIssue {
    /// Where the issue occurred (e.g. "class:UsersPresenter",
    /// "method:UsersPresenter::actionShow")
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g. "unbound_parameter", "disabled_route")
    pub kind: String,
    /// Human-readable description of the problem
    pub message: String,
    /// Optional suggestion for how to fix it
    pub suggestion: Option<String>,
}

impl LintIssue {
    /// Create a new lint issue
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion for fixing the issue
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    fn from_spec_error(location: &str, err: &SpecError) -> Self {
        let issue = LintIssue::new(
            location,
            LintSeverity::Error,
            err.kind_name(),
            err.to_string(),
        );
        match err {
            SpecError::UnknownProperty { .. } => issue.with_suggestion(format!(
                "Recognized properties: {}",
                known_properties().collect::<Vec<_>>().join(", ")
            )),
            SpecError::UnboundParameter { name, .. } => issue.with_suggestion(format!(
                "Add <{name}> to the path or remove the parameter"
            )),
            SpecError::InvalidDescriptorKey { .. } => issue.with_suggestion(format!(
                "Use only {}",
                DESCRIPTOR_KEYS.join(", ")
            )),
            _ => issue,
        }
    }
}

/// Lint every declaration in `manifest`.
///
/// Annotation names are checked against `config`; each route declaration is
/// validated independently, so one bad declaration never hides another.
#[must_use]
pub fn lint_manifest(manifest: &Manifest, config: &RouterConfig) -> Vec<LintIssue> {
    let mut issues: Vec<LintIssue> = manifest
        .annotation_errors(config)
        .into_iter()
        .map(|err| {
            LintIssue::new(
                location_of(&err),
                LintSeverity::Error,
                "metadata",
                err.to_string(),
            )
        })
        .collect();

    for (handler, class) in manifest.handlers().iter().zip(manifest.handler_classes()) {
        lint_handler(manifest, handler, &class, &mut issues);
    }
    issues
}

fn location_of(err: &MetadataError) -> String {
    match err {
        MetadataError::UnknownAnnotation { class, method, .. }
        | MetadataError::MalformedRoute { class, method } => match method {
            Some(method) => format!("method:{class}::{method}"),
            None => format!("class:{class}"),
        },
        MetadataError::UnknownClass(class) => format!("class:{class}"),
    }
}

fn lint_handler(
    manifest: &Manifest,
    handler: &HandlerEntry,
    class: &HandlerClass,
    issues: &mut Vec<LintIssue>,
) {
    let class_location = format!("class:{}", handler.class);
    let raw = match manifest.class_spec(class) {
        Ok(raw) => raw,
        Err(err) => {
            issues.push(LintIssue::new(
                &class_location,
                LintSeverity::Error,
                "metadata",
                err.to_string(),
            ));
            return;
        }
    };

    let Some(raw) = raw else {
        for method in &handler.methods {
            if let Ok(Some(_)) = manifest.method_spec(class, method.name()) {
                issues.push(
                    LintIssue::new(
                        method_location(handler, method),
                        LintSeverity::Warning,
                        "ignored_method_route",
                        "Method route is ignored because the class declares no route",
                    )
                    .with_suggestion("Add a class-level route annotation"),
                );
            }
        }
        return;
    };

    let base = match validate_spec(&raw, SpecKind::Class) {
        Ok(base) => {
            lint_spec(&class_location, &base, issues);
            Some(base)
        }
        Err(err) => {
            issues.push(LintIssue::from_spec_error(&class_location, &err));
            None
        }
    };

    let mut implicit = 0usize;
    for method in &handler.methods {
        let location = method_location(handler, method);
        let raw = match manifest.method_spec(class, method.name()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                implicit += 1;
                continue;
            }
            Err(err) => {
                issues.push(LintIssue::new(
                    &location,
                    LintSeverity::Error,
                    "metadata",
                    err.to_string(),
                ));
                continue;
            }
        };

        let result = match &base {
            Some(base) => validate_method_spec(&raw, base),
            // without a valid base only self-contained declarations can be checked
            None if raw.contains_key("path") => validate_spec(&raw, SpecKind::Method),
            None => continue,
        };
        match result {
            Ok(spec) => lint_spec(&location, &spec, issues),
            Err(err) => issues.push(LintIssue::from_spec_error(&location, &err)),
        }
    }

    if base.is_some() && implicit == 0 {
        let message = if handler.methods.is_empty() {
            "Class route is never emitted because the class has no methods"
        } else {
            "Class route is never emitted because every method declares its own route"
        };
        issues.push(
            LintIssue::new(
                &class_location,
                LintSeverity::Warning,
                "base_route_suppressed",
                message,
            )
            .with_suggestion("Remove the class route path or leave one method undeclared"),
        );
    }
}

fn lint_spec(location: &str, spec: &RouteSpec, issues: &mut Vec<LintIssue>) {
    if spec.disabled {
        issues.push(LintIssue::new(
            location,
            LintSeverity::Warning,
            "disabled_route",
            format!("Route {} is disabled and will not be registered", spec.path),
        ));
    }

    for name in spec.placeholders() {
        if !spec.parameters.contains_key(name) {
            issues.push(
                LintIssue::new(
                    location,
                    LintSeverity::Info,
                    "undeclared_placeholder",
                    format!("Placeholder <{name}> in {} has no parameter entry", spec.path),
                )
                .with_suggestion(format!("Describe it under parameters.{name}")),
            );
        }
    }

    for tag in spec.tags.iter().filter(|tag| tag.color.is_none()) {
        issues.push(LintIssue::new(
            location,
            LintSeverity::Info,
            "default_tag_color",
            format!(
                "Tag \"{}\" has no color; {DEFAULT_TAG_COLOR} will be used",
                tag.name
            ),
        ));
    }
}

fn method_location(handler: &HandlerEntry, method: &MethodEntry) -> String {
    format!("method:{}::{}", handler.class, method.name())
}

/// Whether any issue is an error.
#[must_use]
pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

/// Print lint issues in a formatted way
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("✅ No lint issues found!");
        return;
    }

    let by_severity = |severity: LintSeverity| -> Vec<&LintIssue> {
        issues.iter().filter(|i| i.severity == severity).collect()
    };
    let errors = by_severity(LintSeverity::Error);
    let warnings = by_severity(LintSeverity::Warning);
    let infos = by_severity(LintSeverity::Info);

    println!("\n📋 Lint Results:");
    println!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        errors.len(),
        warnings.len(),
        infos.len()
    );

    for (heading, group) in [
        ("❌ Errors (must fix):", &errors),
        ("⚠️  Warnings (should fix):", &warnings),
        ("ℹ️  Info (best practices):", &infos),
    ] {
        if group.is_empty() {
            continue;
        }
        println!("{heading}");
        for issue in group {
            println!("   [{}] {}", issue.kind, issue.location);
            println!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("      💡 Suggestion: {suggestion}");
            }
        }
        println!();
    }
}
