#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::spec::{Format, HttpMethod, RawSpec};
use serde_json::{json, Value};
use std::collections::HashMap;

/// In-memory source keyed by class name and `class::method`.
#[derive(Default)]
struct MapSource {
    classes: HashMap<String, RawSpec>,
    methods: HashMap<String, RawSpec>,
    descriptions: HashMap<String, String>,
}

impl MapSource {
    fn class(mut self, name: &str, spec: Value) -> Self {
        self.classes.insert(name.to_string(), raw(spec));
        self
    }

    fn method(mut self, class: &str, method: &str, spec: Value) -> Self {
        self.methods.insert(format!("{class}::{method}"), raw(spec));
        self
    }

    fn describe(mut self, key: &str, text: &str) -> Self {
        self.descriptions.insert(key.to_string(), text.to_string());
        self
    }
}

impl MetadataSource for MapSource {
    fn class_spec(&self, class: &HandlerClass) -> Result<Option<RawSpec>, MetadataError> {
        Ok(self.classes.get(&class.name).cloned())
    }

    fn method_spec(
        &self,
        class: &HandlerClass,
        method: &str,
    ) -> Result<Option<RawSpec>, MetadataError> {
        Ok(self.methods.get(&format!("{}::{method}", class.name)).cloned())
    }

    fn class_description(&self, class: &HandlerClass) -> Option<String> {
        self.descriptions.get(&class.name).cloned()
    }

    fn method_description(&self, class: &HandlerClass, method: &str) -> Option<String> {
        self.descriptions
            .get(&format!("{}::{method}", class.name))
            .cloned()
    }
}

fn raw(value: Value) -> RawSpec {
    match value {
        Value::Object(map) => map,
        other => panic!("test fixture must be an object, got {other}"),
    }
}

#[test]
fn test_users_scenario() {
    let source = MapSource::default()
        .class(
            "UsersPresenter",
            json!({"path": "/users/<id>", "parameters": {"id": {"type": "int"}}}),
        )
        .method("UsersPresenter", "actionDelete", json!({"method": "DELETE"}));
    let classes = [HandlerClass::new(
        "UsersPresenter",
        ["actionShow", "actionDelete"],
    )];

    let routes = resolve_routes(&classes, &source).unwrap();
    assert_eq!(routes.len(), 2);

    let delete = &routes[0].spec;
    assert_eq!(delete.path, "/users/<id>");
    assert_eq!(delete.method, Some(HttpMethod::Delete));
    assert_eq!(delete.action.as_deref(), Some("delete"));
    assert_eq!(delete.handler.as_deref(), Some("Users"));
    assert_eq!(delete.format(), Format::Json);
    assert!(delete.actions.is_empty());

    let base = &routes[1].spec;
    assert_eq!(base.path, "/users/<id>");
    assert_eq!(base.actions, vec!["show"]);
    assert_eq!(base.action, None);
    assert_eq!(base.parameters["id"].param_type, Some(json!("int")));
}

#[test]
fn test_class_without_declaration_is_skipped() {
    let source = MapSource::default().method("Plain", "actionRun", json!({"path": "/run"}));
    let classes = [HandlerClass::new("Plain", ["actionRun"])];
    assert!(resolve_routes(&classes, &source).unwrap().is_empty());
}

#[test]
fn test_format_inherited_from_base() {
    let source = MapSource::default()
        .class("FeedHandler", json!({"path": "/feed", "format": "xml", "section": "Feeds"}))
        .method("FeedHandler", "actionLatest", json!({"path": "/feed/latest"}));
    let classes = [HandlerClass::new("FeedHandler", ["actionLatest", "actionAll"])];

    let routes = resolve_routes(&classes, &source).unwrap();
    let latest = &routes[0].spec;
    assert_eq!(latest.format, Some(Format::Xml));
    assert_eq!(latest.section.as_deref(), Some("Feeds"));
    assert_eq!(latest.handler.as_deref(), Some("Feed"));
}

#[test]
fn test_explicit_method_fields_win() {
    let source = MapSource::default()
        .class("Api", json!({"path": "/api", "format": "xml", "priority": 4, "handler": "Root"}))
        .method(
            "Api",
            "actionStatus",
            json!({"path": "/api/status", "format": "json", "priority": 9, "handler": "Status", "action": "health"}),
        );
    let classes = [HandlerClass::new("Api", ["actionStatus"])];

    let routes = resolve_routes(&classes, &source).unwrap();
    assert_eq!(routes.len(), 1);
    let status = &routes[0];
    assert_eq!(status.spec.format, Some(Format::Json));
    assert_eq!(status.spec.priority, 9);
    assert_eq!(status.spec.handler.as_deref(), Some("Status"));
    assert_eq!(status.spec.action.as_deref(), Some("health"));
    // keyed by the class priority, not its own
    assert_eq!(status.priority, 4);
}

#[test]
fn test_zero_priority_is_backfilled() {
    let source = MapSource::default()
        .class("Jobs", json!({"path": "/jobs", "priority": 7}))
        .method("Jobs", "actionRun", json!({"path": "/jobs/run", "priority": 0}));
    let classes = [HandlerClass::new("Jobs", ["actionRun"])];

    let routes = resolve_routes(&classes, &source).unwrap();
    assert_eq!(routes[0].spec.priority, 7);
    assert_eq!(routes[0].priority, 7);
}

#[test]
fn test_base_suppressed_when_every_method_overrides() {
    let source = MapSource::default()
        .class("Items", json!({"path": "/items"}))
        .method("Items", "actionList", json!({"method": "READ"}))
        .method("Items", "actionCreate", json!({"method": "CREATE"}));
    let classes = [HandlerClass::new("Items", ["actionList", "actionCreate"])];

    let routes = resolve_routes(&classes, &source).unwrap();
    assert_eq!(routes.len(), 2);
    assert!(routes.iter().all(|r| r.spec.actions.is_empty()));
    let actions: Vec<_> = routes
        .iter()
        .filter_map(|r| r.spec.action.as_deref())
        .collect();
    assert_eq!(actions, vec!["list", "create"]);
}

#[test]
fn test_never_more_than_methods_plus_one() {
    let source = MapSource::default()
        .class("Reports", json!({"path": "/reports"}))
        .method("Reports", "actionExport", json!({"path": "/reports/export"}));
    let classes = [HandlerClass::new(
        "Reports",
        ["actionIndex", "actionExport", "actionSummary"],
    )];

    let routes = resolve_routes(&classes, &source).unwrap();
    assert!(routes.len() <= classes[0].methods.len() + 1);
    assert_eq!(routes.len(), 2);
    let base = routes.last().unwrap();
    assert_eq!(base.spec.actions, vec!["index", "summary"]);
}

#[test]
fn test_descriptions_from_source_replace_declared() {
    let source = MapSource::default()
        .class("Docs", json!({"path": "/docs", "description": "declared"}))
        .method("Docs", "actionPage", json!({"path": "/docs/<page>"}))
        .describe("Docs", "Documentation pages")
        .describe("Docs::actionPage", "A single page");
    let classes = [HandlerClass::new("Docs", ["actionPage", "actionIndex"])];

    let routes = resolve_routes(&classes, &source).unwrap();
    assert_eq!(routes[0].spec.description.as_deref(), Some("A single page"));
    assert_eq!(
        routes[1].spec.description.as_deref(),
        Some("Documentation pages")
    );
}

#[test]
fn test_class_error_carries_context() {
    let source = MapSource::default().class("Broken", json!({"path": "/b", "colour": "red"}));
    let classes = [HandlerClass::new("Broken", ["actionIndex"])];

    let err = resolve_routes(&classes, &source).unwrap_err();
    assert_eq!(err.class(), "Broken");
    assert_eq!(
        err.spec_error(),
        Some(&SpecError::UnknownProperty {
            key: "colour".into(),
            kind: SpecKind::Class,
        })
    );
}

#[test]
fn test_method_error_aborts_whole_pass() {
    let source = MapSource::default()
        .class("Good", json!({"path": "/good"}))
        .class("Bad", json!({"path": "/bad/<id>"}))
        .method("Bad", "actionEdit", json!({"parameters": {"slug": null}}));
    let classes = [
        HandlerClass::new("Good", ["actionIndex"]),
        HandlerClass::new("Bad", ["actionEdit"]),
    ];

    let err = resolve_routes(&classes, &source).unwrap_err();
    match err {
        ResolveError::MethodSpec {
            class,
            method,
            source,
        } => {
            assert_eq!(class, "Bad");
            assert_eq!(method, "actionEdit");
            assert_eq!(source.kind_name(), "unbound_parameter");
            assert_eq!(source.spec_kind(), SpecKind::Method);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_metadata_error_is_wrapped() {
    struct Failing;
    impl MetadataSource for Failing {
        fn class_spec(&self, class: &HandlerClass) -> Result<Option<RawSpec>, MetadataError> {
            Err(MetadataError::UnknownClass(class.name.clone()))
        }
        fn method_spec(
            &self,
            _class: &HandlerClass,
            _method: &str,
        ) -> Result<Option<RawSpec>, MetadataError> {
            Ok(None)
        }
    }

    let classes = [HandlerClass::new("Ghost", ["actionIndex"])];
    let err = resolve_routes(&classes, &Failing).unwrap_err();
    assert!(matches!(err, ResolveError::Metadata { .. }));
    assert!(err.spec_error().is_none());
}

#[test]
fn test_resolver_through_trait_object() {
    let source = MapSource::default().class("Ping", json!({"path": "/ping"}));
    let dyn_source: &dyn MetadataSource = &source;
    let resolver = RouteResolver::new(dyn_source);
    let routes = resolver
        .resolve_class(&HandlerClass::new("Ping", ["actionDefault"]))
        .unwrap();
    assert_eq!(routes[0].spec.actions, vec!["default"]);
    assert_eq!(routes[0].spec.handler.as_deref(), Some("Ping"));
}
