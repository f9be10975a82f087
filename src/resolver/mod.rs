//! # Resolver Module
//!
//! Walks handler classes, asks a [`MetadataSource`] for their declarations and
//! merges class-level and method-level specs into a flat list of
//! [`ResolvedRoute`]s.
//!
//! ## Merge rules
//!
//! For every class with a class-level declaration (the *base spec*):
//!
//! 1. The base spec is validated; its handler name defaults to the class name
//!    without a `Presenter`/`Handler` suffix.
//! 2. Each method is classified. A method without its own declaration is an
//!    *implicit* action served by the base spec. A method with a declaration
//!    becomes an *override*: a separate spec that back-fills handler, priority,
//!    format and section from the base when it leaves them unset.
//! 3. Overrides are emitted in method order. The base spec is emitted last,
//!    and only when at least one implicit action remains.
//!
//! Every route of a class is keyed by the base spec's priority.
//!
//! Resolution is fail-fast: the first invalid declaration aborts the pass and
//! no partial result is returned.
//!
//! ```rust
//! use apirouter::resolver::{resolve_routes, HandlerClass, LookupSource};
//! use serde_json::json;
//!
//! let classes = vec![HandlerClass::new("UsersPresenter", ["actionShow"])];
//! let source = LookupSource::new(
//!     |_class: &HandlerClass| json!({"path": "/users/<id>"}).as_object().cloned(),
//!     |_class: &HandlerClass, _method: &str| None,
//! );
//! let routes = resolve_routes(&classes, &source).unwrap();
//! assert_eq!(routes[0].spec.actions, vec!["show"]);
//! assert_eq!(routes[0].spec.handler.as_deref(), Some("Users"));
//! ```

pub mod naming;
mod source;

#[cfg(test)]
mod tests;

pub use source::{HandlerClass, LookupSource, MetadataError, MetadataSource};

use crate::spec::{validate_method_spec, validate_spec, RouteSpec, SpecError, SpecKind};
use thiserror::Error;
use tracing::{debug, info};

/// A validated route together with the priority bucket it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub priority: i64,
    pub spec: RouteSpec,
}

/// Resolution failure, with the class (and method) it originated from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Invalid route declaration on {class}")]
    ClassSpec {
        class: String,
        #[source]
        source: SpecError,
    },

    #[error("Invalid route declaration on {class}::{method}")]
    MethodSpec {
        class: String,
        method: String,
        #[source]
        source: SpecError,
    },

    #[error("Reading route metadata of {class} failed")]
    Metadata {
        class: String,
        #[source]
        source: MetadataError,
    },
}

impl ResolveError {
    /// The underlying validation error, if this is one.
    #[must_use]
    pub fn spec_error(&self) -> Option<&SpecError> {
        match self {
            ResolveError::ClassSpec { source, .. } | ResolveError::MethodSpec { source, .. } => {
                Some(source)
            }
            ResolveError::Metadata { .. } => None,
        }
    }

    /// The handler class the error was raised for.
    #[must_use]
    pub fn class(&self) -> &str {
        match self {
            ResolveError::ClassSpec { class, .. }
            | ResolveError::MethodSpec { class, .. }
            | ResolveError::Metadata { class, .. } => class,
        }
    }
}

/// How one handler method relates to its class declaration.
#[derive(Debug)]
enum MethodDecision {
    /// No declaration of its own; served by the base spec under this action
    Implicit(String),
    /// Declared its own route
    Override(RouteSpec),
}

/// Resolves handler classes against a [`MetadataSource`].
pub struct RouteResolver<'a, S: MetadataSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: MetadataSource + ?Sized> RouteResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        RouteResolver { source }
    }

    /// Resolve every class, in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ResolveError`]; nothing resolved so far is returned.
    pub fn resolve(&self, classes: &[HandlerClass]) -> Result<Vec<ResolvedRoute>, ResolveError> {
        let mut routes = Vec::new();
        for class in classes {
            routes.extend(self.resolve_class(class)?);
        }
        info!(
            classes = classes.len(),
            routes = routes.len(),
            "Resolved route declarations"
        );
        Ok(routes)
    }

    /// Resolve a single class. A class without a class-level declaration
    /// contributes no routes.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] for an unreadable or invalid declaration.
    pub fn resolve_class(&self, class: &HandlerClass) -> Result<Vec<ResolvedRoute>, ResolveError> {
        let raw = self
            .source
            .class_spec(class)
            .map_err(|source| ResolveError::Metadata {
                class: class.name.clone(),
                source,
            })?;
        let Some(raw) = raw else {
            debug!(class = %class.name, "No class-level route declaration, skipping");
            return Ok(Vec::new());
        };

        let mut base =
            validate_spec(&raw, SpecKind::Class).map_err(|source| ResolveError::ClassSpec {
                class: class.name.clone(),
                source,
            })?;
        if let Some(description) = self.source.class_description(class) {
            base.description = Some(description);
        }
        if is_unset(base.handler.as_deref()) {
            base.handler = Some(naming::handler_name(&class.name));
        }

        let decisions = class
            .methods
            .iter()
            .map(|method| self.decide(class, method, &base))
            .collect::<Result<Vec<_>, _>>()?;

        let priority = base.priority;
        let mut routes = Vec::with_capacity(decisions.len() + 1);
        let mut implicit = Vec::new();
        for decision in decisions {
            match decision {
                MethodDecision::Implicit(action) => implicit.push(action),
                MethodDecision::Override(spec) => routes.push(ResolvedRoute { priority, spec }),
            }
        }

        if implicit.is_empty() {
            debug!(
                class = %class.name,
                path = %base.path,
                "Every method overrides the class route; class route not emitted"
            );
        } else {
            base.actions = implicit;
            routes.push(ResolvedRoute {
                priority,
                spec: base,
            });
        }

        debug!(class = %class.name, routes = routes.len(), "Resolved handler class");
        Ok(routes)
    }

    fn decide(
        &self,
        class: &HandlerClass,
        method: &str,
        base: &RouteSpec,
    ) -> Result<MethodDecision, ResolveError> {
        let action = naming::action_name(method);
        let raw = self
            .source
            .method_spec(class, method)
            .map_err(|source| ResolveError::Metadata {
                class: class.name.clone(),
                source,
            })?;
        let Some(raw) = raw else {
            return Ok(MethodDecision::Implicit(action));
        };

        let mut spec =
            validate_method_spec(&raw, base).map_err(|source| ResolveError::MethodSpec {
                class: class.name.clone(),
                method: method.to_string(),
                source,
            })?;
        if let Some(description) = self.source.method_description(class, method) {
            spec.description = Some(description);
        }
        inherit_from_base(&mut spec, base);
        if is_unset(spec.action.as_deref()) {
            spec.action = Some(action);
        }

        debug!(
            class = %class.name,
            method,
            path = %spec.path,
            "Method declares its own route"
        );
        Ok(MethodDecision::Override(spec))
    }
}

/// Back-fill unset fields of a method-level spec, in a fixed order:
/// handler, priority, format, section. A priority of `0` counts as unset.
fn inherit_from_base(spec: &mut RouteSpec, base: &RouteSpec) {
    if is_unset(spec.handler.as_deref()) {
        spec.handler = base.handler.clone();
    }
    if spec.priority == 0 {
        spec.priority = base.priority;
    }
    if spec.format.is_none() {
        spec.format = base.format;
    }
    if is_unset(spec.section.as_deref()) {
        spec.section = base.section.clone();
    }
}

fn is_unset(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

/// Resolve `classes` against `source` in one pass.
///
/// # Errors
///
/// Returns the first [`ResolveError`] encountered.
pub fn resolve_routes<S: MetadataSource + ?Sized>(
    classes: &[HandlerClass],
    source: &S,
) -> Result<Vec<ResolvedRoute>, ResolveError> {
    RouteResolver::new(source).resolve(classes)
}
