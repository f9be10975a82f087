use crate::spec::RawSpec;
use thiserror::Error;

/// A handler class and the methods it exposes, as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerClass {
    /// Fully qualified class name
    pub name: String,
    /// Method names in declaration order
    pub methods: Vec<String>,
}

impl HandlerClass {
    pub fn new<I, S>(name: impl Into<String>, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        HandlerClass {
            name: name.into(),
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }
}

/// Failure reported by a [`MetadataSource`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// Metadata carries a name that is neither understood nor ignored
    #[error("Unknown annotation \"{name}\" on {}", describe(.class, .method))]
    UnknownAnnotation {
        name: String,
        class: String,
        /// `None` for class-level metadata
        method: Option<String>,
    },

    /// The route annotation is present but is not a mapping
    #[error("Route annotation on {} must be a mapping", describe(.class, .method))]
    MalformedRoute {
        class: String,
        method: Option<String>,
    },

    /// The source has no record of the requested class
    #[error("No metadata recorded for handler class {0}")]
    UnknownClass(String),
}

impl MetadataError {
    /// Handler class the failure belongs to.
    #[must_use]
    pub fn class(&self) -> &str {
        match self {
            MetadataError::UnknownAnnotation { class, .. }
            | MetadataError::MalformedRoute { class, .. }
            | MetadataError::UnknownClass(class) => class,
        }
    }

    /// Method the failure belongs to, `None` when it is class-level.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        match self {
            MetadataError::UnknownAnnotation { method, .. }
            | MetadataError::MalformedRoute { method, .. } => method.as_deref(),
            MetadataError::UnknownClass(_) => None,
        }
    }
}

fn describe(class: &str, method: &Option<String>) -> String {
    match method {
        Some(method) => format!("{class}::{method}"),
        None => class.to_string(),
    }
}

/// Supplies raw route declarations for handler classes and methods.
///
/// This is the boundary to whatever authors the metadata (a manifest file,
/// generated code, a registry). The resolver only asks; it never caches.
pub trait MetadataSource {
    /// Class-level declaration, if the class has one.
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] when the metadata cannot be read.
    fn class_spec(&self, class: &HandlerClass) -> Result<Option<RawSpec>, MetadataError>;

    /// Method-level declaration, if the method has one.
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] when the metadata cannot be read.
    fn method_spec(
        &self,
        class: &HandlerClass,
        method: &str,
    ) -> Result<Option<RawSpec>, MetadataError>;

    /// Documentation attached to the class; replaces the declared description.
    fn class_description(&self, _class: &HandlerClass) -> Option<String> {
        None
    }

    /// Documentation attached to a method; replaces the declared description.
    fn method_description(&self, _class: &HandlerClass, _method: &str) -> Option<String> {
        None
    }
}

/// [`MetadataSource`] backed by two lookup callbacks.
pub struct LookupSource<C, M> {
    class: C,
    method: M,
}

impl<C, M> LookupSource<C, M>
where
    C: Fn(&HandlerClass) -> Option<RawSpec>,
    M: Fn(&HandlerClass, &str) -> Option<RawSpec>,
{
    pub fn new(class: C, method: M) -> Self {
        LookupSource { class, method }
    }
}

impl<C, M> MetadataSource for LookupSource<C, M>
where
    C: Fn(&HandlerClass) -> Option<RawSpec>,
    M: Fn(&HandlerClass, &str) -> Option<RawSpec>,
{
    fn class_spec(&self, class: &HandlerClass) -> Result<Option<RawSpec>, MetadataError> {
        Ok((self.class)(class))
    }

    fn method_spec(
        &self,
        class: &HandlerClass,
        method: &str,
    ) -> Result<Option<RawSpec>, MetadataError> {
        Ok((self.method)(class, method))
    }
}
