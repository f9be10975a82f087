//! # Manifest Module
//!
//! A file-backed [`MetadataSource`]: handler classes, their methods and the
//! annotations attached to each, read from YAML or JSON.
//!
//! ## Format
//!
//! ```yaml
//! handlers:
//!   - class: App\Presenters\UsersPresenter
//!     annotations:
//!       route:
//!         path: /users/<id>
//!         parameters:
//!           id: { type: int }
//!       description: User resource
//!     methods:
//!       - actionShow
//!       - name: actionDelete
//!         annotations:
//!           route: { method: DELETE }
//! ```
//!
//! Two annotation names are understood: `route` (the raw route declaration)
//! and `description`. Any other name must be listed in
//! [`RouterConfig::ignore_metadata`]; otherwise loading fails with
//! [`MetadataError::UnknownAnnotation`].

use crate::config::RouterConfig;
use crate::resolver::{HandlerClass, MetadataError, MetadataSource};
use crate::spec::RawSpec;
use anyhow::{bail, Context};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

/// Annotation carrying the raw route declaration.
pub const ROUTE_ANNOTATION: &str = "route";

/// Annotation carrying documentation text.
pub const DESCRIPTION_ANNOTATION: &str = "description";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default)]
    handlers: Vec<HandlerEntry>,
}

/// One handler class as written in the manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerEntry {
    pub class: String,
    #[serde(default)]
    pub annotations: Map<String, Value>,
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
}

impl HandlerEntry {
    /// The raw class-level route declaration, if any.
    ///
    /// # Errors
    ///
    /// [`MetadataError::MalformedRoute`] when `route` is not a mapping.
    pub fn route(&self) -> Result<Option<RawSpec>, MetadataError> {
        route_annotation(&self.annotations, &self.class, None)
    }

    pub fn description(&self) -> Option<String> {
        description_annotation(&self.annotations)
    }

    pub fn method(&self, name: &str) -> Option<&MethodEntry> {
        self.methods.iter().find(|m| m.name() == name)
    }
}

/// A handler method: a bare name, or a name with annotations.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MethodEntry {
    Name(String),
    Annotated(AnnotatedMethod),
}

/// A method written as a mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotatedMethod {
    pub name: String,
    #[serde(default)]
    pub annotations: Map<String, Value>,
}

impl MethodEntry {
    pub fn name(&self) -> &str {
        match self {
            MethodEntry::Name(name) => name,
            MethodEntry::Annotated(method) => &method.name,
        }
    }

    fn annotations(&self) -> Option<&Map<String, Value>> {
        match self {
            MethodEntry::Name(_) => None,
            MethodEntry::Annotated(method) => Some(&method.annotations),
        }
    }
}

/// Handler manifest loaded from disk or memory.
#[derive(Debug, Clone)]
pub struct Manifest {
    handlers: Vec<HandlerEntry>,
    index: HashMap<String, usize>,
}

impl Manifest {
    /// Parse manifest content in the given format (`yaml`, `yml` or `json`)
    /// without checking annotation names.
    ///
    /// # Errors
    ///
    /// Fails on an unsupported format, malformed content or a class listed
    /// twice.
    pub fn parse(contents: &str, format: &str) -> anyhow::Result<Self> {
        let file: ManifestFile = match format {
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).context("Invalid YAML handler manifest")?
            }
            "json" => serde_json::from_str(contents).context("Invalid JSON handler manifest")?,
            other => bail!("Unsupported handler manifest format: {other}"),
        };

        let mut index = HashMap::with_capacity(file.handlers.len());
        for (i, handler) in file.handlers.iter().enumerate() {
            if index.insert(handler.class.clone(), i).is_some() {
                bail!("Handler class {} is listed more than once", handler.class);
            }
        }
        Ok(Manifest {
            handlers: file.handlers,
            index,
        })
    }

    /// Parse manifest content and reject annotations that are neither
    /// understood nor ignored by `config`.
    ///
    /// # Errors
    ///
    /// Fails like [`Manifest::parse`], or with the first
    /// [`MetadataError::UnknownAnnotation`].
    pub fn from_str_with(
        contents: &str,
        format: &str,
        config: &RouterConfig,
    ) -> anyhow::Result<Self> {
        let manifest = Self::parse(contents, format)?;
        if let Some(err) = manifest.annotation_errors(config).into_iter().next() {
            return Err(err.into());
        }
        Ok(manifest)
    }

    /// Read a manifest file without checking annotation names.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load_unchecked(path: &Path) -> anyhow::Result<Self> {
        let contents = read_manifest(path)?;
        Self::parse(&contents, &extension(path))
            .with_context(|| format!("Failed to parse handler manifest: {}", path.display()))
    }

    /// Read and check a manifest file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, or carries an unknown
    /// annotation.
    pub fn load(path: &Path, config: &RouterConfig) -> anyhow::Result<Self> {
        let contents = read_manifest(path)?;
        Self::from_str_with(&contents, &extension(path), config)
            .with_context(|| format!("Failed to load handler manifest: {}", path.display()))
    }

    pub fn handlers(&self) -> &[HandlerEntry] {
        &self.handlers
    }

    /// Resolver input: every class with its methods, in manifest order.
    #[must_use]
    pub fn handler_classes(&self) -> Vec<HandlerClass> {
        self.handlers
            .iter()
            .map(|h| HandlerClass::new(h.class.clone(), h.methods.iter().map(MethodEntry::name)))
            .collect()
    }

    /// Every annotation name not understood and not ignored by `config`.
    #[must_use]
    pub fn annotation_errors(&self, config: &RouterConfig) -> Vec<MetadataError> {
        let mut errors = Vec::new();
        for handler in &self.handlers {
            check_names(&handler.annotations, &handler.class, None, config, &mut errors);
            for method in &handler.methods {
                if let Some(annotations) = method.annotations() {
                    let name = Some(method.name());
                    check_names(annotations, &handler.class, name, config, &mut errors);
                }
            }
        }
        errors
    }

    fn entry(&self, class: &HandlerClass) -> Result<&HandlerEntry, MetadataError> {
        self.index
            .get(&class.name)
            .and_then(|&i| self.handlers.get(i))
            .ok_or_else(|| MetadataError::UnknownClass(class.name.clone()))
    }
}

impl MetadataSource for Manifest {
    fn class_spec(&self, class: &HandlerClass) -> Result<Option<RawSpec>, MetadataError> {
        self.entry(class)?.route()
    }

    fn method_spec(
        &self,
        class: &HandlerClass,
        method: &str,
    ) -> Result<Option<RawSpec>, MetadataError> {
        let entry = self.entry(class)?;
        match entry.method(method).and_then(MethodEntry::annotations) {
            Some(annotations) => route_annotation(annotations, &class.name, Some(method)),
            None => Ok(None),
        }
    }

    fn class_description(&self, class: &HandlerClass) -> Option<String> {
        self.entry(class).ok()?.description()
    }

    fn method_description(&self, class: &HandlerClass, method: &str) -> Option<String> {
        self.entry(class)
            .ok()?
            .method(method)?
            .annotations()
            .and_then(description_annotation)
    }
}

fn check_names(
    annotations: &Map<String, Value>,
    class: &str,
    method: Option<&str>,
    config: &RouterConfig,
    errors: &mut Vec<MetadataError>,
) {
    for name in annotations.keys() {
        let understood = name == ROUTE_ANNOTATION || name == DESCRIPTION_ANNOTATION;
        if !understood && !config.is_ignored(name) {
            errors.push(MetadataError::UnknownAnnotation {
                name: name.clone(),
                class: class.to_string(),
                method: method.map(str::to_string),
            });
        }
    }
}

fn route_annotation(
    annotations: &Map<String, Value>,
    class: &str,
    method: Option<&str>,
) -> Result<Option<RawSpec>, MetadataError> {
    match annotations.get(ROUTE_ANNOTATION) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(raw)) => Ok(Some(raw.clone())),
        Some(_) => Err(MetadataError::MalformedRoute {
            class: class.to_string(),
            method: method.map(str::to_string),
        }),
    }
}

fn description_annotation(annotations: &Map<String, Value>) -> Option<String> {
    match annotations.get(DESCRIPTION_ANNOTATION)? {
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
}

fn read_manifest(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read handler manifest: {}", path.display()))
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}
