use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Raw, undeclared-shape route declaration as supplied by a metadata source.
pub type RawSpec = Map<String, Value>;

/// Color assigned to a tag declared without one.
pub const DEFAULT_TAG_COLOR: &str = "#9b59b6";

/// Keys a parameter descriptor may use.
pub const DESCRIPTOR_KEYS: [&str; 4] = ["requirement", "type", "description", "default"];

#[allow(clippy::expect_used)]
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([^<>/]+)>").expect("placeholder regex is valid"));

/// Operation an endpoint performs.
///
/// Declarations use the CRUD names; the conventional HTTP verbs are accepted
/// as aliases on input (`POST`, `GET`, `PUT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Create,
    Read,
    Update,
    Delete,
    Options,
}

impl HttpMethod {
    /// Parse a declared method, upper-casing it first.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CREATE" | "POST" => Some(HttpMethod::Create),
            "READ" | "GET" => Some(HttpMethod::Read),
            "UPDATE" | "PUT" => Some(HttpMethod::Update),
            "DELETE" => Some(HttpMethod::Delete),
            "OPTIONS" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    /// Infer the method served by a conventionally named action
    /// (`create`, `read`, `update`, `delete`, `options`).
    #[must_use]
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "create" => Some(HttpMethod::Create),
            "read" => Some(HttpMethod::Read),
            "update" => Some(HttpMethod::Update),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Create => "CREATE",
            HttpMethod::Read => "READ",
            HttpMethod::Update => "UPDATE",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// The HTTP verb a dispatcher matches for this method.
    #[must_use]
    pub fn to_http(&self) -> http::Method {
        match self {
            HttpMethod::Create => http::Method::POST,
            HttpMethod::Read => http::Method::GET,
            HttpMethod::Update => http::Method::PUT,
            HttpMethod::Delete => http::Method::DELETE,
            HttpMethod::Options => http::Method::OPTIONS,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response body format of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Xml,
}

impl Format {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Format::Json),
            "xml" => Some(Format::Xml),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description of one path parameter.
///
/// Every field is a scalar JSON value. `Some(Value::Null)` records an
/// explicit `null`, `None` an absent key.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParamDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirement: Option<Value>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamDescriptor {
    pub(crate) fn slot(&mut self, key: &str) -> Option<&mut Option<Value>> {
        match key {
            "requirement" => Some(&mut self.requirement),
            "type" => Some(&mut self.param_type),
            "description" => Some(&mut self.description),
            "default" => Some(&mut self.default),
            _ => None,
        }
    }

    /// Raw form of the descriptor, containing only the keys that were set.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        let fields = [
            ("requirement", &self.requirement),
            ("type", &self.param_type),
            ("description", &self.description),
            ("default", &self.default),
        ];
        for (key, value) in fields {
            if let Some(v) = value {
                obj.insert(key.to_string(), v.clone());
            }
        }
        Value::Object(obj)
    }
}

/// A tag as declared, before the default color is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagDecl {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// HTTP verb and action pair a dispatcher registers for a route.
///
/// `method: None` means the action answers any verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBinding {
    pub method: Option<http::Method>,
    pub action: String,
}

/// One endpoint declaration, validated.
///
/// Class-level (base) specs collect the actions they serve implicitly in
/// `actions`; method-level specs carry a single `action`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSpec {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, ParamDescriptor>,
    pub priority: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagDecl>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub response_codes: BTreeMap<u16, String>,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
}

impl RouteSpec {
    /// A spec for `path` with every other field at its default.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        RouteSpec {
            path: path.into(),
            method: None,
            parameters: BTreeMap::new(),
            priority: 0,
            format: None,
            example: None,
            section: None,
            description: None,
            tags: Vec::new(),
            response_codes: BTreeMap::new(),
            disabled: false,
            handler: None,
            action: None,
            actions: Vec::new(),
        }
    }

    /// Declared format, or the default when none was declared.
    #[must_use]
    pub fn format(&self) -> Format {
        self.format.unwrap_or_default()
    }

    /// Tags as `(name, color)` pairs in declaration order, with the default
    /// color filled in for names declared without one.
    #[must_use]
    pub fn tags(&self) -> Vec<(String, String)> {
        self.tags
            .iter()
            .map(|tag| {
                let color = tag
                    .color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TAG_COLOR.to_string());
                (tag.name.clone(), color)
            })
            .collect()
    }

    /// Names of the `<name>` placeholders in the path, in order of appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        PLACEHOLDER
            .captures_iter(&self.path)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// The explicitly declared HTTP verb, if any.
    #[must_use]
    pub fn http_method(&self) -> Option<http::Method> {
        self.method.map(|m| m.to_http())
    }

    /// Verb/action pairs this route answers.
    ///
    /// A method-level spec binds its own action; the explicit method wins over
    /// the verb inferred from a conventional action name. A base spec binds
    /// each implicitly served action, inferring the verb from the action name
    /// first and falling back to the declared method.
    #[must_use]
    pub fn bindings(&self) -> Vec<ActionBinding> {
        if let Some(action) = &self.action {
            let method = self.method.or_else(|| HttpMethod::from_action(action));
            return vec![ActionBinding {
                method: method.map(|m| m.to_http()),
                action: action.clone(),
            }];
        }

        self.actions
            .iter()
            .map(|action| ActionBinding {
                method: HttpMethod::from_action(action)
                    .or(self.method)
                    .map(|m| m.to_http()),
                action: action.clone(),
            })
            .collect()
    }

    /// Serialize the declared fields back to raw form.
    ///
    /// `actions` is resolver output, not a declarable property, so it is not
    /// part of the raw form.
    #[must_use]
    pub fn to_raw(&self) -> RawSpec {
        let mut raw = Map::new();
        raw.insert("path".into(), Value::String(self.path.clone()));
        if let Some(method) = self.method {
            raw.insert("method".into(), Value::String(method.as_str().into()));
        }
        if !self.parameters.is_empty() {
            let params = self
                .parameters
                .iter()
                .map(|(name, desc)| (name.clone(), desc.to_value()))
                .collect();
            raw.insert("parameters".into(), Value::Object(params));
        }
        raw.insert("priority".into(), Value::from(self.priority));
        if let Some(format) = self.format {
            raw.insert("format".into(), Value::String(format.as_str().into()));
        }
        if let Some(example) = &self.example {
            raw.insert("example".into(), example.clone());
        }
        if let Some(section) = &self.section {
            raw.insert("section".into(), Value::String(section.clone()));
        }
        if let Some(description) = &self.description {
            raw.insert("description".into(), Value::String(description.clone()));
        }
        if !self.tags.is_empty() {
            let tags = self
                .tags
                .iter()
                .map(|tag| match &tag.color {
                    Some(color) => {
                        let mut obj = Map::new();
                        obj.insert(tag.name.clone(), Value::String(color.clone()));
                        Value::Object(obj)
                    }
                    None => Value::String(tag.name.clone()),
                })
                .collect();
            raw.insert("tags".into(), Value::Array(tags));
        }
        if !self.response_codes.is_empty() {
            let codes = self
                .response_codes
                .iter()
                .map(|(code, desc)| (code.to_string(), Value::String(desc.clone())))
                .collect();
            raw.insert("response_codes".into(), Value::Object(codes));
        }
        raw.insert("disable".into(), Value::Bool(self.disabled));
        if let Some(handler) = &self.handler {
            raw.insert("handler".into(), Value::String(handler.clone()));
        }
        if let Some(action) = &self.action {
            raw.insert("action".into(), Value::String(action.clone()));
        }
        raw
    }
}
