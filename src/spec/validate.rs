//! Turns raw declarations into [`RouteSpec`] records.
//!
//! Every recognized property has a typed setter in [`SETTERS`]; a key without
//! an entry is an unknown property. Validation runs in two phases: all
//! setters run first, then the declared parameters are checked against the
//! final path, so key order in the raw mapping never matters.

use super::error::{SpecError, SpecKind};
use super::types::{
    Format, HttpMethod, ParamDescriptor, RawSpec, RouteSpec, TagDecl, DESCRIPTOR_KEYS,
};
use serde_json::Value;
use std::collections::BTreeMap;

type Setter = fn(&mut Draft, &Value, SpecKind) -> Result<(), SpecError>;

/// Recognized property names and their setters.
const SETTERS: &[(&str, Setter)] = &[
    ("path", set_path),
    ("method", set_method),
    ("parameters", set_parameters),
    ("priority", set_priority),
    ("format", set_format),
    ("example", set_example),
    ("section", set_section),
    ("description", set_description),
    ("tags", set_tags),
    ("response_codes", set_response_codes),
    ("disable", set_disable),
    ("handler", set_handler),
    ("action", set_action),
];

/// Names of every property a raw declaration may carry.
pub fn known_properties() -> impl Iterator<Item = &'static str> {
    SETTERS.iter().map(|(name, _)| *name)
}

struct Draft {
    spec: RouteSpec,
    path: Option<String>,
    parameters: Option<Value>,
}

/// Validate a raw declaration on its own.
///
/// # Errors
///
/// Returns the first [`SpecError`] found. A missing or empty `path` is always
/// an error here.
pub fn validate_spec(raw: &RawSpec, kind: SpecKind) -> Result<RouteSpec, SpecError> {
    build(raw, kind, None)
}

/// Validate a method-level declaration that may inherit its path from `base`.
///
/// When the declaration has no `path` key, the base path is used, together
/// with the base parameters unless the declaration lists its own. An
/// explicitly empty path is still rejected.
///
/// # Errors
///
/// Returns the first [`SpecError`] found.
pub fn validate_method_spec(raw: &RawSpec, base: &RouteSpec) -> Result<RouteSpec, SpecError> {
    build(raw, SpecKind::Method, Some(base))
}

fn build(raw: &RawSpec, kind: SpecKind, base: Option<&RouteSpec>) -> Result<RouteSpec, SpecError> {
    let mut draft = Draft {
        spec: RouteSpec::new(String::new()),
        path: None,
        parameters: None,
    };

    for (key, value) in raw {
        let setter = SETTERS
            .iter()
            .find(|(name, _)| *name == key.as_str())
            .map(|(_, setter)| *setter)
            .ok_or_else(|| SpecError::UnknownProperty {
                key: key.clone(),
                kind,
            })?;
        setter(&mut draft, value, kind)?;
    }

    let (path, inherited) = match (draft.path, base) {
        (Some(path), _) => (path, false),
        (None, Some(base)) => (base.path.clone(), true),
        (None, None) => return Err(SpecError::InvalidPath { kind }),
    };

    let parameters = match draft.parameters {
        Some(value) => parse_parameters(&value, &path, kind)?,
        None => match base {
            Some(base) if inherited => base.parameters.clone(),
            _ => BTreeMap::new(),
        },
    };

    let mut spec = draft.spec;
    spec.path = path;
    spec.parameters = parameters;
    Ok(spec)
}

fn invalid(key: &str, expected: &'static str, kind: SpecKind) -> SpecError {
    SpecError::InvalidValue {
        key: key.to_string(),
        expected,
        kind,
    }
}

fn optional_string(
    key: &str,
    value: &Value,
    kind: SpecKind,
) -> Result<Option<String>, SpecError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(invalid(key, "a string or null", kind)),
    }
}

fn set_path(draft: &mut Draft, value: &Value, kind: SpecKind) -> Result<(), SpecError> {
    match value {
        Value::Null | Value::Bool(false) => Err(SpecError::InvalidPath { kind }),
        Value::String(s) => {
            let path = s.trim();
            if path.is_empty() {
                return Err(SpecError::InvalidPath { kind });
            }
            draft.path = Some(path.to_string());
            Ok(())
        }
        _ => Err(invalid("path", "a non-empty string", kind)),
    }
}

fn set_method(draft: &mut Draft, value: &Value, kind: SpecKind) -> Result<(), SpecError> {
    const EXPECTED: &str = "one of CREATE, READ, UPDATE, DELETE, OPTIONS";
    draft.spec.method = match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => {
            Some(HttpMethod::parse(s).ok_or_else(|| invalid("method", EXPECTED, kind))?)
        }
        _ => return Err(invalid("method", EXPECTED, kind)),
    };
    Ok(())
}

fn set_parameters(draft: &mut Draft, value: &Value, kind: SpecKind) -> Result<(), SpecError> {
    match value {
        Value::Null | Value::Object(_) => {
            draft.parameters = Some(value.clone());
            Ok(())
        }
        _ => Err(invalid(
            "parameters",
            "a mapping of parameter name to descriptor",
            kind,
        )),
    }
}

fn set_priority(draft: &mut Draft, value: &Value, kind: SpecKind) -> Result<(), SpecError> {
    const EXPECTED: &str = "an integer";
    draft.spec.priority = match value {
        Value::Null => 0,
        Value::Number(n) => n.as_i64().ok_or_else(|| invalid("priority", EXPECTED, kind))?,
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| invalid("priority", EXPECTED, kind))?,
        _ => return Err(invalid("priority", EXPECTED, kind)),
    };
    Ok(())
}

fn set_format(draft: &mut Draft, value: &Value, kind: SpecKind) -> Result<(), SpecError> {
    const EXPECTED: &str = "\"json\" or \"xml\"";
    draft.spec.format = match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => {
            Some(Format::parse(s).ok_or_else(|| invalid("format", EXPECTED, kind))?)
        }
        _ => return Err(invalid("format", EXPECTED, kind)),
    };
    Ok(())
}

fn set_example(draft: &mut Draft, value: &Value, _kind: SpecKind) -> Result<(), SpecError> {
    draft.spec.example = match value {
        Value::Null => None,
        other => Some(other.clone()),
    };
    Ok(())
}

fn set_section(draft: &mut Draft, value: &Value, kind: SpecKind) -> Result<(), SpecError> {
    draft.spec.section = optional_string("section", value, kind)?;
    Ok(())
}

fn set_description(draft: &mut Draft, value: &Value, kind: SpecKind) -> Result<(), SpecError> {
    draft.spec.description = optional_string("description", value, kind)?;
    Ok(())
}

fn set_handler(draft: &mut Draft, value: &Value, kind: SpecKind) -> Result<(), SpecError> {
    draft.spec.handler = optional_string("handler", value, kind)?;
    Ok(())
}

fn set_action(draft: &mut Draft, value: &Value, kind: SpecKind) -> Result<(), SpecError> {
    draft.spec.action = optional_string("action", value, kind)?;
    Ok(())
}

fn set_tags(draft: &mut Draft, value: &Value, kind: SpecKind) -> Result<(), SpecError> {
    const EXPECTED: &str = "a list of tag names or a mapping of tag name to color";

    fn colored(
        out: &mut Vec<TagDecl>,
        map: &serde_json::Map<String, Value>,
        kind: SpecKind,
    ) -> Result<(), SpecError> {
        for (name, color) in map {
            let color = match color {
                Value::Null => None,
                Value::String(c) => Some(c.clone()),
                _ => return Err(invalid("tags", EXPECTED, kind)),
            };
            out.push(TagDecl {
                name: name.clone(),
                color,
            });
        }
        Ok(())
    }

    let mut tags = Vec::new();
    match value {
        Value::Null => {}
        Value::Object(map) => colored(&mut tags, map, kind)?,
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(name) => tags.push(TagDecl {
                        name: name.clone(),
                        color: None,
                    }),
                    Value::Object(map) => colored(&mut tags, map, kind)?,
                    _ => return Err(invalid("tags", EXPECTED, kind)),
                }
            }
        }
        _ => return Err(invalid("tags", EXPECTED, kind)),
    }
    draft.spec.tags = tags;
    Ok(())
}

fn set_response_codes(draft: &mut Draft, value: &Value, kind: SpecKind) -> Result<(), SpecError> {
    const EXPECTED: &str = "a mapping of HTTP status code to description";
    let mut codes = BTreeMap::new();
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (code, desc) in map {
                let code: u16 = code
                    .trim()
                    .parse()
                    .map_err(|_| invalid("response_codes", EXPECTED, kind))?;
                let desc = match desc {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    _ => return Err(invalid("response_codes", EXPECTED, kind)),
                };
                codes.insert(code, desc);
            }
        }
        _ => return Err(invalid("response_codes", EXPECTED, kind)),
    }
    draft.spec.response_codes = codes;
    Ok(())
}

fn set_disable(draft: &mut Draft, value: &Value, _kind: SpecKind) -> Result<(), SpecError> {
    draft.spec.disabled = truthy(value);
    Ok(())
}

/// Loose boolean coercion: empty, zero and null values are false.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn parse_parameters(
    value: &Value,
    path: &str,
    kind: SpecKind,
) -> Result<BTreeMap<String, ParamDescriptor>, SpecError> {
    let map = match value {
        Value::Null => return Ok(BTreeMap::new()),
        Value::Object(map) => map,
        _ => {
            return Err(invalid(
                "parameters",
                "a mapping of parameter name to descriptor",
                kind,
            ))
        }
    };

    let mut out = BTreeMap::new();
    for (name, info) in map {
        if !path.contains(&format!("<{name}>")) {
            return Err(SpecError::UnboundParameter {
                name: name.clone(),
                path: path.to_string(),
                kind,
            });
        }

        let mut descriptor = ParamDescriptor::default();
        match info {
            Value::Null => {}
            Value::Object(fields) => {
                for (key, v) in fields {
                    if !DESCRIPTOR_KEYS.contains(&key.as_str()) {
                        return Err(SpecError::InvalidDescriptorKey {
                            parameter: name.clone(),
                            key: key.clone(),
                            kind,
                        });
                    }
                    if v.is_array() || v.is_object() {
                        return Err(SpecError::NonScalarDescriptorValue {
                            parameter: name.clone(),
                            key: key.clone(),
                            kind,
                        });
                    }
                    if let Some(slot) = descriptor.slot(key) {
                        *slot = Some(v.clone());
                    }
                }
            }
            _ => {
                return Err(invalid(
                    "parameters",
                    "a descriptor mapping for every parameter",
                    kind,
                ))
            }
        }
        out.insert(name.clone(), descriptor);
    }
    Ok(out)
}
